// D3D11 device and scRGB swap chain creation

use anyhow::{Context, Result};
use tracing::info;
use windows::core::Interface;
use windows::Win32::Foundation::{HMODULE, HWND};
use windows::Win32::Graphics::Direct3D::*;
use windows::Win32::Graphics::Direct3D11::*;
use windows::Win32::Graphics::Dxgi::Common::*;
use windows::Win32::Graphics::Dxgi::*;

use crate::layout::ScreenSize;

/// Back buffer format: 16-bit float per channel, required for scRGB.
pub const BACK_BUFFER_FORMAT: DXGI_FORMAT = DXGI_FORMAT_R16G16B16A16_FLOAT;

/// Linear BT.709 colour space with 1.0 = 80 nits.
pub const SCRGB_COLOR_SPACE: DXGI_COLOR_SPACE_TYPE = DXGI_COLOR_SPACE_RGB_FULL_G10_NONE_P709;

/// D3D11 device context
pub struct D3D11Context {
    pub device: ID3D11Device,
    pub context: ID3D11DeviceContext,
    pub dxgi_device: IDXGIDevice,
}

/// Create a hardware D3D11 device with BGRA support (needed by Direct2D).
pub fn create_d3d11_device() -> Result<D3D11Context> {
    let (device, context) = unsafe {
        let mut device = None;
        let mut context = None;

        D3D11CreateDevice(
            None,
            D3D_DRIVER_TYPE_HARDWARE,
            HMODULE::default(),
            D3D11_CREATE_DEVICE_BGRA_SUPPORT,
            Some(&[D3D_FEATURE_LEVEL_11_1, D3D_FEATURE_LEVEL_11_0]),
            D3D11_SDK_VERSION,
            Some(&mut device),
            None,
            Some(&mut context),
        )
        .context("D3D11CreateDevice failed")?;

        (
            device.context("D3D11CreateDevice returned no device")?,
            context.context("D3D11CreateDevice returned no immediate context")?,
        )
    };

    let dxgi_device: IDXGIDevice = device
        .cast()
        .context("ID3D11Device does not expose IDXGIDevice")?;

    if let Err(e) = log_device_info(&dxgi_device) {
        tracing::warn!("Could not read adapter description: {:#}", e);
    }

    Ok(D3D11Context {
        device,
        context,
        dxgi_device,
    })
}

fn log_device_info(dxgi_device: &IDXGIDevice) -> Result<()> {
    unsafe {
        let adapter = dxgi_device.GetAdapter()?;
        let desc = adapter.GetDesc()?;
        let name = String::from_utf16_lossy(&desc.Description);

        info!(
            gpu = name.trim_end_matches('\0'),
            vram_mb = desc.DedicatedVideoMemory / 1024 / 1024,
            "D3D11 device created"
        );
    }
    Ok(())
}

/// Create a flip-model FP16 swap chain for `hwnd` and switch it to scRGB.
pub fn create_scrgb_swap_chain(
    ctx: &D3D11Context,
    hwnd: HWND,
    size: ScreenSize,
) -> Result<IDXGISwapChain3> {
    let factory: IDXGIFactory2 = unsafe {
        let adapter = ctx
            .dxgi_device
            .GetAdapter()
            .context("IDXGIDevice::GetAdapter failed")?;
        adapter
            .GetParent::<IDXGIFactory2>()
            .context("IDXGIAdapter::GetParent(IDXGIFactory2) failed")?
    };

    let desc = DXGI_SWAP_CHAIN_DESC1 {
        Width: size.width,
        Height: size.height,
        Format: BACK_BUFFER_FORMAT,
        SampleDesc: DXGI_SAMPLE_DESC {
            Count: 1,
            Quality: 0,
        },
        BufferUsage: DXGI_USAGE_RENDER_TARGET_OUTPUT,
        BufferCount: 2,
        SwapEffect: DXGI_SWAP_EFFECT_FLIP_SEQUENTIAL,
        ..Default::default()
    };

    let swap_chain: IDXGISwapChain3 = unsafe {
        factory
            .CreateSwapChainForHwnd(&ctx.device, hwnd, &desc, None, None)
            .context("CreateSwapChainForHwnd failed")?
            .cast::<IDXGISwapChain3>()
            .context("Swap chain does not support IDXGISwapChain3")?
    };

    unsafe {
        swap_chain
            .SetColorSpace1(SCRGB_COLOR_SPACE)
            .context("SetColorSpace1(scRGB) failed")?;
    }

    info!(
        width = size.width,
        height = size.height,
        "scRGB swap chain created"
    );
    Ok(swap_chain)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_creation() {
        let ctx = create_d3d11_device().expect("device creation failed");
        unsafe {
            let adapter = ctx.dxgi_device.GetAdapter();
            assert!(adapter.is_ok());
        }
    }
}
