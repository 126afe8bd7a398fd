// Direct2D renderer drawing the pattern into the scRGB back buffer.
//
// The D2D device context targets the swap chain's FP16 back buffer directly,
// so brush colours are scRGB values and can exceed 1.0.

use anyhow::{Context, Result};
use windows::core::HSTRING;
use windows::Win32::Graphics::Direct2D::Common::{
    D2D1_ALPHA_MODE_PREMULTIPLIED, D2D1_COLOR_F, D2D1_PIXEL_FORMAT, D2D_RECT_F,
};
use windows::Win32::Graphics::Direct2D::{
    D2D1CreateFactory, ID2D1Bitmap1, ID2D1Device, ID2D1DeviceContext, ID2D1Factory1,
    ID2D1SolidColorBrush, D2D1_BITMAP_OPTIONS_CANNOT_DRAW, D2D1_BITMAP_OPTIONS_TARGET,
    D2D1_BITMAP_PROPERTIES1, D2D1_DEVICE_CONTEXT_OPTIONS_NONE, D2D1_DRAW_TEXT_OPTIONS_NONE,
    D2D1_FACTORY_OPTIONS, D2D1_FACTORY_TYPE_SINGLE_THREADED,
};
use windows::Win32::Graphics::DirectWrite::{
    DWriteCreateFactory, IDWriteFactory, IDWriteTextFormat, DWRITE_FACTORY_TYPE_SHARED,
    DWRITE_FONT_STRETCH_NORMAL, DWRITE_FONT_STYLE_NORMAL, DWRITE_FONT_WEIGHT_NORMAL,
    DWRITE_MEASURING_MODE_NATURAL, DWRITE_PARAGRAPH_ALIGNMENT_NEAR, DWRITE_TEXT_ALIGNMENT_CENTER,
};
use windows::Win32::Graphics::Dxgi::{IDXGISurface, IDXGISwapChain3, DXGI_PRESENT};

use crate::color::ScRgb;
use crate::config::CalibrationConfig;
use crate::d3d11::{D3D11Context, BACK_BUFFER_FORMAT};
use crate::frame::{PatternFrame, PatternRenderer};
use crate::layout::Rect;

fn d2d_color(c: ScRgb) -> D2D1_COLOR_F {
    D2D1_COLOR_F {
        r: c.r,
        g: c.g,
        b: c.b,
        a: 1.0,
    }
}

fn d2d_rect(r: &Rect) -> D2D_RECT_F {
    D2D_RECT_F {
        left: r.left,
        top: r.top,
        right: r.right,
        bottom: r.bottom,
    }
}

/// Direct2D / DirectWrite resources for one swap chain.
///
/// Field order is release order: target-dependent objects go first, the
/// swap chain and D3D device last.
pub struct D2DRenderer {
    text_format: IDWriteTextFormat,
    _dwrite_factory: IDWriteFactory,
    reference_brush: ID2D1SolidColorBrush,
    target_brush: ID2D1SolidColorBrush,
    text_brush: ID2D1SolidColorBrush,
    _target_bitmap: ID2D1Bitmap1,
    context: ID2D1DeviceContext,
    _device: ID2D1Device,
    _factory: ID2D1Factory1,
    swap_chain: IDXGISwapChain3,
    _d3d: D3D11Context,
}

impl D2DRenderer {
    pub fn new(d3d: D3D11Context, swap_chain: IDXGISwapChain3, config: &CalibrationConfig) -> Result<Self> {
        let options = D2D1_FACTORY_OPTIONS::default();
        let factory: ID2D1Factory1 = unsafe {
            D2D1CreateFactory(D2D1_FACTORY_TYPE_SINGLE_THREADED, Some(&options))
                .context("D2D1CreateFactory failed")?
        };

        let device = unsafe {
            factory
                .CreateDevice(&d3d.dxgi_device)
                .context("ID2D1Factory1::CreateDevice failed")?
        };
        let context = unsafe {
            device
                .CreateDeviceContext(D2D1_DEVICE_CONTEXT_OPTIONS_NONE)
                .context("CreateDeviceContext failed")?
        };

        let target_bitmap = unsafe {
            let back_buffer: IDXGISurface = swap_chain
                .GetBuffer(0)
                .context("IDXGISwapChain::GetBuffer failed")?;

            let props = D2D1_BITMAP_PROPERTIES1 {
                pixelFormat: D2D1_PIXEL_FORMAT {
                    format: BACK_BUFFER_FORMAT,
                    alphaMode: D2D1_ALPHA_MODE_PREMULTIPLIED,
                },
                dpiX: 96.0,
                dpiY: 96.0,
                bitmapOptions: D2D1_BITMAP_OPTIONS_TARGET | D2D1_BITMAP_OPTIONS_CANNOT_DRAW,
                ..Default::default()
            };
            context
                .CreateBitmapFromDxgiSurface(&back_buffer, Some(&props))
                .context("CreateBitmapFromDxgiSurface failed")?
        };
        unsafe { context.SetTarget(&target_bitmap) };

        let solid = |color: ScRgb| -> Result<ID2D1SolidColorBrush> {
            unsafe {
                context
                    .CreateSolidColorBrush(&d2d_color(color), None)
                    .context("CreateSolidColorBrush failed")
            }
        };
        let reference_brush = solid(ScRgb::BLACK)?;
        let target_brush = solid(ScRgb::BLACK)?;
        let text_brush = solid(config.text_color)?;

        let dwrite_factory: IDWriteFactory = unsafe {
            DWriteCreateFactory(DWRITE_FACTORY_TYPE_SHARED).context("DWriteCreateFactory failed")?
        };
        let text_format = unsafe {
            let format = dwrite_factory
                .CreateTextFormat(
                    &HSTRING::from(config.font_family.as_str()),
                    None,
                    DWRITE_FONT_WEIGHT_NORMAL,
                    DWRITE_FONT_STYLE_NORMAL,
                    DWRITE_FONT_STRETCH_NORMAL,
                    config.font_size,
                    &HSTRING::from("en-us"),
                )
                .context("CreateTextFormat failed")?;
            format
                .SetTextAlignment(DWRITE_TEXT_ALIGNMENT_CENTER)
                .context("SetTextAlignment failed")?;
            format
                .SetParagraphAlignment(DWRITE_PARAGRAPH_ALIGNMENT_NEAR)
                .context("SetParagraphAlignment failed")?;
            format
        };

        Ok(Self {
            text_format,
            _dwrite_factory: dwrite_factory,
            reference_brush,
            target_brush,
            text_brush,
            _target_bitmap: target_bitmap,
            context,
            _device: device,
            _factory: factory,
            swap_chain,
            _d3d: d3d,
        })
    }
}

impl PatternRenderer for D2DRenderer {
    fn draw(&mut self, frame: &PatternFrame) -> Result<()> {
        let label: Vec<u16> = frame.label.encode_utf16().collect();

        // SAFETY: all resources belong to this context; BeginDraw/EndDraw are paired.
        unsafe {
            self.context.BeginDraw();
            self.context.Clear(Some(&d2d_color(ScRgb::BLACK)));

            if let Some(outer) = &frame.geometry.outer {
                self.reference_brush
                    .SetColor(&d2d_color(frame.reference_color));
                self.context
                    .FillRectangle(&d2d_rect(outer), &self.reference_brush);
            }

            self.target_brush.SetColor(&d2d_color(frame.target_color));
            self.context
                .FillRectangle(&d2d_rect(&frame.geometry.inner), &self.target_brush);

            self.context.DrawText(
                &label,
                &self.text_format,
                &d2d_rect(&frame.geometry.text),
                &self.text_brush,
                D2D1_DRAW_TEXT_OPTIONS_NONE,
                DWRITE_MEASURING_MODE_NATURAL,
            );

            self.context
                .EndDraw(None, None)
                .context("ID2D1DeviceContext::EndDraw failed")?;
        }
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        // SAFETY: sync interval 1 blocks until the next vertical blank.
        unsafe {
            self.swap_chain
                .Present(1, DXGI_PRESENT(0))
                .ok()
                .context("IDXGISwapChain::Present failed")
        }
    }
}
