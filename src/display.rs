// Display queries: DPI, screen size, HDR state and SDR white level.
//
// HDR state and white level come from the DisplayConfig API: resolve the
// HMONITOR's GDI device name, find the matching active path, then query
// ADVANCED_COLOR_INFO and SDR_WHITE_LEVEL on that path.

use anyhow::{anyhow, bail, Result};
use windows::Win32::Devices::Display::{
    DisplayConfigGetDeviceInfo, GetDisplayConfigBufferSizes, QueryDisplayConfig,
    DISPLAYCONFIG_DEVICE_INFO_GET_ADVANCED_COLOR_INFO, DISPLAYCONFIG_DEVICE_INFO_GET_SDR_WHITE_LEVEL,
    DISPLAYCONFIG_DEVICE_INFO_GET_SOURCE_NAME, DISPLAYCONFIG_DEVICE_INFO_HEADER,
    DISPLAYCONFIG_MODE_INFO, DISPLAYCONFIG_PATH_INFO, DISPLAYCONFIG_SDR_WHITE_LEVEL,
    DISPLAYCONFIG_SOURCE_DEVICE_NAME, QDC_ONLY_ACTIVE_PATHS,
};
use windows::Win32::Foundation::{ERROR_SUCCESS, HWND};
use windows::Win32::Graphics::Gdi::{
    GetMonitorInfoW, MonitorFromWindow, HMONITOR, MONITORINFO, MONITORINFOEXW,
    MONITOR_DEFAULTTONEAREST,
};
use windows::Win32::UI::HiDpi::{
    SetProcessDpiAwarenessContext, DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2,
};
use windows::Win32::UI::WindowsAndMessaging::{GetSystemMetrics, SM_CXSCREEN, SM_CYSCREEN};

use crate::color::REFERENCE_WHITE_NITS;
use crate::layout::ScreenSize;

// ---------------------------------------------------------------------------
// DPI / screen
// ---------------------------------------------------------------------------

/// Enable Per-Monitor DPI awareness
///
/// Makes the window and swap chain cover physical pixels rather than a scaled
/// logical resolution. Repeated calls are safe.
pub fn enable_dpi_awareness() {
    unsafe {
        // SAFETY: best-effort call, failure indicates it was already set
        let _ = SetProcessDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2);
    }
}

/// Size of the primary screen.
pub fn primary_screen_size() -> Result<ScreenSize> {
    // SAFETY: GetSystemMetrics has no preconditions.
    let (w, h) = unsafe { (GetSystemMetrics(SM_CXSCREEN), GetSystemMetrics(SM_CYSCREEN)) };
    if w <= 0 || h <= 0 {
        bail!("GetSystemMetrics reported an empty screen ({}x{})", w, h);
    }
    Ok(ScreenSize::new(w as u32, h as u32))
}

// ---------------------------------------------------------------------------
// HDR status
// ---------------------------------------------------------------------------

/// HDR-related state of one monitor.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayStatus {
    /// GDI device name (e.g. `\\.\DISPLAY1`).
    pub device_name: String,
    /// Advanced colour (HDR) currently enabled.
    pub hdr_enabled: bool,
    /// "SDR content brightness" in nits.
    pub sdr_white_nits: f32,
}

/// Status of the monitor that hosts `hwnd`.
pub fn window_display_status(hwnd: HWND) -> Result<DisplayStatus> {
    // SAFETY: MonitorFromWindow always returns a monitor with DEFAULTTONEAREST.
    let monitor = unsafe { MonitorFromWindow(hwnd, MONITOR_DEFAULTTONEAREST) };
    monitor_status(monitor)
}

pub fn monitor_status(monitor: HMONITOR) -> Result<DisplayStatus> {
    let device_name = monitor_device_name(monitor)?;
    let path = find_display_config_path(&device_name)?;

    // SAFETY: `path` comes from QueryDisplayConfig above.
    let hdr_enabled = unsafe { query_advanced_color_enabled(&path)? };
    let sdr_white_nits = unsafe { query_sdr_white_level(&path) }.unwrap_or(REFERENCE_WHITE_NITS);

    Ok(DisplayStatus {
        device_name: String::from_utf16_lossy(&device_name)
            .trim_end_matches('\0')
            .to_string(),
        hdr_enabled,
        sdr_white_nits,
    })
}

/// GDI device name for a monitor handle.
fn monitor_device_name(monitor: HMONITOR) -> Result<[u16; 32]> {
    let mut info = MONITORINFOEXW {
        monitorInfo: MONITORINFO {
            cbSize: std::mem::size_of::<MONITORINFOEXW>() as u32,
            ..Default::default()
        },
        ..Default::default()
    };

    // SAFETY: cbSize announces the extended struct, which GetMonitorInfoW fills.
    let ok = unsafe { GetMonitorInfoW(monitor, &mut info.monitorInfo as *mut _ as *mut _) };
    if !ok.as_bool() {
        bail!("GetMonitorInfoW failed");
    }
    Ok(info.szDevice)
}

/// Active DisplayConfig path whose source matches `device_name`.
fn find_display_config_path(device_name: &[u16; 32]) -> Result<DISPLAYCONFIG_PATH_INFO> {
    // SAFETY: buffers are sized from GetDisplayConfigBufferSizes and the counts
    // are updated by QueryDisplayConfig.
    unsafe {
        let mut num_paths = 0u32;
        let mut num_modes = 0u32;
        let ret = GetDisplayConfigBufferSizes(QDC_ONLY_ACTIVE_PATHS, &mut num_paths, &mut num_modes);
        if ret != ERROR_SUCCESS {
            bail!("GetDisplayConfigBufferSizes failed with error code: {}", ret.0);
        }

        let mut paths = vec![DISPLAYCONFIG_PATH_INFO::default(); num_paths as usize];
        let mut modes = vec![DISPLAYCONFIG_MODE_INFO::default(); num_modes as usize];

        let ret = QueryDisplayConfig(
            QDC_ONLY_ACTIVE_PATHS,
            &mut num_paths,
            paths.as_mut_ptr(),
            &mut num_modes,
            modes.as_mut_ptr(),
            None,
        );
        if ret != ERROR_SUCCESS {
            bail!("QueryDisplayConfig failed with error code: {}", ret.0);
        }
        paths.truncate(num_paths as usize);

        for path in &paths {
            let mut source_name = DISPLAYCONFIG_SOURCE_DEVICE_NAME {
                header: DISPLAYCONFIG_DEVICE_INFO_HEADER {
                    r#type: DISPLAYCONFIG_DEVICE_INFO_GET_SOURCE_NAME,
                    size: std::mem::size_of::<DISPLAYCONFIG_SOURCE_DEVICE_NAME>() as u32,
                    adapterId: path.sourceInfo.adapterId,
                    id: path.sourceInfo.id,
                },
                ..Default::default()
            };

            if DisplayConfigGetDeviceInfo(&mut source_name.header) != 0 {
                continue;
            }
            if source_name.viewGdiDeviceName == *device_name {
                return Ok(*path);
            }
        }
    }

    Err(anyhow!("No active display path for monitor"))
}

/// bit 1 of DISPLAYCONFIG_GET_ADVANCED_COLOR_INFO.value = advancedColorEnabled.
unsafe fn query_advanced_color_enabled(path: &DISPLAYCONFIG_PATH_INFO) -> Result<bool> {
    // Declared locally: the binding's union layout differs between
    // windows-rs versions, the C layout does not.
    #[repr(C)]
    struct AdvancedColorInfo {
        header: DISPLAYCONFIG_DEVICE_INFO_HEADER,
        value: u32,
        color_encoding: u32,
        bits_per_color_channel: u32,
    }

    let mut info = AdvancedColorInfo {
        header: DISPLAYCONFIG_DEVICE_INFO_HEADER {
            r#type: DISPLAYCONFIG_DEVICE_INFO_GET_ADVANCED_COLOR_INFO,
            size: std::mem::size_of::<AdvancedColorInfo>() as u32,
            adapterId: path.targetInfo.adapterId,
            id: path.targetInfo.id,
        },
        value: 0,
        color_encoding: 0,
        bits_per_color_channel: 0,
    };

    let ret = DisplayConfigGetDeviceInfo(&mut info.header);
    if ret != 0 {
        bail!("DisplayConfigGetDeviceInfo(ADVANCED_COLOR_INFO) failed: {}", ret);
    }
    Ok((info.value >> 1) & 1 == 1)
}

/// SDR white level in nits, or `None` if the query is unsupported.
unsafe fn query_sdr_white_level(path: &DISPLAYCONFIG_PATH_INFO) -> Option<f32> {
    let mut level = DISPLAYCONFIG_SDR_WHITE_LEVEL {
        header: DISPLAYCONFIG_DEVICE_INFO_HEADER {
            r#type: DISPLAYCONFIG_DEVICE_INFO_GET_SDR_WHITE_LEVEL,
            size: std::mem::size_of::<DISPLAYCONFIG_SDR_WHITE_LEVEL>() as u32,
            adapterId: path.targetInfo.adapterId,
            id: path.targetInfo.id,
        },
        SDRWhiteLevel: 0,
    };

    if DisplayConfigGetDeviceInfo(&mut level.header) != 0 {
        return None;
    }

    // 1000 = 80 nits
    Some(level.SDRWhiteLevel as f32 * REFERENCE_WHITE_NITS / 1000.0)
}
