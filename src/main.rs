// hdrcalib: full-screen HDR calibration pattern
//
// Controls
// - Left / Right, D-pad, left stick: adjust the inner square (hold to repeat)
// - Space, gamepad A: switch between max-white and min-black calibration
// - Esc, gamepad B: quit

#[cfg(windows)]
fn main() -> anyhow::Result<()> {
    hdrcalib::logging::init_logging()?;
    app::run()
}

#[cfg(not(windows))]
fn main() -> anyhow::Result<()> {
    hdrcalib::logging::init_logging()?;
    anyhow::bail!("hdrcalib requires Windows (Direct3D 11 / DXGI scRGB swap chain)")
}

#[cfg(windows)]
mod app {
    use std::time::Instant;

    use anyhow::{Context, Result};
    use tracing::{info, warn};

    use hdrcalib::config::CalibrationConfig;
    use hdrcalib::d3d11::{create_d3d11_device, create_scrgb_swap_chain};
    use hdrcalib::display::{enable_dpi_awareness, primary_screen_size, window_display_status};
    use hdrcalib::frame::{FrameDriver, FrameOutcome};
    use hdrcalib::input::gamepad::{GamepadMapping, XInputGamepad};
    use hdrcalib::input::keyboard::KeyboardSource;
    use hdrcalib::input::InputSources;
    use hdrcalib::render::D2DRenderer;
    use hdrcalib::window::CalibrationWindow;

    pub fn run() -> Result<()> {
        let config = CalibrationConfig::default();

        enable_dpi_awareness();
        let screen = primary_screen_size()?;
        info!(width = screen.width, height = screen.height, "primary screen");

        let mut window = CalibrationWindow::create(screen).context("Failed to create window")?;
        report_display_status(&window);

        let d3d = create_d3d11_device().context("Failed to create D3D11 device")?;
        let swap_chain = create_scrgb_swap_chain(&d3d, window.hwnd(), screen)
            .context("Failed to create scRGB swap chain")?;
        let mut renderer = D2DRenderer::new(d3d, swap_chain, &config)
            .context("Failed to initialise Direct2D")?;

        let mut sources = InputSources::new();
        sources.push(Box::new(KeyboardSource::default()));
        sources.push(Box::new(XInputGamepad::new(
            config.gamepad_index,
            GamepadMapping {
                stick_threshold: config.stick_threshold,
            },
        )));

        let mut driver = FrameDriver::new(&config, window.size());
        info!("calibration running, Esc or gamepad B to quit");

        while window.pump_messages() {
            let outcome = driver.run_frame(&mut sources, Instant::now(), &mut renderer)?;
            if outcome == FrameOutcome::Quit {
                break;
            }
        }

        let result = driver.result();
        info!(
            max_white_nits = result.max_white_nits,
            min_black_nits = result.min_black_nits,
            "exiting"
        );
        Ok(())
    }

    fn report_display_status(window: &CalibrationWindow) {
        match window_display_status(window.hwnd()) {
            Ok(status) if status.hdr_enabled => info!(
                display = %status.device_name,
                sdr_white_nits = status.sdr_white_nits,
                "HDR enabled"
            ),
            Ok(status) => warn!(
                display = %status.device_name,
                "HDR is disabled on this display; values above SDR white will clip"
            ),
            Err(e) => warn!("Could not query display HDR status: {:#}", e),
        }
    }
}
