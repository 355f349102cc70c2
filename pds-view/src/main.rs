//! Application entry point for the Poisson-disk sampling viewer.
//!
//! This binary parses the start-up [`Options`], sets up logging and
//! eframe/egui, and delegates all interactive logic and rendering to
//! [`Viewer`] from the `viewer` module.

mod options;
mod viewer;

use clap::Parser;
use options::Options;
use viewer::Viewer;

/// Starts the native eframe application.
///
/// ### Returns
/// - `Ok(())` if the application runs to completion without errors.
/// - `Err` if the options describe an invalid sampling run, or if eframe
///   fails to create the native window or event loop.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let opts = Options::parse();
    let mut viewer = Viewer::new(opts.config())?;
    if opts.finish {
        viewer.finish();
    }

    let native = eframe::NativeOptions::default();
    eframe::run_native(
        "Poisson Disk Sampling",
        native,
        Box::new(move |_cc| Ok(Box::new(viewer))),
    )?;
    Ok(())
}
