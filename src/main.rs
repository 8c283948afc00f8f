// What you SEE:
// • The camera preview fills the window, refreshed every 100 ms.
// • R toggles the red filter, = zooms in (crop), - zooms out (bin).
// • The status strip shows the camera, zoom/bin, and live min/max.
// • F1 shows the about box. ESC quits.
// With no camera attached the window stays dark: nothing is acquired.

mod app;
mod camera;
mod cli;
mod draw;
mod error;
mod geometry;
mod logging;
mod model;
mod render;
mod types;

use app::FocusApp;
use clap::Parser;
use cli::Args;
use draw::Drawer;
use error::Error;
use std::time::Instant;
use tracing::info;

fn main() -> Result<(), Error> {
    let args = Args::parse();
    logging::init(args.verbose);
    let config = args.config()?;

    /* --- Camera + window setup --- */
    let attachment = camera::attach(config.backend, config.model);
    let (w, h) = draw::initial_client_size(attachment.frame(), attachment.pixels());
    let mut drawer = Drawer::new("SX Focus", w, h)?;

    let mut app = FocusApp::new(attachment, config.interval, Instant::now());
    let attached = app.attachment();
    info!(model = format!("0x{:02X}", attached.model().code()), "{}", attached.status_text());
    info!(zoom = app.zoom().level(), red_filter = app.red_filter(), armed = app.tick_armed(), "preview started");

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && app.is_running() {
        for action in drawer.actions() {
            app.handle(action);
        }
        app.poll_tick(Instant::now(), &mut drawer);
        drawer.present(app.status(), app.about_visible())?;
    }

    Ok(())
}
