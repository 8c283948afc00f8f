// The focus loop: one state object, one handler per user action, and a
// one-shot tick that acquires, converts and paints a frame.

use crate::camera::{Attachment, Backend};
use crate::geometry::ZoomLevel;
use crate::model::CameraModel;
use crate::render;
use image::RgbImage;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(100);

/// Startup settings, built once from the command line.
#[derive(Clone, Copy, Debug)]
pub struct FocusConfig {
    pub backend: Backend,
    pub model: CameraModel,
    pub interval: Duration,
}

/// Where a rendered frame goes.
pub trait Screen {
    /// Drawable area for the preview, status strip excluded.
    fn viewport(&self) -> (usize, usize);
    /// Scale `image` to the viewport and draw it.
    fn paint(&mut self, image: &RgbImage);
}

/// Named user actions, produced by the window on the UI thread.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    ToggleFilter,
    ZoomIn,
    ZoomOut,
    About,
    Exit,
}

/// One-shot timer: fires once, then stays idle until rearmed.
#[derive(Debug)]
pub struct Ticker {
    interval: Duration,
    deadline: Option<Instant>,
}

impl Ticker {
    pub fn new(interval: Duration) -> Self {
        Self { interval, deadline: None }
    }

    pub fn start_once(&mut self, now: Instant) {
        self.deadline = Some(now + self.interval);
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// True once per arming, when the deadline has passed.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(t) if now >= t => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

pub const STATUS_ATTACHED: usize = 0;
pub const STATUS_ZOOM: usize = 1;
pub const STATUS_MIN: usize = 2;
pub const STATUS_MAX: usize = 3;

pub struct FocusApp {
    attachment: Attachment,
    zoom: ZoomLevel,
    red_filter: bool,
    ticker: Ticker,
    status: [String; 4],
    about_visible: bool,
    running: bool,
}

impl FocusApp {
    /// Ticks only start when a camera is attached; a detached app never
    /// acquires.
    pub fn new(attachment: Attachment, interval: Duration, now: Instant) -> Self {
        let zoom = ZoomLevel::default();
        let mut ticker = Ticker::new(interval);
        if matches!(attachment, Attachment::Attached(_)) {
            ticker.start_once(now);
        }
        let mut status: [String; 4] = Default::default();
        status[STATUS_ATTACHED] = attachment.status_text();
        status[STATUS_ZOOM] = zoom.status_text();
        Self {
            attachment,
            zoom,
            red_filter: false,
            ticker,
            status,
            about_visible: false,
            running: true,
        }
    }

    pub fn attachment(&self) -> &Attachment {
        &self.attachment
    }

    pub fn zoom(&self) -> ZoomLevel {
        self.zoom
    }

    pub fn red_filter(&self) -> bool {
        self.red_filter
    }

    pub fn status(&self) -> &[String; 4] {
        &self.status
    }

    pub fn about_visible(&self) -> bool {
        self.about_visible
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn tick_armed(&self) -> bool {
        self.ticker.is_armed()
    }

    pub fn handle(&mut self, action: Action) {
        match action {
            Action::ToggleFilter => self.on_filter(!self.red_filter),
            Action::ZoomIn => self.on_zoom_in(),
            Action::ZoomOut => self.on_zoom_out(),
            Action::About => self.on_about(),
            Action::Exit => self.on_exit(),
        }
    }

    pub fn on_filter(&mut self, checked: bool) {
        self.red_filter = checked;
        debug!(red_filter = checked, "filter");
    }

    pub fn on_zoom_in(&mut self) {
        self.zoom.zoom_in();
        self.zoom_changed();
    }

    pub fn on_zoom_out(&mut self) {
        self.zoom.zoom_out();
        self.zoom_changed();
    }

    fn zoom_changed(&mut self) {
        self.status[STATUS_ZOOM] = self.zoom.status_text();
        info!(level = self.zoom.level(), "{}", self.status[STATUS_ZOOM]);
    }

    pub fn on_about(&mut self) {
        self.about_visible = !self.about_visible;
    }

    pub fn on_exit(&mut self) {
        self.running = false;
    }

    /// Run one tick if it is due. Returns whether it ran.
    pub fn poll_tick(&mut self, now: Instant, screen: &mut impl Screen) -> bool {
        if !self.ticker.fire(now) {
            return false;
        }
        self.on_tick(screen);
        self.ticker.start_once(Instant::now());
        true
    }

    /// Acquire, convert, paint, publish min/max.
    fn on_tick(&mut self, screen: &mut impl Screen) {
        let Attachment::Attached(cam) = &mut self.attachment else {
            return;
        };

        let acq = self.zoom.acquisition(cam.frame);
        if let Err(e) = cam.camera.read_pixels(&acq, &mut cam.samples) {
            error!(error = %e, "acquisition failed");
            return;
        }

        let (image, stats) = render::convert(&cam.samples, acq.out_width, acq.out_height, self.red_filter);
        let (vw, vh) = screen.viewport();
        if vw > 0 && vh > 0 {
            screen.paint(&image);
        }

        self.status[STATUS_MIN] = format!("Min: {}", stats.min);
        self.status[STATUS_MAX] = format!("Max: {}", stats.max);
        debug!(
            min = stats.min,
            max = stats.max,
            width = acq.out_width,
            height = acq.out_height,
            bin = acq.bin,
            "tick"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{self, Camera};
    use crate::error::Error;
    use crate::geometry::{Acquisition, FrameDimensions, PixelDimensions};

    /// Camera returning a constant value.
    struct FlatCamera {
        value: u16,
        fail: bool,
    }

    impl Camera for FlatCamera {
        fn model(&self) -> CameraModel {
            CameraModel::default()
        }
        fn frame_dimensions(&self) -> FrameDimensions {
            FrameDimensions { width: 512, height: 512, depth: 16 }
        }
        fn pixel_dimensions(&self) -> PixelDimensions {
            PixelDimensions { width: 1, height: 1 }
        }
        fn clear_frame(&mut self) -> Result<(), Error> {
            Ok(())
        }
        fn read_pixels(&mut self, acq: &Acquisition, buf: &mut [u16]) -> Result<(), Error> {
            if self.fail {
                return Err(Error::CameraRead("unplugged".to_string()));
            }
            camera::check_buffer(acq, buf)?;
            buf[..acq.sample_count()].fill(self.value);
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeScreen {
        size: (usize, usize),
        painted: Vec<(u32, u32, [u8; 3])>,
    }

    impl Screen for FakeScreen {
        fn viewport(&self) -> (usize, usize) {
            self.size
        }
        fn paint(&mut self, image: &RgbImage) {
            let (w, h) = image.dimensions();
            let first = image.pixels().next().map(|p| p.0).unwrap_or_default();
            self.painted.push((w, h, first));
        }
    }

    fn attached(value: u16, fail: bool) -> Attachment {
        let cam = FlatCamera { value, fail };
        Attachment::Attached(camera::attach_camera(Box::new(cam)).unwrap())
    }

    fn run_tick(app: &mut FocusApp, screen: &mut FakeScreen) -> bool {
        app.poll_tick(Instant::now() + Duration::from_secs(1), screen)
    }

    #[test]
    fn detached_never_ticks() {
        let mut app = FocusApp::new(Attachment::Detached, DEFAULT_INTERVAL, Instant::now());
        assert!(!app.tick_armed());
        let mut screen = FakeScreen { size: (100, 100), ..Default::default() };
        assert!(!run_tick(&mut app, &mut screen));
        assert!(screen.painted.is_empty());
        assert_eq!(app.status()[STATUS_ATTACHED], "Attached: None");
        assert!(matches!(app.attachment(), Attachment::Detached));
    }

    #[test]
    fn initial_status_fields() {
        let app = FocusApp::new(attached(0, false), DEFAULT_INTERVAL, Instant::now());
        assert_eq!(app.status()[STATUS_ATTACHED], "Attached: MX-5");
        assert_eq!(app.status()[STATUS_ZOOM], "Bin: 4X4");
        assert_eq!(app.status()[STATUS_MIN], "");
        assert_eq!(app.status()[STATUS_MAX], "");
        assert!(matches!(app.attachment(), Attachment::Attached(_)));
        assert!(app.tick_armed());
        assert!(!app.red_filter());
    }

    #[test]
    fn tick_waits_for_its_deadline() {
        let now = Instant::now();
        let mut app = FocusApp::new(attached(0, false), DEFAULT_INTERVAL, now);
        let mut screen = FakeScreen { size: (100, 100), ..Default::default() };
        assert!(!app.poll_tick(now, &mut screen));
        assert!(app.poll_tick(now + DEFAULT_INTERVAL, &mut screen));
    }

    #[test]
    fn tick_paints_and_publishes_min_max() {
        let mut app = FocusApp::new(attached(0x4321, false), DEFAULT_INTERVAL, Instant::now());
        let mut screen = FakeScreen { size: (640, 480), ..Default::default() };
        assert!(run_tick(&mut app, &mut screen));

        // default zoom bins 4x4
        assert_eq!(screen.painted, vec![(128, 128, [0x43, 0x43, 0x43])]);
        assert_eq!(app.status()[STATUS_MIN], "Min: 17185");
        assert_eq!(app.status()[STATUS_MAX], "Max: 17185");
        // rearmed for the next frame
        assert!(app.tick_armed());
    }

    #[test]
    fn red_filter_and_zoom_reach_the_next_tick() {
        let mut app = FocusApp::new(attached(0xFF00, false), DEFAULT_INTERVAL, Instant::now());
        let mut screen = FakeScreen { size: (640, 480), ..Default::default() };
        app.handle(Action::ToggleFilter);
        for _ in 0..4 {
            app.handle(Action::ZoomIn);
        }
        assert_eq!(app.status()[STATUS_ZOOM], "Zoom: 4X");
        run_tick(&mut app, &mut screen);
        assert_eq!(screen.painted, vec![(128, 128, [0xFF, 0, 0])]);
    }

    #[test]
    fn empty_viewport_skips_paint_but_not_stats() {
        let mut app = FocusApp::new(attached(7, false), DEFAULT_INTERVAL, Instant::now());
        let mut screen = FakeScreen { size: (0, 480), ..Default::default() };
        run_tick(&mut app, &mut screen);
        assert!(screen.painted.is_empty());
        assert_eq!(app.status()[STATUS_MIN], "Min: 7");
        assert!(app.tick_armed());
    }

    #[test]
    fn failed_read_skips_frame_and_rearms() {
        let mut app = FocusApp::new(attached(7, true), DEFAULT_INTERVAL, Instant::now());
        let mut screen = FakeScreen { size: (640, 480), ..Default::default() };
        assert!(run_tick(&mut app, &mut screen));
        assert!(screen.painted.is_empty());
        assert_eq!(app.status()[STATUS_MIN], "");
        assert!(app.tick_armed());
    }

    #[test]
    fn zoom_clamps_through_handlers() {
        let mut app = FocusApp::new(Attachment::Detached, DEFAULT_INTERVAL, Instant::now());
        for _ in 0..10 {
            app.on_zoom_out();
        }
        assert_eq!(app.zoom().level(), -4);
        assert_eq!(app.status()[STATUS_ZOOM], "Bin: 16X16");
        for _ in 0..10 {
            app.on_zoom_in();
        }
        assert_eq!(app.zoom().level(), 4);
        assert_eq!(app.status()[STATUS_ZOOM], "Zoom: 16X");
    }

    #[test]
    fn filter_is_set_from_checked_state() {
        let mut app = FocusApp::new(Attachment::Detached, DEFAULT_INTERVAL, Instant::now());
        app.on_filter(true);
        app.on_filter(true);
        assert!(app.red_filter());
        app.handle(Action::ToggleFilter);
        assert!(!app.red_filter());
    }

    #[test]
    fn about_toggles_and_exit_stops() {
        let mut app = FocusApp::new(Attachment::Detached, DEFAULT_INTERVAL, Instant::now());
        app.handle(Action::About);
        assert!(app.about_visible());
        app.handle(Action::About);
        assert!(!app.about_visible());
        app.handle(Action::Exit);
        assert!(!app.is_running());
    }

    #[test]
    fn ticker_fires_once_per_arming() {
        let now = Instant::now();
        let mut t = Ticker::new(Duration::from_millis(100));
        assert!(!t.fire(now + Duration::from_secs(5)));
        t.start_once(now);
        assert!(!t.fire(now + Duration::from_millis(99)));
        assert!(t.fire(now + Duration::from_millis(100)));
        assert!(!t.fire(now + Duration::from_secs(5)));
    }
}
