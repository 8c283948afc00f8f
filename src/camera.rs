// Camera access. The renderer only sees the `Camera` trait; backends live in
// submodules. Visual expectation: after `attach()` succeeds, each call to
// `read_pixels()` fills the sample buffer with the region the zoom level asks for.

pub mod sim;
#[cfg(feature = "sxccd")]
pub mod sxccd;

use crate::error::Error;
use crate::geometry::{Acquisition, FrameDimensions, PixelDimensions};
use crate::model::CameraModel;
use tracing::{info, warn};

/// The operations the focus loop needs from a camera.
pub trait Camera {
    /// Model code the camera reports about itself.
    fn model(&self) -> CameraModel;
    fn frame_dimensions(&self) -> FrameDimensions;
    fn pixel_dimensions(&self) -> PixelDimensions;
    /// Wipe accumulated charge before the first read.
    fn clear_frame(&mut self) -> Result<(), Error>;
    /// Fill `buf` with `acq.out_width * acq.out_height` samples, row-major.
    fn read_pixels(&mut self, acq: &Acquisition, buf: &mut [u16]) -> Result<(), Error>;
}

/// Which backend `attach()` should try.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backend {
    /// The vendor SDK (needs the `sxccd` feature).
    Sx,
    /// Synthetic star field.
    Simulated,
}

/// Result of trying to open a camera at startup.
pub enum Attachment {
    Attached(AttachedCamera),
    /// Nothing answered: 512x512 placeholder, no sample buffer.
    Detached,
}

/// An open camera together with the sample buffer reused on every tick.
pub struct AttachedCamera {
    pub camera: Box<dyn Camera>,
    pub model: CameraModel,
    pub frame: FrameDimensions,
    pub pixels: PixelDimensions,
    pub samples: Vec<u16>,
}

pub const DETACHED_FRAME: FrameDimensions = FrameDimensions { width: 512, height: 512, depth: 16 };
pub const DETACHED_PIXELS: PixelDimensions = PixelDimensions { width: 1, height: 1 };

impl Attachment {
    pub fn frame(&self) -> FrameDimensions {
        match self {
            Attachment::Attached(a) => a.frame,
            Attachment::Detached => DETACHED_FRAME,
        }
    }

    pub fn pixels(&self) -> PixelDimensions {
        match self {
            Attachment::Attached(a) => a.pixels,
            Attachment::Detached => DETACHED_PIXELS,
        }
    }

    /// Model code; 0 when nothing is attached.
    pub fn model(&self) -> CameraModel {
        match self {
            Attachment::Attached(a) => a.model,
            Attachment::Detached => CameraModel(0),
        }
    }

    /// Status bar text: `Attached: MX-5` or `Attached: None`.
    pub fn status_text(&self) -> String {
        match self {
            Attachment::Attached(a) => format!("Attached: {}", a.model),
            Attachment::Detached => "Attached: None".to_string(),
        }
    }
}

/// Open a backend-specific camera with `hint` as the fallback model.
pub fn open(backend: Backend, hint: CameraModel) -> Result<Box<dyn Camera>, Error> {
    match backend {
        Backend::Simulated => Ok(Box::new(sim::SimCamera::new(hint))),
        #[cfg(feature = "sxccd")]
        Backend::Sx => Ok(Box::new(sxccd::SxCamera::open(hint)?)),
        #[cfg(not(feature = "sxccd"))]
        Backend::Sx => Err(Error::CameraOpen(
            "built without the `sxccd` feature".to_string(),
        )),
    }
}

/// Take over an opened camera: clear it once and size the sample buffer.
pub fn attach_camera(mut camera: Box<dyn Camera>) -> Result<AttachedCamera, Error> {
    let model = camera.model();
    let frame = camera.frame_dimensions();
    let pixels = camera.pixel_dimensions();
    camera.clear_frame()?;
    let samples = vec![0u16; frame.width as usize * frame.height as usize];
    info!(%model, color = model.is_color(), width = frame.width, height = frame.height, depth = frame.depth, "camera attached");
    Ok(AttachedCamera { camera, model, frame, pixels, samples })
}

/// Open and attach, falling back to `Detached` on any failure.
pub fn attach(backend: Backend, hint: CameraModel) -> Attachment {
    match open(backend, hint).and_then(attach_camera) {
        Ok(a) => Attachment::Attached(a),
        Err(e) => {
            warn!(error = %e, "no camera attached");
            Attachment::Detached
        }
    }
}

/// Reject a read that would run past the end of `buf`.
pub fn check_buffer(acq: &Acquisition, buf: &[u16]) -> Result<(), Error> {
    let needed = acq.sample_count();
    if buf.len() < needed {
        return Err(Error::BufferTooSmall { needed, got: buf.len() });
    }
    Ok(())
}
