// Starlight Xpress cameras through the vendor `sxccd` library.
// Only camera index 0 is used.

use crate::camera::{Camera, check_buffer};
use crate::error::Error;
use crate::geometry::{Acquisition, FrameDimensions, PixelDimensions};
use crate::model::CameraModel;
use std::os::raw::{c_int, c_uint, c_ushort};

/// Read both interlaced fields.
const EXP_FLAGS_FIELD_BOTH: c_int = 0x03;
const CAMERA: c_int = 0;

#[link(name = "sxccd")]
unsafe extern "C" {
    fn sxOpen(defmodel: c_int) -> c_int;
    fn sxClose();
    fn sxGetModel(camidx: c_int) -> c_int;
    fn sxGetFrameDimensions(camidx: c_int, width: *mut c_uint, height: *mut c_uint, depth: *mut c_uint) -> c_int;
    fn sxGetPixelDimensions(camidx: c_int, width: *mut c_uint, height: *mut c_uint) -> c_int;
    fn sxClearFrame(camidx: c_int, options: c_int) -> c_int;
    fn sxReadPixels(
        camidx: c_int,
        options: c_int,
        xoffset: c_uint,
        yoffset: c_uint,
        width: c_uint,
        height: c_uint,
        xbin: c_uint,
        ybin: c_uint,
        pixbuf: *mut c_ushort,
    ) -> c_int;
}

pub struct SxCamera {
    model: CameraModel,
    frame: FrameDimensions,
    pixels: PixelDimensions,
}

impl SxCamera {
    /// Open the first camera on the bus; `hint` is used for cameras that
    /// cannot report their own model.
    pub fn open(hint: CameraModel) -> Result<Self, Error> {
        // SAFETY: plain value arguments; the library owns its handles.
        let found = unsafe { sxOpen(c_int::from(hint.code())) };
        if found <= 0 {
            return Err(Error::CameraOpen("no SX camera found".to_string()));
        }

        let (mut w, mut h, mut depth): (c_uint, c_uint, c_uint) = (0, 0, 0);
        let (mut pw, mut ph): (c_uint, c_uint) = (0, 0);
        // SAFETY: out-pointers reference live locals.
        let model = unsafe {
            sxGetFrameDimensions(CAMERA, &mut w, &mut h, &mut depth);
            sxGetPixelDimensions(CAMERA, &mut pw, &mut ph);
            sxGetModel(CAMERA)
        };
        if w == 0 || h == 0 {
            return Err(Error::CameraOpen("camera reported an empty frame".to_string()));
        }

        Ok(Self {
            model: CameraModel(model as u8),
            frame: FrameDimensions { width: w, height: h, depth },
            // Some heads report 0; fall back to square pixels.
            pixels: PixelDimensions { width: pw.max(1), height: ph.max(1) },
        })
    }
}

impl Camera for SxCamera {
    fn model(&self) -> CameraModel {
        self.model
    }

    fn frame_dimensions(&self) -> FrameDimensions {
        self.frame
    }

    fn pixel_dimensions(&self) -> PixelDimensions {
        self.pixels
    }

    fn clear_frame(&mut self) -> Result<(), Error> {
        // SAFETY: value arguments only.
        unsafe { sxClearFrame(CAMERA, EXP_FLAGS_FIELD_BOTH) };
        Ok(())
    }

    fn read_pixels(&mut self, acq: &Acquisition, buf: &mut [u16]) -> Result<(), Error> {
        check_buffer(acq, buf)?;
        // SAFETY: `buf` holds at least out_width * out_height samples, which is
        // what the library writes for this region and bin.
        let read = unsafe {
            sxReadPixels(
                CAMERA,
                EXP_FLAGS_FIELD_BOTH,
                acq.x_offset,
                acq.y_offset,
                acq.width,
                acq.height,
                acq.bin,
                acq.bin,
                buf.as_mut_ptr(),
            )
        };
        if read < 0 {
            return Err(Error::CameraRead(format!("sxReadPixels returned {read}")));
        }
        Ok(())
    }
}

impl Drop for SxCamera {
    fn drop(&mut self) {
        // SAFETY: called once, after the last read.
        unsafe { sxClose() };
    }
}
