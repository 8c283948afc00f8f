// Synthetic camera: a fixed star field whose focus drifts in and out from one
// read to the next, so the preview behaves like a telescope being focused.

use crate::camera::{Camera, check_buffer};
use crate::error::Error;
use crate::geometry::{Acquisition, FrameDimensions, PixelDimensions};
use crate::model::CameraModel;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SENSOR: FrameDimensions = FrameDimensions { width: 1024, height: 768, depth: 16 };
const STAR_COUNT: usize = 60;
const SKY_LEVEL: u16 = 1500;
const SKY_NOISE: u16 = 400;
const SEED: u64 = 0x5846_4f43;

struct Star {
    x: f32,
    y: f32,
    peak: f32,
}

pub struct SimCamera {
    model: CameraModel,
    stars: Vec<Star>,
    sensor: Vec<u16>, // full-resolution exposure
    reads: u64,
    rng: StdRng,
}

impl SimCamera {
    pub fn new(model: CameraModel) -> Self {
        let mut rng = StdRng::seed_from_u64(SEED);
        let stars = (0..STAR_COUNT)
            .map(|_| Star {
                x: rng.gen_range(0.0..SENSOR.width as f32),
                y: rng.gen_range(0.0..SENSOR.height as f32),
                peak: rng.gen_range(4_000.0..60_000.0),
            })
            .collect();
        Self {
            model,
            stars,
            sensor: vec![0; SENSOR.width as usize * SENSOR.height as usize],
            reads: 0,
            rng,
        }
    }

    /// Star width for the current read: sharp at best focus, bloated either side.
    fn sigma(&self) -> f32 {
        let phase = self.reads as f32 * 0.05;
        0.8 + 4.0 * phase.sin().abs()
    }

    fn expose(&mut self) {
        let w = SENSOR.width as i32;
        let h = SENSOR.height as i32;
        for px in self.sensor.iter_mut() {
            *px = SKY_LEVEL + self.rng.gen_range(0..SKY_NOISE);
        }

        let sigma = self.sigma();
        let two_s2 = 2.0 * sigma * sigma;
        // Total flux stays the same as the star spreads out.
        let flux_scale = (0.8 * 0.8) / (sigma * sigma);
        let radius = (4.0 * sigma).ceil() as i32;
        for star in &self.stars {
            let cx = star.x as i32;
            let cy = star.y as i32;
            for y in (cy - radius).max(0)..=(cy + radius).min(h - 1) {
                for x in (cx - radius).max(0)..=(cx + radius).min(w - 1) {
                    let dx = x as f32 - star.x;
                    let dy = y as f32 - star.y;
                    let v = star.peak * flux_scale * (-(dx * dx + dy * dy) / two_s2).exp();
                    let idx = (y * w + x) as usize;
                    self.sensor[idx] = self.sensor[idx].saturating_add(v as u16);
                }
            }
        }
    }
}

impl Camera for SimCamera {
    fn model(&self) -> CameraModel {
        self.model
    }

    fn frame_dimensions(&self) -> FrameDimensions {
        SENSOR
    }

    fn pixel_dimensions(&self) -> PixelDimensions {
        PixelDimensions { width: 1, height: 1 }
    }

    fn clear_frame(&mut self) -> Result<(), Error> {
        self.sensor.fill(0);
        Ok(())
    }

    /// Binning averages each `bin x bin` block.
    fn read_pixels(&mut self, acq: &Acquisition, buf: &mut [u16]) -> Result<(), Error> {
        check_buffer(acq, buf)?;
        if acq.x_offset + acq.width > SENSOR.width || acq.y_offset + acq.height > SENSOR.height {
            return Err(Error::CameraRead(format!(
                "region {}x{}+{}+{} outside the sensor",
                acq.width, acq.height, acq.x_offset, acq.y_offset
            )));
        }
        self.expose();
        self.reads += 1;

        let bin = acq.bin as usize;
        let stride = SENSOR.width as usize;
        let area = (bin * bin) as u32;
        for oy in 0..acq.out_height as usize {
            for ox in 0..acq.out_width as usize {
                let x0 = acq.x_offset as usize + ox * bin;
                let y0 = acq.y_offset as usize + oy * bin;
                let mut sum = 0u32;
                for y in y0..y0 + bin {
                    let row = &self.sensor[y * stride + x0..y * stride + x0 + bin];
                    sum += row.iter().map(|&v| v as u32).sum::<u32>();
                }
                buf[oy * acq.out_width as usize + ox] = (sum / area) as u16;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::ZoomLevel;

    #[test]
    fn binned_read_stays_above_sky() {
        let mut cam = SimCamera::new(CameraModel::default());
        let acq = ZoomLevel::new(-2).acquisition(cam.frame_dimensions());
        let mut buf = vec![0u16; acq.sample_count()];
        cam.read_pixels(&acq, &mut buf).unwrap();
        assert!(buf.iter().all(|&v| v >= SKY_LEVEL));
    }

    #[test]
    fn focus_drifts_between_reads() {
        let mut cam = SimCamera::new(CameraModel::default());
        let acq = ZoomLevel::new(0).acquisition(cam.frame_dimensions());
        let mut buf = vec![0u16; acq.sample_count()];
        let first = cam.sigma();
        for _ in 0..5 {
            cam.read_pixels(&acq, &mut buf).unwrap();
        }
        assert_ne!(first, cam.sigma());
        // some star is above the sky
        assert!(buf.iter().any(|&v| v > SKY_LEVEL + SKY_NOISE));
    }

    #[test]
    fn cropped_read_fits_buffer() {
        let mut cam = SimCamera::new(CameraModel::default());
        let acq = ZoomLevel::new(4).acquisition(cam.frame_dimensions());
        assert_eq!((acq.out_width, acq.out_height), (64, 48));
        let mut buf = vec![0u16; acq.sample_count()];
        assert!(cam.read_pixels(&acq, &mut buf).is_ok());
    }

    #[test]
    fn region_outside_sensor_is_an_error() {
        let mut cam = SimCamera::new(CameraModel::default());
        let acq = Acquisition {
            x_offset: 1000,
            y_offset: 0,
            width: 100,
            height: 10,
            bin: 1,
            out_width: 100,
            out_height: 10,
        };
        let mut buf = vec![0u16; acq.sample_count()];
        assert!(matches!(cam.read_pixels(&acq, &mut buf), Err(Error::CameraRead(_))));
    }
}
