// Zoom level and the sensor region it selects.
// Negative levels bin the full field; positive levels crop a centered window
// and read it unbinned.

pub const MIN_ZOOM: i32 = -4;
pub const MAX_ZOOM: i32 = 4;

/// Sensor size in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameDimensions {
    pub width: u32,
    pub height: u32,
    pub depth: u32, // bits per sample
}

/// Physical pixel size; only the ratio matters here.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelDimensions {
    pub width: u32,
    pub height: u32,
}

/// What to ask the camera for on one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Acquisition {
    pub x_offset: u32,
    pub y_offset: u32,
    pub width: u32, // region on the sensor, before binning
    pub height: u32,
    pub bin: u32, // same on both axes
    pub out_width: u32, // samples delivered per row
    pub out_height: u32,
}

impl Acquisition {
    /// Number of samples the camera writes for this request.
    pub fn sample_count(&self) -> usize {
        self.out_width as usize * self.out_height as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ZoomLevel(i32);

impl Default for ZoomLevel {
    /// 4x4 binning.
    fn default() -> Self {
        ZoomLevel(-2)
    }
}

impl ZoomLevel {
    pub fn new(level: i32) -> Self {
        ZoomLevel(level.clamp(MIN_ZOOM, MAX_ZOOM))
    }

    pub fn level(self) -> i32 {
        self.0
    }

    pub fn zoom_in(&mut self) {
        *self = ZoomLevel::new(self.0 + 1);
    }

    pub fn zoom_out(&mut self) {
        *self = ZoomLevel::new(self.0 - 1);
    }

    pub fn acquisition(self, sensor: FrameDimensions) -> Acquisition {
        if self.0 < 1 {
            let shift = (-self.0) as u32;
            Acquisition {
                x_offset: 0,
                y_offset: 0,
                width: sensor.width,
                height: sensor.height,
                bin: 1 << shift,
                out_width: sensor.width >> shift,
                out_height: sensor.height >> shift,
            }
        } else {
            let shift = self.0 as u32;
            let width = sensor.width >> shift;
            let height = sensor.height >> shift;
            Acquisition {
                x_offset: (sensor.width - width) / 2,
                y_offset: (sensor.height - height) / 2,
                width,
                height,
                bin: 1,
                out_width: width,
                out_height: height,
            }
        }
    }

    /// Status bar text: `Bin: 4X4` or `Zoom: 2X`.
    pub fn status_text(self) -> String {
        if self.0 < 1 {
            let bin = 1 << -self.0;
            format!("Bin: {bin}X{bin}")
        } else {
            format!("Zoom: {}X", 1 << self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SENSOR: FrameDimensions = FrameDimensions { width: 512, height: 512, depth: 16 };

    #[test]
    fn negative_levels_bin_the_full_sensor() {
        for level in MIN_ZOOM..0 {
            let acq = ZoomLevel::new(level).acquisition(SENSOR);
            let bin = 1u32 << -level;
            assert_eq!((acq.x_offset, acq.y_offset), (0, 0));
            assert_eq!((acq.width, acq.height), (512, 512));
            assert_eq!(acq.bin, bin);
            assert_eq!((acq.out_width, acq.out_height), (512 / bin, 512 / bin));
        }
    }

    #[test]
    fn positive_levels_crop_centered() {
        for level in 1..=MAX_ZOOM {
            let acq = ZoomLevel::new(level).acquisition(SENSOR);
            let size = 512 >> level;
            assert_eq!(acq.bin, 1);
            assert_eq!((acq.width, acq.height), (size, size));
            assert_eq!((acq.out_width, acq.out_height), (size, size));
            assert_eq!(acq.x_offset, (512 - size) / 2);
            assert_eq!(acq.y_offset, (512 - size) / 2);
        }
    }

    #[test]
    fn zero_is_full_frame_unbinned() {
        let acq = ZoomLevel::new(0).acquisition(SENSOR);
        assert_eq!(acq.bin, 1);
        assert_eq!(acq.sample_count(), 512 * 512);
    }

    #[test]
    fn bin_four_and_zoom_two_on_512() {
        let binned = ZoomLevel::new(-2).acquisition(SENSOR);
        assert_eq!((binned.x_offset, binned.y_offset, binned.bin), (0, 0, 4));
        assert_eq!((binned.width, binned.height), (512, 512));

        let zoomed = ZoomLevel::new(2).acquisition(SENSOR);
        assert_eq!((zoomed.width, zoomed.height), (128, 128));
        assert_eq!((zoomed.x_offset, zoomed.y_offset), (192, 192));
        assert_eq!(zoomed.bin, 1);
    }

    #[test]
    fn odd_sensor_offsets_truncate() {
        let sensor = FrameDimensions { width: 1391, height: 1039, depth: 16 };
        let acq = ZoomLevel::new(1).acquisition(sensor);
        assert_eq!((acq.width, acq.height), (695, 519));
        assert_eq!((acq.x_offset, acq.y_offset), (348, 260));
    }

    #[test]
    fn stepping_clamps_at_both_ends() {
        let mut z = ZoomLevel::new(MAX_ZOOM);
        z.zoom_in();
        assert_eq!(z.level(), MAX_ZOOM);

        let mut z = ZoomLevel::new(MIN_ZOOM);
        z.zoom_out();
        assert_eq!(z.level(), MIN_ZOOM);

        assert_eq!(ZoomLevel::new(17).level(), MAX_ZOOM);
    }

    #[test]
    fn status_text_names_bin_or_zoom() {
        assert_eq!(ZoomLevel::default().status_text(), "Bin: 4X4");
        assert_eq!(ZoomLevel::new(0).status_text(), "Bin: 1X1");
        assert_eq!(ZoomLevel::new(3).status_text(), "Zoom: 8X");
    }
}
