// SX camera model code and the `-m` override string.
//
// The model byte packs three things:
//   0x40  interleaved (M-series) head
//   0x80  color sensor
//   0x3F  model number (5, 7, 9, ...)

use std::fmt;

pub const INTERLEAVE: u8 = 0x40;
pub const COLOR: u8 = 0x80;
pub const NUMBER_MASK: u8 = 0x3F;

/// Model code passed to the SDK as the default when the camera does not
/// identify itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CameraModel(pub u8);

impl Default for CameraModel {
    /// MX5
    fn default() -> Self {
        CameraModel(INTERLEAVE | 5)
    }
}

/// A character of the override string that could not be used.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ModelWarning {
    #[error("Invalid SX designation.")]
    InvalidDesignation,
    #[error("Invalid model type designation.")]
    InvalidType,
    #[error("Invalid model number designation.")]
    InvalidNumber,
}

impl CameraModel {
    pub fn code(self) -> u8 {
        self.0
    }

    pub fn is_interleaved(self) -> bool {
        self.0 & INTERLEAVE != 0
    }

    pub fn is_color(self) -> bool {
        self.0 & COLOR != 0
    }

    pub fn number(self) -> u8 {
        self.0 & NUMBER_MASK
    }

    /// Apply a `[H|M]X[5|7|9][C]` override in place.
    ///
    /// Unusable characters leave their bits alone and are reported back; when
    /// the second character is not `X` nothing changes at all. Missing
    /// trailing characters count as blanks, so `"HX9"` clears the color bit.
    pub fn apply_override(&mut self, designation: &str) -> Vec<ModelWarning> {
        let chars: Vec<char> = designation.chars().collect();
        let at = |i: usize| chars.get(i).copied().unwrap_or(' ').to_ascii_uppercase();

        if at(1) != 'X' {
            return vec![ModelWarning::InvalidDesignation];
        }

        let mut warnings = Vec::new();
        match at(0) {
            'H' => self.0 &= !INTERLEAVE,
            'M' => self.0 |= INTERLEAVE,
            _ => warnings.push(ModelWarning::InvalidType),
        }
        match at(2) {
            d @ ('5' | '7' | '9') => {
                self.0 = (self.0 & (INTERLEAVE | COLOR)) | (d as u8 - b'0');
            }
            _ => warnings.push(ModelWarning::InvalidNumber),
        }
        if at(3) == 'C' {
            self.0 |= COLOR;
        } else {
            self.0 &= !COLOR;
        }
        warnings
    }
}

impl fmt::Display for CameraModel {
    /// `MX-5`, `HX-9`, ...
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let head = if self.is_interleaved() { 'M' } else { 'H' };
        write!(f, "{}X-{}", head, self.number())
    }
}
