use crate::PixelStreamError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Color space of the raw pixel bytes flowing through a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorSpace {
    #[default]
    Rgb,
    Rgba,
    Cmyk,
    Gray,
    Graya,
    Indexed,
}

impl ColorSpace {
    pub const ALL: [ColorSpace; 6] = [
        ColorSpace::Rgb,
        ColorSpace::Rgba,
        ColorSpace::Cmyk,
        ColorSpace::Gray,
        ColorSpace::Graya,
        ColorSpace::Indexed,
    ];

    /// Number of byte components per pixel.
    pub fn components(&self) -> usize {
        match self {
            ColorSpace::Rgb => 3,
            ColorSpace::Rgba => 4,
            ColorSpace::Cmyk => 4,
            ColorSpace::Gray => 1,
            ColorSpace::Graya => 2,
            ColorSpace::Indexed => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ColorSpace::Rgb => "rgb",
            ColorSpace::Rgba => "rgba",
            ColorSpace::Cmyk => "cmyk",
            ColorSpace::Gray => "gray",
            ColorSpace::Graya => "graya",
            ColorSpace::Indexed => "indexed",
        }
    }

    /// Byte size of a `width` x `height` image in this color space.
    ///
    /// Returns `PixelStreamError::InvalidFormat` if the size does not fit in `usize`.
    pub fn frame_size(&self, width: u32, height: u32) -> Result<usize, PixelStreamError> {
        (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(self.components()))
            .ok_or_else(|| {
                PixelStreamError::InvalidFormat(format!(
                    "frame size overflow: {width}x{height} {self}"
                ))
            })
    }
}

impl FromStr for ColorSpace {
    type Err = PixelStreamError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        ColorSpace::ALL
            .into_iter()
            .find(|space| space.as_str() == name)
            .ok_or_else(|| PixelStreamError::UnknownColorSpace(name.to_string()))
    }
}

impl fmt::Display for ColorSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
