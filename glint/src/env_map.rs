use glam::{vec3, UVec2, Vec3};
use image::DynamicImage;

use crate::{Error, Result};

/// Equirectangular environment map with floating-point texels, stored
/// row-by-row; `+Y` is up, the top row looks straight up.
#[derive(Clone, Debug, PartialEq)]
pub struct EnvMap {
    size: UVec2,
    channels: u32,
    texels: Vec<f32>,
}

impl EnvMap {
    /// Creates an environment map out of raw texels.
    ///
    /// The channel layout isn't validated here - maps with unsupported
    /// layouts are rejected once lighting gets rebuilt (see
    /// [`Self::radiance()`]).
    pub fn new(size: UVec2, channels: u32, texels: Vec<f32>) -> Result<Self> {
        let expected =
            (size.x as usize) * (size.y as usize) * (channels as usize);

        if size.x == 0 || size.y == 0 || texels.len() != expected {
            return Err(Error::configuration(format!(
                "environment map of size {}x{} with {} channels needs {} \
                 texel values, got {}",
                size.x,
                size.y,
                channels,
                expected,
                texels.len()
            )));
        }

        Ok(Self {
            size,
            channels,
            texels,
        })
    }

    pub fn from_image(image: &DynamicImage) -> Result<Self> {
        let size = UVec2::new(image.width(), image.height());

        match image {
            DynamicImage::ImageRgb32F(image) => {
                Self::new(size, 3, image.as_raw().clone())
            }
            DynamicImage::ImageRgba32F(image) => {
                Self::new(size, 4, image.as_raw().clone())
            }
            image => Err(Error::build(format!(
                "environment map: expected a floating-point image, got {:?}",
                image.color()
            ))),
        }
    }

    pub fn size(&self) -> UVec2 {
        self.size
    }

    pub fn channels(&self) -> u32 {
        self.channels
    }

    /// Returns the radiance of each texel, treating single-channel maps as
    /// grayscale and ignoring alpha.
    pub fn radiance(&self) -> Result<Vec<Vec3>> {
        let channels = self.channels as usize;

        match channels {
            1 => Ok(self.texels.iter().map(|&t| Vec3::splat(t)).collect()),

            3 | 4 => Ok(self
                .texels
                .chunks_exact(channels)
                .map(|t| vec3(t[0], t[1], t[2]))
                .collect()),

            _ => Err(Error::build(format!(
                "environment map: unsupported number of channels ({})",
                channels
            ))),
        }
    }
}
