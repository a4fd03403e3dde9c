use crate::carrier::{ByteCarrier, Channel, PixelCarrier};
use crate::codec::{Capacity, Codec};
use crate::error::{Result, StegoError};
use crate::image_io::{load_raw, load_rgb, save_raw, save_rgb};
use image::RgbImage;
use log::warn;
use std::path::Path;

/// How a carrier file is interpreted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CarrierOptions {
    /// Treat the file as a flat byte buffer instead of an image
    pub raw: bool,
    /// Pixel channel for image carriers
    pub channel: Channel,
    /// Row width that gives a raw carrier a grid
    pub width: Option<usize>,
}

/// A carrier file loaded into memory
#[derive(Debug, Clone)]
pub enum LoadedCarrier {
    Pixels { image: RgbImage, channel: Channel },
    Raw { data: Vec<u8>, width: Option<usize> },
}

impl LoadedCarrier {
    pub fn load(path: &Path, options: &CarrierOptions) -> Result<Self> {
        if options.raw {
            if options.width == Some(0) {
                return Err(StegoError::InvalidGeometry("row width must be non-zero".into()));
            }
            return Ok(Self::Raw {
                data: load_raw(path)?,
                width: options.width,
            });
        }

        if options.width.is_some() {
            warn!("--width only applies to raw carriers; using image dimensions");
        }
        Ok(Self::Pixels {
            image: load_rgb(path)?,
            channel: options.channel,
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        match self {
            Self::Pixels { image, .. } => save_rgb(path, image),
            Self::Raw { data, .. } => save_raw(path, data),
        }
    }

    pub fn embed(&mut self, codec: &Codec, message: &[u8]) -> Result<usize> {
        match self {
            Self::Pixels { image, channel } => {
                codec.embed(&mut PixelCarrier::new(image, *channel), message)
            }
            Self::Raw { data, width: None } => codec.embed(&mut ByteCarrier::new(data), message),
            Self::Raw {
                data,
                width: Some(width),
            } => codec.embed(&mut ByteCarrier::with_width(data, *width)?, message),
        }
    }

    pub fn extract(&self, codec: &Codec) -> Result<Vec<u8>> {
        match self {
            Self::Pixels { image, channel } => codec.extract(&PixelCarrier::new(image, *channel)),
            Self::Raw { data, width: None } => codec.extract(&ByteCarrier::new(data)),
            Self::Raw {
                data,
                width: Some(width),
            } => codec.extract(&ByteCarrier::with_width(data, *width)?),
        }
    }

    pub fn capacity(&self, codec: &Codec) -> Result<Capacity> {
        match self {
            Self::Pixels { image, channel } => codec.capacity(&PixelCarrier::new(image, *channel)),
            Self::Raw { data, width: None } => codec.capacity(&ByteCarrier::new(data)),
            Self::Raw {
                data,
                width: Some(width),
            } => codec.capacity(&ByteCarrier::with_width(data, *width)?),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Pixels { .. } => "image",
            Self::Raw { .. } => "raw",
        }
    }
}
