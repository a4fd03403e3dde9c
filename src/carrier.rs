//! Carrier views: a flat, ordered sequence of byte-sized units whose LSBs hold the message.
//!
//! Two carriers are provided:
//!
//! - [`ByteCarrier`] over any byte buffer, one unit per byte
//! - [`PixelCarrier`] over an RGB image, one unit per pixel (the selected [`Channel`])
//!
//! Units are addressed row-major: flat index `i` of a `width x height` grid is the
//! pixel at `(i % width, i / width)`.

use crate::error::{Result, StegoError};
use image::RgbImage;
use std::ops::{Deref, DerefMut};

/// Grid dimensions of a carrier, in units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub width: usize,
    pub height: usize,
}

impl Geometry {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Units covered by the grid
    pub fn area(&self) -> usize {
        self.width.saturating_mul(self.height)
    }
}

/// Read access to carrier units
pub trait Carrier {
    /// Total addressable units
    fn unit_count(&self) -> usize;

    /// Least significant bit of the unit at `index`
    fn get_lsb(&self, index: usize) -> Result<bool>;

    /// Grid dimensions, when the carrier has any
    fn geometry(&self) -> Option<Geometry> {
        None
    }
}

/// Write access to carrier units
pub trait CarrierMut: Carrier {
    /// Overwrite bit 0 of the unit at `index`, leaving bits 1-7 alone
    fn set_lsb(&mut self, index: usize, bit: bool) -> Result<()>;
}

#[inline]
fn with_lsb(unit: u8, bit: bool) -> u8 {
    (unit & !1) | u8::from(bit)
}

fn check_index(index: usize, unit_count: usize) -> Result<()> {
    if index >= unit_count {
        return Err(StegoError::OutOfRange { index, unit_count });
    }
    Ok(())
}

/// A raw byte buffer carrier
#[derive(Debug)]
pub struct ByteCarrier<B> {
    buf: B,
    geometry: Option<Geometry>,
}

impl<B: AsRef<[u8]>> ByteCarrier<B> {
    pub fn new(buf: B) -> Self {
        Self {
            buf,
            geometry: None,
        }
    }

    /// Attach a grid geometry so grid-based strategies can address the buffer.
    ///
    /// The grid must fit inside the buffer; trailing bytes past the grid stay
    /// addressable as ordinary units.
    pub fn with_geometry(buf: B, geometry: Geometry) -> Result<Self> {
        let len = buf.as_ref().len();
        if geometry.area() > len {
            return Err(StegoError::InvalidGeometry(format!(
                "{}x{} grid does not fit in {} bytes",
                geometry.width, geometry.height, len
            )));
        }
        Ok(Self {
            buf,
            geometry: Some(geometry),
        })
    }

    /// Geometry of a buffer split into rows of `width` bytes; a partial last row is ignored
    pub fn with_width(buf: B, width: usize) -> Result<Self> {
        if width == 0 {
            return Err(StegoError::InvalidGeometry("row width must be non-zero".into()));
        }
        let height = buf.as_ref().len() / width;
        Self::with_geometry(buf, Geometry::new(width, height))
    }
}

impl<B: AsRef<[u8]>> Carrier for ByteCarrier<B> {
    fn unit_count(&self) -> usize {
        self.buf.as_ref().len()
    }

    fn get_lsb(&self, index: usize) -> Result<bool> {
        let bytes = self.buf.as_ref();
        check_index(index, bytes.len())?;
        Ok(bytes[index] & 1 == 1)
    }

    fn geometry(&self) -> Option<Geometry> {
        self.geometry
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> CarrierMut for ByteCarrier<B> {
    fn set_lsb(&mut self, index: usize, bit: bool) -> Result<()> {
        let bytes = self.buf.as_mut();
        check_index(index, bytes.len())?;
        bytes[index] = with_lsb(bytes[index], bit);
        Ok(())
    }
}

/// Colour channel of an RGB pixel used as the carrier unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Channel {
    #[default]
    Red,
    Green,
    Blue,
}

impl Channel {
    pub fn index(self) -> usize {
        match self {
            Channel::Red => 0,
            Channel::Green => 1,
            Channel::Blue => 2,
        }
    }
}

impl std::str::FromStr for Channel {
    type Err = StegoError;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "red" | "r" | "0" => Ok(Self::Red),
            "green" | "g" | "1" => Ok(Self::Green),
            "blue" | "b" | "2" => Ok(Self::Blue),
            _ => Err(StegoError::InvalidChannel(s.to_string())),
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Channel::Red => "red",
            Channel::Green => "green",
            Channel::Blue => "blue",
        };
        f.write_str(name)
    }
}

/// An RGB image carrier, one unit per pixel
///
/// Wraps `&RgbImage` for extraction or `&mut RgbImage` for embedding.
#[derive(Debug)]
pub struct PixelCarrier<I> {
    image: I,
    channel: Channel,
}

impl<I: Deref<Target = RgbImage>> PixelCarrier<I> {
    pub fn new(image: I, channel: Channel) -> Self {
        Self { image, channel }
    }

    fn coords(&self, index: usize) -> Result<(u32, u32)> {
        check_index(index, self.unit_count())?;
        let width = self.image.width() as usize;
        Ok(((index % width) as u32, (index / width) as u32))
    }
}

impl<I: Deref<Target = RgbImage>> Carrier for PixelCarrier<I> {
    fn unit_count(&self) -> usize {
        self.image.width() as usize * self.image.height() as usize
    }

    fn get_lsb(&self, index: usize) -> Result<bool> {
        let (x, y) = self.coords(index)?;
        Ok(self.image.get_pixel(x, y).0[self.channel.index()] & 1 == 1)
    }

    fn geometry(&self) -> Option<Geometry> {
        Some(Geometry::new(
            self.image.width() as usize,
            self.image.height() as usize,
        ))
    }
}

impl<I: DerefMut<Target = RgbImage>> CarrierMut for PixelCarrier<I> {
    fn set_lsb(&mut self, index: usize, bit: bool) -> Result<()> {
        let (x, y) = self.coords(index)?;
        let channel = self.channel.index();
        let pixel = self.image.get_pixel_mut(x, y);
        pixel.0[channel] = with_lsb(pixel.0[channel], bit);
        Ok(())
    }
}
