//! lsbstego - Least Significant Bit steganography
//!
//! Hides a byte message in the least significant bits of a carrier (the pixels
//! of an image, or any raw byte buffer) and recovers it again. Only bit 0 of a
//! selected unit is ever changed.
//!
//! ## Protocol
//!
//! ```text
//! message → bits (MSB first) → + 8 zero bits → one bit per selected unit LSB
//! ```
//!
//! Extraction walks the same units in the same order and stops at the first
//! 8-bit aligned zero byte. Which units are selected is decided by a [`Strategy`]:
//!
//! - **all**: every unit
//! - **nth:N**: units `0, N, 2N, ...`
//! - **diagonal**: the main diagonal of the carrier grid
//!
//! The payload is neither encrypted nor compressed.
//!
//! ## Example
//!
//! ```no_run
//! use lsbstego::{ByteCarrier, Codec, Strategy};
//!
//! let mut cover = std::fs::read("cover.bin").unwrap();
//! let codec = Codec::new(Strategy::EveryNth(7));
//!
//! codec.embed(&mut ByteCarrier::new(&mut cover), b"meet at dawn").unwrap();
//! let message = codec.extract(&ByteCarrier::new(&cover)).unwrap();
//! assert_eq!(message, b"meet at dawn");
//! ```

pub mod carrier;
pub mod cli;
pub mod codec;
pub mod error;
pub mod framing;
pub mod image_io;
pub mod selector;

pub use carrier::{ByteCarrier, Carrier, CarrierMut, Channel, Geometry, PixelCarrier};
pub use codec::{embed, extract, extract_strict, Capacity, Codec, ExtractPolicy};
pub use error::{Result, StegoError};
pub use selector::{Positions, Strategy};
