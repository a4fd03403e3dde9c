//! Embed and extract sentinel-framed messages through a position strategy.
//!
//! Each call is atomic with respect to the carrier: [`Codec::embed`] validates
//! capacity and bounds before the first write, so a failed embed leaves every
//! unit untouched. Callers must not run two calls against the same buffer at
//! once; the borrow rules already enforce this for safe code.

use crate::carrier::{Carrier, CarrierMut};
use crate::error::{Result, StegoError};
use crate::framing::{bitstream_len, from_bits, to_bitstream, TERMINATOR_BITS};
use crate::selector::{Positions, Strategy};
use log::{debug, info};
use serde::Serialize;

/// What extraction does when positions run out before the terminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractPolicy {
    /// Return the complete bytes decoded so far
    #[default]
    Lenient,
    /// Fail with [`StegoError::TerminatorNotFound`]
    Strict,
}

impl std::str::FromStr for ExtractPolicy {
    type Err = StegoError;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "lenient" => Ok(Self::Lenient),
            "strict" => Ok(Self::Strict),
            _ => Err(StegoError::InvalidPolicy(s.to_string())),
        }
    }
}

/// Capacity of a carrier under one strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Capacity {
    /// Units in the carrier
    pub units: usize,
    /// Units selected by the strategy
    pub positions: usize,
    /// Longest message that still fits with its terminator
    pub max_message_bytes: usize,
}

impl Capacity {
    /// Whether a message of `len` bytes fits
    pub fn fits(&self, len: usize) -> bool {
        bitstream_len(len) <= self.positions
    }
}

/// LSB codec configured with a strategy and extraction policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Codec {
    pub strategy: Strategy,
    pub policy: ExtractPolicy,
}

impl Codec {
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            policy: ExtractPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: ExtractPolicy) -> Self {
        self.policy = policy;
        self
    }

    fn select<C: Carrier + ?Sized>(&self, carrier: &C) -> Result<Positions> {
        let unit_count = carrier.unit_count();
        let positions = self.strategy.positions(unit_count, carrier.geometry())?;

        // A selector/carrier mismatch must surface before anything is read or written
        if let Some(last) = positions.last_index() {
            if last >= unit_count {
                return Err(StegoError::OutOfRange {
                    index: last,
                    unit_count,
                });
            }
        }

        debug!(
            "strategy {} selected {} of {} units",
            self.strategy,
            positions.len(),
            unit_count
        );
        Ok(positions)
    }

    /// Report how much the carrier can hold under this codec's strategy
    pub fn capacity<C: Carrier + ?Sized>(&self, carrier: &C) -> Result<Capacity> {
        let positions = self.select(carrier)?.len();
        Ok(Capacity {
            units: carrier.unit_count(),
            positions,
            max_message_bytes: (positions / 8).saturating_sub(1),
        })
    }

    /// Hide `message` in the carrier and return the number of bits written.
    ///
    /// Fails with [`StegoError::CapacityExceeded`] before any mutation when the
    /// framed message is longer than the selected positions.
    pub fn embed<C: CarrierMut + ?Sized>(&self, carrier: &mut C, message: &[u8]) -> Result<usize> {
        let positions = self.select(carrier)?;

        let needed = bitstream_len(message.len());
        let available = positions.len();
        if needed > available {
            return Err(StegoError::CapacityExceeded { needed, available });
        }

        let bits = to_bitstream(message);
        for (index, bit) in positions.zip(bits.iter().copied()) {
            carrier.set_lsb(index, bit)?;
        }

        info!(
            "embedded {} bytes as {} bits over {} available positions",
            message.len(),
            bits.len(),
            available
        );
        Ok(bits.len())
    }

    /// Recover a message hidden with the same strategy and carrier geometry
    pub fn extract<C: Carrier + ?Sized>(&self, carrier: &C) -> Result<Vec<u8>> {
        let positions = self.select(carrier)?;
        let limit = positions.len();

        // Pull LSBs lazily and stop at the first read failure
        let mut read_error = None;
        let bits = positions.map_while(|index| match carrier.get_lsb(index) {
            Ok(bit) => Some(bit),
            Err(err) => {
                read_error = Some(err);
                None
            }
        });
        let decoded = from_bits(bits, Some(limit));

        if let Some(err) = read_error {
            return Err(err);
        }

        if decoded.terminated {
            info!(
                "extracted {} bytes from {} bits",
                decoded.message.len(),
                decoded.consumed
            );
            return Ok(decoded.message);
        }

        match self.policy {
            ExtractPolicy::Strict => Err(StegoError::TerminatorNotFound {
                consumed: decoded.consumed,
            }),
            ExtractPolicy::Lenient => {
                debug!(
                    "no terminator in {} bits, {} dangling bits dropped",
                    decoded.consumed,
                    decoded.consumed % TERMINATOR_BITS
                );
                Ok(decoded.message)
            }
        }
    }
}

/// Hide `message` using `strategy`; see [`Codec::embed`]
pub fn embed<C: CarrierMut + ?Sized>(
    carrier: &mut C,
    message: &[u8],
    strategy: Strategy,
) -> Result<usize> {
    Codec::new(strategy).embed(carrier, message)
}

/// Recover a message leniently; see [`Codec::extract`]
pub fn extract<C: Carrier + ?Sized>(carrier: &C, strategy: Strategy) -> Result<Vec<u8>> {
    Codec::new(strategy).extract(carrier)
}

/// Recover a message, failing when no terminator is found
pub fn extract_strict<C: Carrier + ?Sized>(carrier: &C, strategy: Strategy) -> Result<Vec<u8>> {
    Codec::new(strategy)
        .with_policy(ExtractPolicy::Strict)
        .extract(carrier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carrier::{ByteCarrier, Channel, Geometry, PixelCarrier};
    use image::{Rgb, RgbImage};

    fn cover(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i * 37 % 251) as u8).collect()
    }

    fn strategies() -> [Strategy; 3] {
        [Strategy::All, Strategy::EveryNth(7), Strategy::Diagonal]
    }

    #[test]
    fn test_roundtrip_bytes_all_strategies() {
        let message = b"hi";
        for strategy in strategies() {
            // 30x30 grid: diagonal has 30 positions, enough for 24 bits
            let mut buf = cover(900);
            let mut carrier = ByteCarrier::with_width(&mut buf, 30).unwrap();
            let written = embed(&mut carrier, message, strategy).unwrap();
            assert_eq!(written, 24);
            assert_eq!(extract(&carrier, strategy).unwrap(), message);
        }
    }

    #[test]
    fn test_roundtrip_pixels() {
        let mut img = RgbImage::from_fn(40, 40, |x, y| Rgb([x as u8, y as u8, (x ^ y) as u8]));
        let message = b"pixels";
        {
            let mut carrier = PixelCarrier::new(&mut img, Channel::Green);
            Codec::new(Strategy::EveryNth(3))
                .embed(&mut carrier, message)
                .unwrap();
        }
        let carrier = PixelCarrier::new(&img, Channel::Green);
        assert_eq!(
            Codec::new(Strategy::EveryNth(3)).extract(&carrier).unwrap(),
            message
        );
    }

    #[test]
    fn test_untouched_outside_positions() {
        let original = cover(200);
        let mut buf = original.clone();
        let mut carrier = ByteCarrier::new(&mut buf);
        embed(&mut carrier, b"abc", Strategy::EveryNth(5)).unwrap();

        for (i, (before, after)) in original.iter().zip(buf.iter()).enumerate() {
            if i % 5 == 0 {
                assert_eq!(before & !1, after & !1, "upper bits changed at {}", i);
            } else {
                assert_eq!(before, after, "unselected unit {} changed", i);
            }
        }
    }

    #[test]
    fn test_capacity_boundary() {
        // 4-byte message: 40 bits
        let message = b"abcd";
        let mut exact = cover(40);
        embed(&mut ByteCarrier::new(&mut exact), message, Strategy::All).unwrap();
        assert_eq!(extract(&ByteCarrier::new(&exact), Strategy::All).unwrap(), message);

        let original = cover(39);
        let mut short = original.clone();
        let err = embed(&mut ByteCarrier::new(&mut short), message, Strategy::All).unwrap_err();
        assert!(matches!(
            err,
            StegoError::CapacityExceeded {
                needed: 40,
                available: 39
            }
        ));
        assert_eq!(short, original);
    }

    #[test]
    fn test_empty_message() {
        let mut buf = vec![0xFFu8; 32];
        embed(&mut ByteCarrier::new(&mut buf), b"", Strategy::EveryNth(2)).unwrap();

        for (i, byte) in buf.iter().enumerate() {
            let expected = if i % 2 == 0 && i < 16 { 0xFE } else { 0xFF };
            assert_eq!(*byte, expected, "unit {}", i);
        }
        assert!(extract(&ByteCarrier::new(&buf), Strategy::EveryNth(2))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_embedded_nul_truncates() {
        let mut buf = cover(128);
        embed(&mut ByteCarrier::new(&mut buf), b"ab\0cd", Strategy::All).unwrap();
        assert_eq!(extract(&ByteCarrier::new(&buf), Strategy::All).unwrap(), b"ab");
    }

    #[test]
    fn test_missing_terminator_policies() {
        // All LSBs set: every byte decodes as 0xFF, never a terminator
        let buf = vec![0x01u8; 20];
        let carrier = ByteCarrier::new(&buf);

        let lenient = extract(&carrier, Strategy::All).unwrap();
        assert_eq!(lenient, vec![0xFF, 0xFF]);

        let strict = extract_strict(&carrier, Strategy::All).unwrap_err();
        assert!(matches!(strict, StegoError::TerminatorNotFound { consumed: 20 }));
    }

    #[test]
    fn test_diagonal_requires_geometry() {
        let mut buf = cover(64);
        let err = embed(&mut ByteCarrier::new(&mut buf), b"", Strategy::Diagonal).unwrap_err();
        assert!(matches!(err, StegoError::InvalidGeometry(_)));
    }

    /// A carrier whose reported grid is larger than its buffer
    struct OversizedGrid {
        bytes: Vec<u8>,
        geometry: Geometry,
    }

    impl Carrier for OversizedGrid {
        fn unit_count(&self) -> usize {
            self.bytes.len()
        }

        fn get_lsb(&self, index: usize) -> Result<bool> {
            ByteCarrier::new(&self.bytes).get_lsb(index)
        }

        fn geometry(&self) -> Option<Geometry> {
            Some(self.geometry)
        }
    }

    impl CarrierMut for OversizedGrid {
        fn set_lsb(&mut self, index: usize, bit: bool) -> Result<()> {
            ByteCarrier::new(&mut self.bytes).set_lsb(index, bit)
        }
    }

    #[test]
    fn test_grid_beyond_carrier_is_out_of_range() {
        // 10x10 diagonal ends at index 99; only 99 units exist
        let original = cover(99);
        let mut carrier = OversizedGrid {
            bytes: original.clone(),
            geometry: Geometry::new(10, 10),
        };
        let codec = Codec::new(Strategy::Diagonal);

        // An empty message only touches the first 8 diagonal units, which exist
        let err = codec.embed(&mut carrier, b"").unwrap_err();
        assert!(matches!(
            err,
            StegoError::OutOfRange {
                index: 99,
                unit_count: 99
            }
        ));
        assert_eq!(carrier.bytes, original);

        assert!(matches!(
            codec.extract(&carrier),
            Err(StegoError::OutOfRange { index: 99, .. })
        ));
        assert!(matches!(
            codec.capacity(&carrier),
            Err(StegoError::OutOfRange { index: 99, .. })
        ));

        carrier.geometry = Geometry::new(9, 11);
        assert_eq!(codec.capacity(&carrier).unwrap().positions, 9);
    }

    #[test]
    fn test_diagonal_writes_only_diagonal() {
        let mut img = RgbImage::from_pixel(10, 10, Rgb([0xFF, 0x80, 0x80]));
        {
            let mut carrier = PixelCarrier::new(&mut img, Channel::Red);
            embed(&mut carrier, b"", Strategy::Diagonal).unwrap();
        }
        for y in 0..10 {
            for x in 0..10 {
                let expected = if x == y && x < 8 { 0xFE } else { 0xFF };
                assert_eq!(img.get_pixel(x, y).0[0], expected, "pixel ({}, {})", x, y);
                assert_eq!(img.get_pixel(x, y).0[1], 0x80);
            }
        }
    }

    #[test]
    fn test_capacity_report() {
        let buf = vec![0u8; 100];
        let capacity = Codec::new(Strategy::EveryNth(4))
            .capacity(&ByteCarrier::new(&buf))
            .unwrap();
        assert_eq!(capacity.units, 100);
        assert_eq!(capacity.positions, 25);
        assert_eq!(capacity.max_message_bytes, 2);
        assert!(capacity.fits(2));
        assert!(!capacity.fits(3));

        let tiny = Codec::default()
            .capacity(&ByteCarrier::with_geometry(vec![0u8; 4], Geometry::new(2, 2)).unwrap())
            .unwrap();
        assert_eq!(tiny.max_message_bytes, 0);
        assert!(!tiny.fits(0));
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!("strict".parse::<ExtractPolicy>().unwrap(), ExtractPolicy::Strict);
        assert_eq!("Lenient".parse::<ExtractPolicy>().unwrap(), ExtractPolicy::Lenient);
        assert!("maybe".parse::<ExtractPolicy>().is_err());
    }
}
