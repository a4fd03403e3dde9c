//! Sentinel-terminated bitstream framing.
//!
//! A message is framed as its bytes expanded most-significant-bit first, followed
//! by one all-zero byte. Decoding stops at the first 8-bit aligned zero byte, so a
//! message that itself contains `0x00` comes back truncated at that byte.

/// Number of bits in the terminator
pub const TERMINATOR_BITS: usize = 8;

/// Length of the framed bitstream for a message of `message_len` bytes
pub fn bitstream_len(message_len: usize) -> usize {
    message_len
        .saturating_add(1)
        .saturating_mul(TERMINATOR_BITS)
}

/// Expand a message into bits (MSB first) and append the terminator
pub fn to_bitstream(message: &[u8]) -> Vec<bool> {
    let mut bits = Vec::with_capacity(bitstream_len(message.len()));
    for &byte in message {
        for shift in (0..8).rev() {
            bits.push((byte >> shift) & 1 == 1);
        }
    }
    bits.extend(std::iter::repeat(false).take(TERMINATOR_BITS));
    bits
}

/// Result of decoding a bitstream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    /// Decoded message, terminator excluded
    pub message: Vec<u8>,
    /// Bits pulled from the source, terminator included when found
    pub consumed: usize,
    /// Whether the terminator was seen
    pub terminated: bool,
}

/// Group bits into bytes until the terminator or `bit_limit` bits, whichever first.
///
/// A trailing group shorter than 8 bits is dropped without error.
pub fn from_bits<I>(bits: I, bit_limit: Option<usize>) -> Decoded
where
    I: IntoIterator<Item = bool>,
{
    let limit = bit_limit.unwrap_or(usize::MAX);

    let mut message = Vec::new();
    let mut consumed = 0usize;
    let mut byte = 0u8;
    let mut bit_count = 0usize;

    for bit in bits.into_iter().take(limit) {
        byte = (byte << 1) | u8::from(bit);
        bit_count += 1;
        consumed += 1;

        if bit_count < 8 {
            continue;
        }

        if byte == 0 {
            return Decoded {
                message,
                consumed,
                terminated: true,
            };
        }

        message.push(byte);
        byte = 0;
        bit_count = 0;
    }

    Decoded {
        message,
        consumed,
        terminated: false,
    }
}
