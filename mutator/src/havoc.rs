//! The havoc primitive: one blind, structure-agnostic twiddle of a byte
//! range. Twelve mutation shapes cover bit flips, interesting-value writes
//! of every width in either endianness, small arithmetic, and byte XOR.

use rand::Rng;

/// Largest value added to or subtracted from an integer by the arithmetic
/// mutations.
const ARITH_MAX: u32 = 35;

const INTERESTING_8: [i8; 9] = [-128, -1, 0, 1, 16, 32, 64, 100, 127];

const INTERESTING_16: [i16; 19] = [
    -128, -1, 0, 1, 16, 32, 64, 100, 127, // every 8-bit value widened
    -32768, -129, 128, 255, 256, 512, 1000, 1024, 4096, 32767,
];

const INTERESTING_32: [i32; 27] = [
    -128, -1, 0, 1, 16, 32, 64, 100, 127, // 8-bit values widened
    -32768, -129, 128, 255, 256, 512, 1000, 1024, 4096, 32767, // 16-bit widened
    -2147483648, -100663046, -32769, 32768, 65535, 65536, 100663045, 2147483647,
];

/// Applies a single random mutation somewhere in `buf`. Mutations that need
/// more room than the buffer offers degrade to a no-op, like a fuzz attempt
/// that changed nothing.
pub fn surgical_havoc(buf: &mut [u8], rng: &mut impl Rng) {
    let len = buf.len();
    if len == 0 {
        return;
    }

    match rng.random_range(0..12u32) {
        0 => {
            // flip a single bit somewhere
            let bit = rng.random_range(0..len * 8);
            buf[bit >> 3] ^= 128 >> (bit & 7);
        }
        1 => {
            let val = INTERESTING_8[rng.random_range(0..INTERESTING_8.len())];
            buf[rng.random_range(0..len)] = val as u8;
        }
        2 => {
            // interesting word, either endianness
            if let Some(idx) = index_for(rng, len, 2) {
                let val = INTERESTING_16[rng.random_range(0..INTERESTING_16.len())] as u16;
                let bytes = if rng.random_bool(0.5) {
                    val.to_le_bytes()
                } else {
                    val.to_be_bytes()
                };
                buf[idx..idx + 2].copy_from_slice(&bytes);
            }
        }
        3 => {
            // interesting dword, either endianness
            if let Some(idx) = index_for(rng, len, 4) {
                let val = INTERESTING_32[rng.random_range(0..INTERESTING_32.len())] as u32;
                let bytes = if rng.random_bool(0.5) {
                    val.to_le_bytes()
                } else {
                    val.to_be_bytes()
                };
                buf[idx..idx + 4].copy_from_slice(&bytes);
            }
        }
        4 => {
            // interesting qword, either endianness
            if let Some(idx) = index_for(rng, len, 8) {
                let val = INTERESTING_32[rng.random_range(0..INTERESTING_32.len())] as i64 as u64;
                let bytes = if rng.random_bool(0.5) {
                    val.to_le_bytes()
                } else {
                    val.to_be_bytes()
                };
                buf[idx..idx + 8].copy_from_slice(&bytes);
            }
        }
        5 => {
            let idx = rng.random_range(0..len);
            buf[idx] = buf[idx].wrapping_sub(arith_delta(rng) as u8);
        }
        6 => {
            let idx = rng.random_range(0..len);
            buf[idx] = buf[idx].wrapping_add(arith_delta(rng) as u8);
        }
        7 => arith_u16(buf, rng, u16::wrapping_sub),
        8 => arith_u16(buf, rng, u16::wrapping_add),
        9 => arith_u32(buf, rng, u32::wrapping_sub),
        10 => arith_u32(buf, rng, u32::wrapping_add),
        _ => {
            // XOR with 1..=255 so the write can never be a no-op
            let idx = rng.random_range(0..len);
            buf[idx] ^= rng.random_range(1..=255u32) as u8;
        }
    }
}

fn arith_delta(rng: &mut impl Rng) -> u32 {
    1 + rng.random_range(0..ARITH_MAX)
}

/// A random position with at least `width` bytes after it, when the buffer
/// is big enough.
fn index_for(rng: &mut impl Rng, len: usize, width: usize) -> Option<usize> {
    if len < width {
        return None;
    }
    let idx = rng.random_range(0..len);
    (idx + width <= len).then_some(idx)
}

fn arith_u16(buf: &mut [u8], rng: &mut impl Rng, op: fn(u16, u16) -> u16) {
    let Some(idx) = index_for(rng, buf.len(), 2) else {
        return;
    };
    let delta = arith_delta(rng) as u16;
    let slot: &mut [u8] = &mut buf[idx..idx + 2];
    if rng.random_bool(0.5) {
        let val = op(u16::from_le_bytes(slot.try_into().expect("2 bytes")), delta);
        slot.copy_from_slice(&val.to_le_bytes());
    } else {
        let val = op(u16::from_be_bytes(slot.try_into().expect("2 bytes")), delta);
        slot.copy_from_slice(&val.to_be_bytes());
    }
}

fn arith_u32(buf: &mut [u8], rng: &mut impl Rng, op: fn(u32, u32) -> u32) {
    let Some(idx) = index_for(rng, buf.len(), 4) else {
        return;
    };
    let delta = arith_delta(rng);
    let slot: &mut [u8] = &mut buf[idx..idx + 4];
    if rng.random_bool(0.5) {
        let val = op(u32::from_le_bytes(slot.try_into().expect("4 bytes")), delta);
        slot.copy_from_slice(&val.to_le_bytes());
    } else {
        let val = op(u32::from_be_bytes(slot.try_into().expect("4 bytes")), delta);
        slot.copy_from_slice(&val.to_be_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const STATIC_SEED: u64 = 7355608;

    #[test]
    fn havoc_never_changes_length() {
        let mut rng = StdRng::seed_from_u64(STATIC_SEED);
        let mut buf = vec![0x41u8; 64];
        for _ in 0..1000 {
            surgical_havoc(&mut buf, &mut rng);
            assert_eq!(buf.len(), 64);
        }
    }

    #[test]
    fn havoc_changes_bytes_eventually() {
        let mut rng = StdRng::seed_from_u64(STATIC_SEED);
        let original = vec![0x41u8; 64];
        let mut buf = original.clone();
        for _ in 0..64 {
            surgical_havoc(&mut buf, &mut rng);
        }
        assert_ne!(buf, original);
    }

    #[test]
    fn havoc_tolerates_tiny_buffers() {
        let mut rng = StdRng::seed_from_u64(STATIC_SEED);
        let mut empty: Vec<u8> = Vec::new();
        surgical_havoc(&mut empty, &mut rng);
        assert!(empty.is_empty());

        let mut one = vec![0u8];
        for _ in 0..200 {
            surgical_havoc(&mut one, &mut rng);
            assert_eq!(one.len(), 1);
        }
    }
}
