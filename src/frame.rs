//! This module handles the wire-level frames. Each frame carries one
//! seven-byte block of input, or a run of consecutive all-zero blocks, and
//! is self-delimiting: the leading-zero count of its first byte selects the
//! variant and, for packed frames, the bit width.

use crate::utils::leb128;

/// The number of input bytes covered by a single block.
pub const BLOCK_LEN: usize = 7;

/// Tag byte of a literal frame (seven leading zeros).
pub const LITERAL_TAG: u8 = 0x01;

/// Tag byte of an empty-run frame (eight leading zeros).
pub const EMPTY_RUN_TAG: u8 = 0x00;

/// A single empty block travels as a 1-bit packed frame with zero payload,
/// which is one byte shorter than the smallest empty-run frame.
pub const EMPTY_BLOCK: u8 = 0x80;

/// Return the smallest number of bits that holds every byte of the block:
/// zero for an all-zero block, eight when some byte needs the full range.
pub fn width_of(block: &[u8]) -> u32 {
    let sum = block.iter().fold(0u8, |acc, &b| acc | b);
    8 - sum.leading_zeros()
}

/// Pack the seven block bytes into a 'width'-bit frame and append it.
///
/// The payloads are laid out little-end-first below a marker bit at position
/// `7 * width`, and the whole integer is serialized big-endian over exactly
/// `width` bytes. The marker is the highest bit set, so it lands in the
/// first byte and gives the tag its `width - 1` leading zeros.
pub fn encode_packed(block: &[u8], width: u32, stream: &mut Vec<u8>) {
    debug_assert_eq!(block.len(), BLOCK_LEN);
    debug_assert!((1..=7).contains(&width));

    let mut packed = 1u64 << (BLOCK_LEN as u32 * width);
    for (n, &b) in block.iter().enumerate() {
        packed |= (b as u64) << (n as u32 * width);
    }
    let frame_len = width as usize;
    stream.extend_from_slice(&packed.to_be_bytes()[8 - frame_len..]);
}

/// Unpack a 'width'-bit frame from the head of 'stream' into 'block', which
/// must be exactly seven bytes. Returns the number of frame bytes consumed,
/// or None if the frame is truncated.
pub fn decode_packed(stream: &[u8], width: u32, block: &mut [u8]) -> Option<usize> {
    debug_assert_eq!(block.len(), BLOCK_LEN);
    debug_assert!((1..=7).contains(&width));

    let frame_len = width as usize;
    if stream.len() < frame_len {
        return None;
    }
    let mut packed: u64 = 0;
    for &b in &stream[..frame_len] {
        packed = (packed << 8) | b as u64;
    }
    let mask = (1u64 << width) - 1;
    for (n, b) in block.iter_mut().enumerate() {
        *b = ((packed >> (n as u32 * width)) & mask) as u8;
    }
    Some(frame_len)
}

/// Append a literal frame: the escape tag followed by 1 to 7 raw bytes.
/// Used for blocks where some byte has its high bit set, and for the
/// trailing partial block.
pub fn encode_literal(bytes: &[u8], stream: &mut Vec<u8>) {
    debug_assert!(!bytes.is_empty() && bytes.len() <= BLOCK_LEN);
    stream.push(LITERAL_TAG);
    stream.extend_from_slice(bytes);
}

/// Append a frame covering 'run' consecutive empty blocks. A run of one is
/// the single byte [`EMPTY_BLOCK`]; longer runs are the zero tag followed by
/// `run - 1` as a varint, so the varint payload is always at least one.
pub fn encode_empty_run(run: u64, stream: &mut Vec<u8>) {
    debug_assert!(run > 0);
    if run == 1 {
        stream.push(EMPTY_BLOCK);
        return;
    }
    stream.push(EMPTY_RUN_TAG);
    leb128::encode(run - 1, stream);
}

#[test]
fn test_packed_round_trip() {
    for width in 1..=7u32 {
        let max = (1u8 << width) - 1;
        let block = [max, 0, 1, max, 0, max, 1];
        let mut stream = Vec::new();
        encode_packed(&block, width, &mut stream);
        assert_eq!(stream.len(), width as usize);
        assert_eq!(stream[0].leading_zeros(), width - 1);

        let mut decoded = [0u8; BLOCK_LEN];
        let read = decode_packed(&stream, width, &mut decoded).unwrap();
        assert_eq!(read, stream.len());
        assert_eq!(decoded, block);
    }
}

#[test]
fn test_packed_known_bytes() {
    // Seven ones at width one fill every payload bit under the marker.
    let mut stream = Vec::new();
    encode_packed(&[1; 7], 1, &mut stream);
    assert_eq!(stream, [0xff]);

    let mut stream = Vec::new();
    encode_packed(&[0; 7], 1, &mut stream);
    assert_eq!(stream, [EMPTY_BLOCK]);
}

#[test]
fn test_packed_truncated() {
    let mut stream = Vec::new();
    encode_packed(&[3, 1, 2, 0, 3, 1, 0], 2, &mut stream);
    let mut block = [0u8; BLOCK_LEN];
    assert_eq!(decode_packed(&stream[..1], 2, &mut block), None);
}

#[test]
fn test_empty_run_forms() {
    let mut stream = Vec::new();
    encode_empty_run(1, &mut stream);
    assert_eq!(stream, [EMPTY_BLOCK]);

    let mut stream = Vec::new();
    encode_empty_run(2, &mut stream);
    assert_eq!(stream, [EMPTY_RUN_TAG, 1]);

    let mut stream = Vec::new();
    encode_empty_run(200, &mut stream);
    assert_eq!(stream, [EMPTY_RUN_TAG, 0xc7, 0x01]);
}

#[test]
fn test_width_of() {
    assert_eq!(width_of(&[0; 7]), 0);
    assert_eq!(width_of(&[0, 0, 0, 1, 0, 0, 0]), 1);
    assert_eq!(width_of(&[1, 2, 3, 4, 5, 6, 7]), 3);
    assert_eq!(width_of(&[0, 0, 0, 0, 0, 0, 128]), 8);
}
