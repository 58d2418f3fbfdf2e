//! A lossless codec for byte arrays whose values occupy only a few low bits,
//! such as the register arrays of HyperLogLog sketches. The input is cut into
//! seven-byte blocks; each block is bit-packed at the smallest width that
//! holds every byte in it, and runs of all-zero blocks collapse into a single
//! frame.
//!
//! The wire format is a size prefix followed by self-delimiting frames:
//!
//! ```text
//! stream  := prefix frame*
//! prefix  := LEB128(p)                  ; p != 0, see utils::size_prefix
//! frame   := packed_w | literal | empty_run
//! ```
//!
//! Every frame opens with a tag byte whose leading-zero count selects the
//! variant: `7 - w` zeros for a `w`-bit packed block, seven zeros (`0x01`)
//! for a literal, and the all-zero byte for an empty-block run.

pub mod block;
pub mod frame;
pub mod utils;

pub use block::{BlockDecoder, BlockEncoder};

/// The sole decoder error: the encoded input is malformed. Raised for
/// truncated frames, bad or reserved varints, and frames that would write
/// past the declared output size. The encoder cannot fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("corrupt input")]
pub struct Corrupt;

/// A trait that defines the interface for encoding buffers.
pub trait Encoder<'a> {
    /// Creates a new Encoder that reads from 'input' and writes into
    /// 'output'.
    fn new(input: &'a [u8], output: &'a mut Vec<u8>) -> Self;

    /// Encode the whole input buffer and return the number of bytes that
    /// were written into the output stream.
    #[must_use]
    fn encode(&mut self) -> usize;
}

/// A trait that defines the interface for decoding buffers.
pub trait Decoder<'a> {
    /// Creates a new Decoder that reads from 'input' and writes into
    /// 'output'.
    fn new(input: &'a [u8], output: &'a mut Vec<u8>) -> Self;

    /// Decode the buffer 'input' and return the number of input bytes that
    /// were consumed followed by the number of bytes written, or [`Corrupt`]
    /// if the input was invalid.
    fn decode(&mut self) -> Result<(usize, usize), Corrupt>;
}

/// Encodes `src` into `dst`, reusing its capacity, and returns the number of
/// bytes written. The previous contents of `dst` are discarded. Zero-length
/// input produces zero-length output.
pub fn encode(dst: &mut Vec<u8>, src: &[u8]) -> usize {
    BlockEncoder::new(src, dst).encode()
}

/// Decodes `src` into `dst`, reusing its capacity, and returns the decoded
/// length. The previous contents of `dst` are discarded; on corrupt input
/// `dst` is left empty.
pub fn decode(dst: &mut Vec<u8>, src: &[u8]) -> Result<usize, Corrupt> {
    let (_, written) = BlockDecoder::new(src, dst).decode()?;
    Ok(written)
}
