//! This module drives the encoding and decoding of whole buffers. The
//! encoder walks the input in seven-byte blocks and emits one frame per
//! non-empty block, collapsing runs of empty blocks; the decoder dispatches
//! on the leading-zero count of each tag byte.

use crate::frame;
use crate::utils::{leb128, size_prefix};
use crate::{Corrupt, Decoder, Encoder};

/// Drives the encoding of a whole buffer.
pub struct BlockEncoder<'a> {
    /// The uncompressed input.
    input: &'a [u8],
    /// The output stream.
    output: &'a mut Vec<u8>,
}

impl<'a> BlockEncoder<'a> {
    fn encode_impl(&mut self) -> usize {
        self.output.clear();
        if self.input.is_empty() {
            return 0;
        }

        size_prefix::encode(self.input.len() as u64, self.output);

        // Counts consecutive empty blocks that still need a frame.
        let mut empty: u64 = 0;

        let mut blocks = self.input.chunks_exact(frame::BLOCK_LEN);
        for block in &mut blocks {
            let width = frame::width_of(block);
            if width == 0 {
                empty += 1;
                continue;
            }
            if empty > 0 {
                frame::encode_empty_run(empty, self.output);
                empty = 0;
            }
            if width == 8 {
                frame::encode_literal(block, self.output);
            } else {
                frame::encode_packed(block, width, self.output);
            }
        }

        // A residual with any non-zero byte travels as a short literal. An
        // all-zero residual is dropped entirely, as is a pending empty run
        // at the end of the input: the prefix fixes the decoded length and
        // the decoder zero-fills its output.
        let residual = blocks.remainder();
        if residual.iter().any(|&b| b != 0) {
            if empty > 0 {
                frame::encode_empty_run(empty, self.output);
            }
            frame::encode_literal(residual, self.output);
        }

        self.output.len()
    }
}

/// Drives the decoding of a whole buffer.
pub struct BlockDecoder<'a> {
    /// The encoded input.
    input: &'a [u8],
    /// The output stream.
    output: &'a mut Vec<u8>,
}

impl<'a> BlockDecoder<'a> {
    fn decode_impl(&mut self) -> Result<(usize, usize), Corrupt> {
        self.output.clear();
        if self.input.is_empty() {
            return Ok((0, 0));
        }

        let (size, read) = size_prefix::decode(self.input).ok_or(Corrupt)?;
        let size = usize::try_from(size).map_err(|_| Corrupt)?;

        // Zero-fill up to the declared length. Empty runs, dropped
        // residuals, and short final literals all leave their bytes to this
        // fill.
        self.output.resize(size, 0);

        let mut src = &self.input[read..];
        let mut dn = 0;

        while !src.is_empty() {
            match src[0].leading_zeros() {
                lz @ 0..=6 => {
                    let width = lz + 1;
                    if dn + frame::BLOCK_LEN > size {
                        return Err(Corrupt);
                    }
                    let block = &mut self.output[dn..dn + frame::BLOCK_LEN];
                    let consumed = frame::decode_packed(src, width, block).ok_or(Corrupt)?;
                    src = &src[consumed..];
                    dn += frame::BLOCK_LEN;
                }
                7 => {
                    // Literal frame: up to seven raw bytes, fewer only when
                    // the stream ends inside the frame (the residual).
                    let end = src.len().min(frame::BLOCK_LEN + 1);
                    let bytes = &src[1..end];
                    if dn + bytes.len() > size {
                        return Err(Corrupt);
                    }
                    self.output[dn..dn + bytes.len()].copy_from_slice(bytes);
                    dn += bytes.len();
                    src = &src[end..];
                }
                _ => {
                    // Empty-run frame: the varint carries the run length
                    // minus one and must be at least one, since a lone empty
                    // block travels as a 1-bit packed frame.
                    let (run, consumed) = leb128::decode(&src[1..]).ok_or(Corrupt)?;
                    if run == 0 {
                        return Err(Corrupt);
                    }
                    let zeros = run
                        .checked_add(1)
                        .and_then(|blocks| blocks.checked_mul(frame::BLOCK_LEN as u64))
                        .ok_or(Corrupt)?;
                    if zeros > (size - dn) as u64 {
                        return Err(Corrupt);
                    }
                    dn += zeros as usize;
                    src = &src[1 + consumed..];
                }
            }
        }

        // Anything between the cursor and the declared length is already
        // zero from the fill.
        Ok((self.input.len(), size))
    }
}

impl<'a> Encoder<'a> for BlockEncoder<'a> {
    fn new(input: &'a [u8], output: &'a mut Vec<u8>) -> Self {
        BlockEncoder { input, output }
    }

    fn encode(&mut self) -> usize {
        self.encode_impl()
    }
}

impl<'a> Decoder<'a> for BlockDecoder<'a> {
    fn new(input: &'a [u8], output: &'a mut Vec<u8>) -> Self {
        BlockDecoder { input, output }
    }

    fn decode(&mut self) -> Result<(usize, usize), Corrupt> {
        let res = self.decode_impl();
        if res.is_err() {
            // Partial output never escapes a failed decode.
            self.output.clear();
        }
        res
    }
}
