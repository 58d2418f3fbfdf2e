use proptest::prelude::*;
use septet::{decode, encode, utils::size_prefix, Corrupt};

/// Arbitrary dense bytes, covering every frame variant.
fn dense_bytes() -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(any::<u8>(), 0..600)
}

/// Register arrays the shape a HyperLogLog sketch produces: mostly zero,
/// with small values scattered through the rest.
fn sparse_registers() -> impl Strategy<Value = Vec<u8>> {
    let register = prop_oneof![
        6 => Just(0u8),
        3 => 1u8..16,
        1 => 16u8..64,
    ];
    proptest::collection::vec(register, 0..2048)
}

proptest! {
    #[test]
    fn round_trips_dense(src in dense_bytes()) {
        let mut encoded = Vec::new();
        let written = encode(&mut encoded, &src);
        prop_assert_eq!(written, encoded.len());

        let mut decoded = Vec::new();
        prop_assert_eq!(decode(&mut decoded, &encoded), Ok(src.len()));
        prop_assert_eq!(decoded, src);
    }

    #[test]
    fn round_trips_sparse_registers(src in sparse_registers()) {
        let mut encoded = Vec::new();
        encode(&mut encoded, &src);

        let mut decoded = Vec::new();
        prop_assert_eq!(decode(&mut decoded, &encoded), Ok(src.len()));
        prop_assert_eq!(decoded, src);
    }

    #[test]
    fn encoding_ignores_destination_state(
        src in dense_bytes(),
        garbage in proptest::collection::vec(any::<u8>(), 0..256),
    ) {
        let mut fresh = Vec::new();
        encode(&mut fresh, &src);

        let mut reused = garbage;
        encode(&mut reused, &src);
        prop_assert_eq!(reused, fresh);
    }

    #[test]
    fn decoding_scrubs_reused_buffer(src in sparse_registers(), fill in 1u8..) {
        let mut encoded = Vec::new();
        encode(&mut encoded, &src);

        // A poisoned buffer longer than the output must not bleed through.
        let mut decoded = vec![fill; src.len() + 64];
        prop_assert_eq!(decode(&mut decoded, &encoded), Ok(src.len()));
        prop_assert_eq!(decoded, src);
    }

    #[test]
    fn nonempty_encodings_start_nonzero(src in proptest::collection::vec(any::<u8>(), 1..400)) {
        let mut encoded = Vec::new();
        encode(&mut encoded, &src);
        prop_assert!(!encoded.is_empty());
        prop_assert_ne!(encoded[0], 0);
    }

    #[test]
    fn compresses_no_worse_than_prefix_plus_literals(src in sparse_registers()) {
        // Worst case is one literal frame per block plus the residual
        // escape, never more than the input plus one tag byte per block
        // plus the prefix.
        let mut encoded = Vec::new();
        let written = encode(&mut encoded, &src);
        let blocks = src.len() / 7 + usize::from(src.len() % 7 != 0);
        prop_assert!(written <= 10 + src.len() + blocks);
    }

    // Appending a frame to an encoding whose final byte was actually
    // written (non-zero tail, so no absorbed run is left to hide it) must
    // be detected: the extra frame has nowhere left to write.
    #[test]
    fn appended_frame_is_detected(mut src in dense_bytes(), last in 1u8..) {
        src.push(last);

        let mut encoded = Vec::new();
        encode(&mut encoded, &src);
        encoded.push(0x80);

        let mut decoded = Vec::new();
        prop_assert_eq!(decode(&mut decoded, &encoded), Err(Corrupt));
        prop_assert!(decoded.is_empty());
    }

    // Any tail after a well-formed prefix either decodes to exactly the
    // declared size or fails cleanly; it must never panic or return a
    // mis-sized buffer.
    #[test]
    fn arbitrary_tails_decode_totally(
        size in 1u64..4096,
        tail in proptest::collection::vec(any::<u8>(), 0..128),
    ) {
        let mut stream = Vec::new();
        size_prefix::encode(size, &mut stream);
        stream.extend_from_slice(&tail);

        let mut decoded = Vec::new();
        match decode(&mut decoded, &stream) {
            Ok(written) => {
                prop_assert_eq!(written as u64, size);
                prop_assert_eq!(decoded.len() as u64, size);
            }
            Err(Corrupt) => prop_assert!(decoded.is_empty()),
        }
    }

    // Flipping a single frame byte of a valid encoding never panics and
    // never produces output of the wrong length. The prefix is left alone
    // here: corrupting it renames the stream rather than malforming it, and
    // the declared size is trusted for allocation.
    #[test]
    fn bit_rot_decodes_totally(src in dense_bytes(), pos: prop::sample::Index, flip in 1u8..) {
        let mut encoded = Vec::new();
        encode(&mut encoded, &src);

        let mut prefix = Vec::new();
        if !src.is_empty() {
            size_prefix::encode(src.len() as u64, &mut prefix);
        }
        prop_assume!(encoded.len() > prefix.len());

        let pos = prefix.len() + pos.index(encoded.len() - prefix.len());
        encoded[pos] ^= flip;

        let mut decoded = Vec::new();
        if let Ok(written) = decode(&mut decoded, &encoded) {
            prop_assert_eq!(written, decoded.len());
        } else {
            prop_assert!(decoded.is_empty());
        }
    }
}
