#![no_main]

use libfuzzer_sys::fuzz_target;
use septet::{BlockDecoder, Decoder};

fuzz_target!(|data: &[u8]| {
    let mut decompressed: Vec<u8> = Vec::new();
    {
        let mut decoder = BlockDecoder::new(data, &mut decompressed);
        let _ = decoder.decode();
    }
});
