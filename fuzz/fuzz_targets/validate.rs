#![no_main]
use libfuzzer_sys::fuzz_target;

use jsonscan::{tokenize_with, validate_stream, validate_with, Options, SliceSource};

fuzz_target!(|data: &[u8]| {
    // Raw bytes go straight in: the lexer works on bytes, not `str`.
    for options in [Options::default(), Options::legacy()] {
        let streamed = validate_with(SliceSource::new(data), &options);
        let stream = tokenize_with(SliceSource::new(data), &options);
        let batched = validate_stream(&stream, &options);

        // Both pipelines must reach the same verdict at the same place.
        assert_eq!(streamed, batched);
    }
});
