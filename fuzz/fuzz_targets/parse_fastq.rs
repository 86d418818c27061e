#![no_main]
#[macro_use] extern crate libfuzzer_sys;
extern crate readprep;

use readprep::parser::{FastqReader, FastxReader};

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let text = format!("@{}", text);
        let mut reader = FastqReader::new(&text);
        while let Some(rec) = reader.next() {
            if let Ok(rec) = rec {
                assert_eq!(rec.qual().map(|q| q.len()), Some(rec.num_bases()));
            } else {
                break;
            }
        }
    }
});
