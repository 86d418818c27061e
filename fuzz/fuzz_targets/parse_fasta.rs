#![no_main]
#[macro_use] extern crate libfuzzer_sys;
extern crate readprep;

use readprep::parser::{FastaReader, FastxReader};

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let text = format!(">{}", text);
        let mut reader = FastaReader::new(&text);
        while let Some(rec) = reader.next() {
            if rec.is_err() {
                break;
            }
        }
    }
});
