#![no_main]
#[macro_use] extern crate libfuzzer_sys;
extern crate readprep;

use readprep::{preprocess, ProcessingConfig};

fuzz_target!(|data: &[u8]| {
    let config = ProcessingConfig::new(3, 500, 1.0)
        .unwrap()
        .with_const5p("ACGT")
        .with_const3p("TTGCA");
    if let Ok(reads) = preprocess(data, "fuzz.fastq", &config) {
        for read in reads {
            assert_eq!(read.quality.map(|q| q.len()), Some(read.length));
        }
    }
});
