use readprep::errors::ParseErrorKind;
use readprep::matcher::find;
use readprep::parser::{parse_records, Format};
use readprep::trim::{trim, DEFAULT_ADAPTER_TOLERANCE};
use readprep::{export_fasta, preprocess, Error, ErrorKind, ProcessingConfig};

#[test]
fn fasta_without_adapters_keeps_everything_in_range() {
    let payload = b">seq1\nATCGATCGATCGATCG\n>seq2\nGGGGGGGGGGGG\n";
    let config = ProcessingConfig::new(10, 20, 0.005).unwrap();
    let reads = preprocess(payload, "sample.fasta", &config).unwrap();

    assert_eq!(reads.len(), 2);
    assert_eq!((reads[0].id.as_str(), reads[0].length), ("seq1", 16));
    assert_eq!((reads[1].id.as_str(), reads[1].length), ("seq2", 12));
    for read in &reads {
        assert!(read.quality.is_none());
        assert!(read.avg_error.is_none());
        let json = serde_json::to_value(read).unwrap();
        assert!(json.get("quality").is_none());
        assert!(json.get("avg_error").is_none());
    }
}

#[test]
fn adapter_is_located_with_tolerance() {
    assert_eq!(find(b"ATCG", b"XXATCGXX", 0.1), Some((2, 6)));
}

#[test]
fn five_prime_trim_cuts_quality_too() {
    let (seq, qual) = trim(
        b"ATCGNNNNNN",
        Some(b"IIIIIIIIII"),
        b"ATCG",
        b"",
        DEFAULT_ADAPTER_TOLERANCE,
    );
    assert_eq!(seq, b"NNNNNN");
    assert_eq!(qual, Some(&b"IIIIII"[..]));
}

#[test]
fn phred_40_reads_have_tiny_error() {
    let payload = b"@q40\nACGTACGTACGT\n+\nIIIIIIIIIIII\n";
    let config = ProcessingConfig::new(10, 20, 0.001).unwrap();
    let reads = preprocess(payload, "q.fastq", &config).unwrap();
    assert_eq!(reads.len(), 1);
    assert!(reads[0].avg_error.unwrap() < 0.001);
}

#[test]
fn inverted_length_range_is_rejected() {
    let e = ProcessingConfig::new(100, 10, 0.005).unwrap_err();
    assert_eq!(e.kind(), ErrorKind::InvalidConfig);
}

#[test]
fn both_adapters_with_fastq() {
    let payload = concat!(
        "@read1 lane=1\n",
        "AAGGCCTTACGTACGTACGTTTCCGGAA\n",
        "+\n",
        "IIIIIIIIIIIIIIIIIIIIIIIIIIII\n",
        // one mismatch in each adapter, still within 10% of 10 bases
        "@read2\n",
        "AAGGCCTTAGACGTACGTACGTTTCCGGAT\n",
        "+\n",
        "IIIIIIIIII55IIIIIIIIIIIIIIIIII\n",
        // no adapters found, too long afterwards
        "@read3\n",
        "CCCCCCCCCCCCCCCCCCCCCCCCCCCC\n",
        "+\n",
        "IIIIIIIIIIIIIIIIIIIIIIIIIIII\n",
    );
    let config = ProcessingConfig::new(5, 20, 0.01)
        .unwrap()
        .with_const5p("AAGGCCTTAC")
        .with_const3p("GTTTCCGGAA");
    let reads = preprocess(payload.as_bytes(), "lane1.fq", &config).unwrap();

    assert_eq!(reads.len(), 2);
    assert_eq!(reads[0].id, "read1");
    assert_eq!(reads[0].sequence, "GTACGTAC");
    assert_eq!(reads[0].quality.as_deref(), Some("IIIIIIII"));
    assert_eq!(reads[1].id, "read2");
    assert_eq!(reads[1].sequence, "ACGTACGTAC");
    assert_eq!(reads[1].quality.as_deref(), Some("55IIIIIIII"));
}

#[test]
fn malformed_record_reports_position() {
    let payload = b"@ok\nACGTACGTACGT\n+\nIIIIIIIIIIII\n@bad\nACGTACGTACGT\n+\nIIII\n";
    let e = preprocess(payload, "broken.fastq", &ProcessingConfig::default()).unwrap_err();
    match e {
        Error::MalformedRecord(parse) => {
            assert_eq!(parse.kind, ParseErrorKind::UnequalLengths);
            assert_eq!(parse.position.id.as_deref(), Some("bad"));
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn windows_line_endings() {
    let payload = b">seq1 desc\r\nACGTACGTACGT\r\n>seq2\r\nTTTTTTTTTTTT\r\n";
    let reads = preprocess(payload, "crlf.fa", &ProcessingConfig::default()).unwrap();
    let seqs: Vec<&str> = reads.iter().map(|r| r.sequence.as_str()).collect();
    assert_eq!(seqs, vec!["ACGTACGTACGT", "TTTTTTTTTTTT"]);
    assert_eq!(reads[0].id, "seq1");
}

#[test]
fn export_reparses_to_same_reads() {
    let payload = b"@a\nACGTACGTACGTAA\n+\nIIIIIIIIIIIIII\n@b\nGGGGCCCCAAAATT\n+\nIIIIIIIIIIIIII\n";
    let reads = preprocess(payload, "r.fastq", &ProcessingConfig::default()).unwrap();
    let fasta = export_fasta(&reads).unwrap();
    assert!(!fasta.ends_with('\n'));

    let parsed = parse_records(&fasta, Format::Fasta).unwrap();
    assert_eq!(parsed.len(), reads.len());
    for (rec, read) in parsed.iter().zip(reads.iter()) {
        assert_eq!(rec.id(), read.id);
        assert_eq!(rec.seq(), read.sequence.as_bytes());
        assert_eq!(rec.qual(), None);
    }
}
