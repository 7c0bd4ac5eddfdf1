//! Sink failure handling.
//!
//! A writer whose sink fails must stop writing, keep reporting the first
//! failure, and hand it back from `finish`.

use chrono::TimeZone;
use jpeg_pdf::writer::PdfWriter;
use jpeg_pdf::Error;
use std::io::{self, Write};

/// Accepts `limit` bytes in total, then fails every write.
#[derive(Debug)]
struct FailAfter {
    out: Vec<u8>,
    limit: usize,
    writes_after_failure: usize,
    failed: bool,
}

impl FailAfter {
    fn new(limit: usize) -> Self {
        Self {
            out: Vec::new(),
            limit,
            writes_after_failure: 0,
            failed: false,
        }
    }
}

impl Write for FailAfter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.failed {
            self.writes_after_failure += 1;
        }
        let room = self.limit - self.out.len();
        if room == 0 {
            self.failed = true;
            return Err(io::Error::new(io::ErrorKind::Other, "device full"));
        }
        let n = buf.len().min(room);
        self.out.extend_from_slice(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Accepts one byte per call.
struct OneByte(Vec<u8>);

impl Write for OneByte {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match buf.first() {
            Some(&b) => {
                self.0.push(b);
                Ok(1)
            },
            None => Ok(0),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Reports success without taking any bytes.
struct Closed;

impl Write for Closed {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Ok(0)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn write_document<W: Write>(writer: &mut PdfWriter<W>) -> Vec<jpeg_pdf::Result<()>> {
    vec![
        writer.write_page(612.0, 792.0, b"0 0 m 1 1 l S\n").map(|_| ()),
        writer.write_image_page(300, 150, b"\xFF\xD8jpeg\xFF\xD9").map(|_| ()),
        writer.write_integer_object(3).map(|_| ()),
    ]
}

fn reference_output() -> Vec<u8> {
    let mut writer = PdfWriter::new(Vec::new());
    for result in write_document(&mut writer) {
        result.unwrap();
    }
    writer.finish().unwrap()
}

mod sticky_error_tests {
    use super::*;

    #[test]
    fn test_every_cut_point_reports_failure() {
        let full = reference_output();
        for limit in (0..full.len()).step_by(7) {
            let mut writer = PdfWriter::new(FailAfter::new(limit));
            let results = write_document(&mut writer);
            let err = match writer.finish() {
                Err(err) => err,
                Ok(_) => panic!("finish succeeded with a {} byte sink", limit),
            };
            assert!(err.is_sink(), "limit {}: {:?}", limit, err);

            // Once a call fails, every later call fails with the same error.
            let first_failure = results.iter().position(|r| r.is_err());
            if let Some(first) = first_failure {
                for later in &results[first..] {
                    let later = later.as_ref().unwrap_err();
                    assert_eq!(later.to_string(), err.to_string());
                }
            }
        }
    }

    #[test]
    fn test_accepted_bytes_are_a_prefix_of_good_output() {
        let full = reference_output();
        let limit = full.len() / 2;

        let mut sink = FailAfter::new(limit);
        {
            let mut writer = PdfWriter::new(&mut sink);
            let _ = write_document(&mut writer);
            assert!(writer.finish().is_err());
        }
        assert_eq!(sink.out, &full[..limit]);
        assert_eq!(sink.writes_after_failure, 0);
    }

    #[test]
    fn test_error_reports_offset_of_failure() {
        let mut writer = PdfWriter::new(FailAfter::new(100));
        let _ = write_document(&mut writer);
        match writer.error() {
            Some(Error::Sink { offset, .. }) => assert_eq!(*offset, 100),
            other => panic!("expected sink error, got {:?}", other),
        }
    }

    #[test]
    fn test_header_failure_surfaces_on_next_call() {
        let mut writer = PdfWriter::new(FailAfter::new(0));
        assert!(writer.error().is_some());
        assert!(writer.write_page(1.0, 1.0, b"").unwrap_err().is_sink());
        assert!(writer.pages().is_empty());
        assert!(writer.finish().unwrap_err().is_sink());
    }

    #[test]
    fn test_failed_page_is_not_listed() {
        let mut writer = PdfWriter::new(FailAfter::new(40));
        assert!(writer.write_page(612.0, 792.0, b"content").is_err());
        assert!(writer.pages().is_empty());
    }

    #[test]
    fn test_partial_writes_produce_identical_output() {
        let mut writer = PdfWriter::new(OneByte(Vec::new()));
        for result in write_document(&mut writer) {
            result.unwrap();
        }
        let trickled = writer.finish().unwrap().0;
        assert_eq!(trickled, reference_output());
    }

    #[test]
    fn test_zero_length_write_is_a_failure() {
        let writer = PdfWriter::new(Closed);
        match writer.finish() {
            Err(Error::Sink { offset, source }) => {
                assert_eq!(offset, 0);
                assert_eq!(source.kind(), io::ErrorKind::WriteZero);
            },
            other => panic!("expected WriteZero sink error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_sink_failure_outranks_rejected_input() {
        let mut writer = PdfWriter::new(FailAfter::new(0));
        assert!(writer.write_page(0.0, 10.0, b"").unwrap_err().is_sink());
        assert!(writer.write_page(f64::NAN, 10.0, b"").unwrap_err().is_sink());
        assert!(writer.write_image_page(0, 5, b"").unwrap_err().is_sink());
        assert!(writer.write_image_object(5, 0, b"").unwrap_err().is_sink());
        let decoded = image::RgbImage::new(0, 0);
        assert!(writer.write_jpeg_page(&decoded, b"").unwrap_err().is_sink());
    }

    #[test]
    fn test_sink_failure_outranks_second_info() {
        let when = chrono::Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let full = {
            let mut writer = PdfWriter::new(Vec::new());
            writer.write_info("first", &when).unwrap();
            writer.offset() as usize
        };

        // The info dictionary fits, the next write does not.
        let mut writer = PdfWriter::new(FailAfter::new(full));
        writer.write_info("first", &when).unwrap();
        assert!(writer.write_page(1.0, 1.0, b"").unwrap_err().is_sink());
        let again = writer.write_info("second", &when).unwrap_err();
        assert!(again.is_sink(), "{:?}", again);
    }

    #[test]
    fn test_rejected_input_does_not_poison() {
        let mut writer = PdfWriter::new(Vec::new());
        assert!(writer.write_image_page(0, 0, b"").is_err());
        assert!(writer.error().is_none());
        writer.write_image_page(1, 1, b"x").unwrap();
        assert!(writer.finish().is_ok());
    }
}
