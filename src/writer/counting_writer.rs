//! Byte-counting sink wrapper.
//!
//! The offsets in the cross-reference table are only as good as the byte
//! count they are derived from. `CountingWriter` is the single place that
//! count lives: it adds the length the inner sink reports for every
//! successful `write`, and nothing else touches it.

use md5::{Digest, Md5};
use std::io::{self, Write};

/// A `Write` adapter that tracks how many bytes the inner sink accepted.
///
/// Optionally feeds every accepted byte into an MD5 digest so a document
/// identifier can be derived from the output in the same pass.
pub struct CountingWriter<W> {
    inner: W,
    count: u64,
    digest: Option<Md5>,
}

impl<W> std::fmt::Debug for CountingWriter<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CountingWriter")
            .field("count", &self.count)
            .field("digest", &self.digest.is_some())
            .finish()
    }
}

impl<W: Write> CountingWriter<W> {
    /// Wrap a sink, starting the count at zero.
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            count: 0,
            digest: None,
        }
    }

    /// Wrap a sink and hash everything written through it.
    pub fn with_digest(inner: W) -> Self {
        Self {
            inner,
            count: 0,
            digest: Some(Md5::new()),
        }
    }

    /// Number of bytes the inner sink has accepted so far.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// MD5 of all bytes accepted so far, if hashing was enabled.
    pub fn digest(&self) -> Option<Vec<u8>> {
        self.digest.clone().map(|d| d.finalize().to_vec())
    }

    /// Borrow the inner sink.
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Unwrap the inner sink.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.count += n as u64;
        if let Some(digest) = self.digest.as_mut() {
            digest.update(&buf[..n]);
        }
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
