//! Object and offset bookkeeping.
//!
//! The ledger hands out object numbers, remembers where in the output each
//! object starts, and owns the only path bytes take to the sink. Because every
//! byte goes through the [`CountingWriter`], the recorded offsets are exactly
//! the positions of the `N 0 obj` lines in the final file.
//!
//! The first sink failure is kept. From then on every operation returns that
//! same error without touching the sink, and the offset table is never read
//! again.

use super::counting_writer::CountingWriter;
use crate::error::{Error, Result};
use crate::object::ObjectRef;
use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;

/// Object number allocator and offset table bound to one output sink.
#[derive(Debug)]
pub struct ObjectLedger<W> {
    sink: CountingWriter<W>,
    /// Indexed by object number - 1. `None` until the object's header is written.
    offsets: Vec<Option<u64>>,
    error: Option<Error>,
}

impl<W: Write> ObjectLedger<W> {
    /// Create a ledger writing to `sink`.
    pub fn new(sink: CountingWriter<W>) -> Self {
        Self {
            sink,
            offsets: Vec::new(),
            error: None,
        }
    }

    /// Current output position: the number of bytes the sink has accepted.
    pub fn offset(&self) -> u64 {
        self.sink.count()
    }

    /// Number of object numbers handed out so far.
    pub fn object_count(&self) -> usize {
        self.offsets.len()
    }

    /// Recorded start offset of an object, if its header has been written.
    pub fn object_offset(&self, obj: ObjectRef) -> Option<u64> {
        let index = (obj.id as usize).checked_sub(1)?;
        self.offsets.get(index).copied().flatten()
    }

    /// The first sink failure, if any.
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    /// Return the sticky error, if one has been recorded.
    pub fn check(&self) -> Result<()> {
        match &self.error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    /// Allocate the next object number without writing anything.
    ///
    /// Objects may be reserved ahead of time so that references between them
    /// can be written before the referenced object exists.
    pub fn reserve(&mut self) -> ObjectRef {
        self.offsets.push(None);
        ObjectRef::new(self.offsets.len() as u32, 0)
    }

    /// Record the current offset for `obj` and write its `N 0 obj` line.
    ///
    /// # Panics
    ///
    /// Panics if `obj` was not reserved from this ledger or has already been
    /// begun. Either means the caller's object layout is broken.
    pub fn begin_object(&mut self, obj: ObjectRef) -> Result<()> {
        self.check()?;
        let index = (obj.id as usize).wrapping_sub(1);
        assert!(
            matches!(self.offsets.get(index), Some(None)),
            "object {} was not reserved or was already written",
            obj.id
        );
        let offset = self.offset();
        self.offsets[index] = Some(offset);
        log::trace!("object {} at offset {}", obj.id, offset);
        self.line(format_args!("{} {} obj", obj.id, obj.gen))
    }

    /// Begin an object whose body is a dictionary (`N 0 obj` then `<<`).
    pub fn begin_dictionary(&mut self, obj: ObjectRef) -> Result<()> {
        self.begin_object(obj)?;
        self.line(format_args!("<<"))
    }

    /// Close a dictionary object (`>>` then `endobj`).
    pub fn end_dictionary(&mut self) -> Result<()> {
        self.line(format_args!(">>"))?;
        self.end_object()
    }

    /// Close an object whose body has already been written.
    pub fn end_object(&mut self) -> Result<()> {
        self.line(format_args!("endobj"))
    }

    /// Write a complete stream object: dictionary entries supplied by
    /// `entries`, the exact `/Length` of `data`, then the framed payload.
    pub fn write_stream_object<F>(&mut self, obj: ObjectRef, data: &[u8], entries: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        self.begin_dictionary(obj)?;
        entries(self)?;
        self.line(format_args!("/Length {}", data.len()))?;
        self.line(format_args!(">>"))?;
        self.line(format_args!("stream"))?;
        self.write_bytes(data)?;
        self.write_bytes(b"\n")?;
        self.line(format_args!("endstream"))?;
        self.end_object()
    }

    /// Write one line of formatted text followed by `\n`.
    pub fn line(&mut self, args: fmt::Arguments<'_>) -> Result<()> {
        self.check()?;
        let result = self
            .sink
            .write_fmt(args)
            .and_then(|()| self.sink.write_all(b"\n"));
        self.record(result)
    }

    /// Write raw bytes.
    pub fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.check()?;
        let result = self.sink.write_all(data);
        self.record(result)
    }

    /// Write the cross-reference section and return its starting offset.
    ///
    /// Fails with [`Error::UnwrittenObject`] if any reserved object never
    /// reached the sink.
    pub fn write_xref(&mut self) -> Result<u64> {
        self.check()?;
        let offsets = self
            .offsets
            .iter()
            .enumerate()
            .map(|(i, offset)| offset.ok_or(Error::UnwrittenObject(i as u32 + 1)))
            .collect::<Result<Vec<u64>>>()?;

        let start = self.offset();
        self.line(format_args!("xref"))?;
        self.line(format_args!("0 {}", offsets.len() + 1))?;
        // Entries are exactly 20 bytes: the trailing space pads the one-byte EOL.
        self.line(format_args!("0000000000 65535 f "))?;
        for offset in offsets {
            self.line(format_args!("{:010} 00000 n ", offset))?;
        }
        Ok(start)
    }

    /// Flush the sink.
    pub fn flush(&mut self) -> Result<()> {
        self.check()?;
        let result = self.sink.flush();
        self.record(result)
    }

    /// MD5 of everything written so far, when the sink was built with hashing.
    pub fn digest(&self) -> Option<Vec<u8>> {
        self.sink.digest()
    }

    /// Unwrap the counting sink.
    pub fn into_inner(self) -> CountingWriter<W> {
        self.sink
    }

    fn record(&mut self, result: io::Result<()>) -> Result<()> {
        match result {
            Ok(()) => Ok(()),
            Err(e) => {
                let err = Error::Sink {
                    offset: self.offset(),
                    source: Arc::new(e),
                };
                log::warn!("PDF output failed, writer is now inert: {}", err);
                self.error = Some(err.clone());
                Err(err)
            },
        }
    }
}
