//! # jpeg_pdf
//!
//! Streaming PDF writer for documents made of JPEG pages.
//!
//! Output is produced in a single forward pass to any [`std::io::Write`]
//! sink: nothing is buffered beyond the page being written, and the
//! cross-reference table is built from byte offsets counted on the way out.
//! JPEG data is embedded unchanged under the DCTDecode filter.
//!
//! ## Quick Start
//!
//! ```no_run
//! use jpeg_pdf::writer::{PdfWriter, PdfWriterConfig};
//!
//! # fn main() -> jpeg_pdf::Result<()> {
//! let jpeg = std::fs::read("page1.jpg").expect("read image");
//! let (width, height) = jpeg_pdf::writer::probe_dimensions(&jpeg)?;
//!
//! let mut writer = PdfWriter::with_config(Vec::new(), PdfWriterConfig::default().with_dpi(300.0));
//! writer.write_info("Scans", &chrono::Local::now())?;
//! writer.write_image_page(width, height, &jpeg)?;
//! let pdf: Vec<u8> = writer.finish()?;
//! # let _ = pdf;
//! # Ok(())
//! # }
//! ```
//!
//! ## Errors
//!
//! A writer remembers the first failure of its sink. Later calls return
//! that error without writing, so it is enough to check the result of
//! [`writer::PdfWriter::finish`].

#![warn(missing_docs)]

// Error handling
pub mod error;

// PDF object references
pub mod object;

// Page measurement
pub mod units;

// PDF writing
pub mod writer;

// Re-exports
pub use error::{Error, Result};
pub use object::ObjectRef;
pub use writer::{DocumentId, PdfWriter, PdfWriterConfig};
