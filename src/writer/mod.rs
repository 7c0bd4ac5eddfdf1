//! PDF writing module.
//!
//! ## Architecture
//!
//! ```text
//! caller
//!     ↓
//! [PdfWriter] (pages, info dictionary, finish)
//!     ↓                         ↘
//! [ContentStreamBuilder]   [JpegImage]
//!     ↓                         ↙
//! [ObjectLedger] (object numbers, offsets, sticky error)
//!     ↓
//! [CountingWriter] (byte count, optional MD5)
//!     ↓
//! io::Write sink
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use jpeg_pdf::writer::PdfWriter;
//! use std::fs::File;
//! use std::io::BufWriter;
//!
//! # fn main() -> jpeg_pdf::Result<()> {
//! let jpeg = std::fs::read("scan.jpg").expect("read image");
//! let file = File::create("scan.pdf").expect("create output");
//!
//! let mut writer = PdfWriter::new(BufWriter::new(file));
//! writer.write_image_page(1500, 1050, &jpeg)?;
//! writer.finish()?;
//! # Ok(())
//! # }
//! ```

mod content_stream;
mod counting_writer;
mod image_handler;
mod object_ledger;
mod object_serializer;
mod pdf_writer;

pub use content_stream::{ContentStreamBuilder, ContentStreamOp};
pub use counting_writer::CountingWriter;
pub use image_handler::{
    probe_dimensions, JpegImage, IMAGE_BITS_PER_COMPONENT, IMAGE_COLOR_SPACE,
    IMAGE_RESOURCE_NAME, JPEG_FILTER,
};
pub use object_ledger::ObjectLedger;
pub use object_serializer::{Coordinate, HexString, Name, OriginRect, PdfString, ReferenceArray};
pub use pdf_writer::{DocumentId, PdfWriter, PdfWriterConfig, PLACEHOLDER_DOCUMENT_ID};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_exports() {
        let _builder = ContentStreamBuilder::new();
        let _config = PdfWriterConfig::default();
        assert_eq!(Name(IMAGE_RESOURCE_NAME).to_string(), "/I");
    }
}
