//! PDF document writer.
//!
//! Streams a complete PDF document to any `Write` sink in a single forward
//! pass: header, an optional information dictionary, pages in call order,
//! then the pages tree, catalog, xref table and trailer.
//!
//! Objects that refer to each other (a page, its content stream and its
//! image) have their numbers reserved together before any of them is
//! written, so every reference names a real, already-allocated object.
//! The pages tree is reserved as object 1 when the writer is created so
//! every page can name its `/Parent`; it is the one object written out of
//! number order.

use super::content_stream::ContentStreamBuilder;
use super::counting_writer::CountingWriter;
use super::image_handler::{
    JpegImage, IMAGE_BITS_PER_COMPONENT, IMAGE_COLOR_SPACE, IMAGE_RESOURCE_NAME, JPEG_FILTER,
};
use super::object_ledger::ObjectLedger;
use super::object_serializer::{HexString, Name, OriginRect, PdfString, ReferenceArray};
use crate::error::{Error, Result};
use crate::object::ObjectRef;
use crate::units::DEFAULT_DPI;
use chrono::{DateTime, TimeZone};
use std::fmt;
use std::io::Write;

/// Placeholder written as both halves of the trailer `/ID`.
///
/// Every document gets the same identifier unless a different
/// [`DocumentId`] policy is configured.
pub const PLACEHOLDER_DOCUMENT_ID: &[u8] = &[0xde, 0xad, 0xbe, 0xef];

/// How the trailer `/ID` pair is produced.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DocumentId {
    /// The fixed `<deadbeef>` placeholder.
    #[default]
    Placeholder,
    /// Caller-supplied identifier bytes.
    Fixed(Vec<u8>),
    /// MD5 of every byte written before the trailer.
    ContentDigest,
}

/// Configuration for PDF generation.
#[derive(Debug, Clone)]
pub struct PdfWriterConfig {
    /// PDF version written in the header (e.g., "1.3")
    pub version: String,
    /// Resolution used to size image pages
    pub dpi: f64,
    /// `/Producer` entry of the information dictionary
    pub producer: String,
    /// Trailer `/ID` policy
    pub document_id: DocumentId,
    /// Whether to follow the header with a comment of high-bit bytes
    pub binary_marker: bool,
}

impl Default for PdfWriterConfig {
    fn default() -> Self {
        Self {
            version: "1.3".to_string(),
            dpi: DEFAULT_DPI,
            producer: concat!("jpeg_pdf ", env!("CARGO_PKG_VERSION")).to_string(),
            document_id: DocumentId::Placeholder,
            binary_marker: true,
        }
    }
}

impl PdfWriterConfig {
    /// Set the header version.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Set the image page resolution in dots per inch.
    pub fn with_dpi(mut self, dpi: f64) -> Self {
        self.dpi = dpi;
        self
    }

    /// Set the producer recorded in the information dictionary.
    pub fn with_producer(mut self, producer: impl Into<String>) -> Self {
        self.producer = producer.into();
        self
    }

    /// Set the trailer `/ID` policy.
    pub fn with_document_id(mut self, document_id: DocumentId) -> Self {
        self.document_id = document_id;
        self
    }

    /// Enable or disable the binary marker comment after the header.
    pub fn with_binary_marker(mut self, binary_marker: bool) -> Self {
        self.binary_marker = binary_marker;
        self
    }
}

/// Single-pass PDF writer.
///
/// Every operation returns a `Result`, but checking each one is optional:
/// after the first sink failure the writer stops writing, and the same
/// error comes back from every later call including [`PdfWriter::finish`].
pub struct PdfWriter<W: Write> {
    config: PdfWriterConfig,
    ledger: ObjectLedger<W>,
    /// Reserved up front, written by `finish`
    pages_tree: ObjectRef,
    /// Page objects in document order
    pages: Vec<ObjectRef>,
    info: Option<ObjectRef>,
}

impl<W: Write> fmt::Debug for PdfWriter<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PdfWriter")
            .field("config", &self.config)
            .field("offset", &self.ledger.offset())
            .field("objects", &self.ledger.object_count())
            .field("pages_tree", &self.pages_tree)
            .field("pages", &self.pages)
            .field("info", &self.info)
            .field("error", &self.ledger.error())
            .finish()
    }
}

impl<W: Write> PdfWriter<W> {
    /// Create a writer with the default config and write the header.
    pub fn new(sink: W) -> Self {
        Self::with_config(sink, PdfWriterConfig::default())
    }

    /// Create a writer with a custom config and write the header.
    ///
    /// A header that fails to write is reported by the next call.
    pub fn with_config(sink: W, config: PdfWriterConfig) -> Self {
        let sink = match config.document_id {
            DocumentId::ContentDigest => CountingWriter::with_digest(sink),
            _ => CountingWriter::new(sink),
        };
        let mut ledger = ObjectLedger::new(sink);
        let pages_tree = ledger.reserve();
        let mut writer = Self {
            config,
            ledger,
            pages_tree,
            pages: Vec::new(),
            info: None,
        };
        let _ = writer.write_header();
        writer
    }

    fn write_header(&mut self) -> Result<()> {
        self.ledger.line(format_args!("%PDF-{}", self.config.version))?;
        if self.config.binary_marker {
            self.ledger.write_bytes(b"%\xE2\xE3\xCF\xD3\n")?;
        }
        Ok(())
    }

    /// Writer configuration.
    pub fn config(&self) -> &PdfWriterConfig {
        &self.config
    }

    /// Bytes written so far.
    pub fn offset(&self) -> u64 {
        self.ledger.offset()
    }

    /// Page objects written so far, in document order.
    pub fn pages(&self) -> &[ObjectRef] {
        &self.pages
    }

    /// The first sink failure, if any.
    pub fn error(&self) -> Option<&Error> {
        self.ledger.error()
    }

    /// Write the document information dictionary.
    ///
    /// `timestamp` is used for both the creation and modification dates and
    /// is written in its own time zone, without an offset suffix. May be
    /// called at most once.
    pub fn write_info<Tz>(&mut self, title: &str, timestamp: &DateTime<Tz>) -> Result<ObjectRef>
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        self.ledger.check()?;
        if self.info.is_some() {
            return Err(Error::InfoAlreadyWritten);
        }

        let date = timestamp.format("%Y%m%d%H%M%S").to_string();
        let info = self.ledger.reserve();
        self.ledger.begin_dictionary(info)?;
        self.ledger.line(format_args!("/Title {}", PdfString(title.as_bytes())))?;
        self.ledger.line(format_args!("/CreationDate (D:{})", date))?;
        self.ledger.line(format_args!("/ModDate (D:{})", date))?;
        self.ledger
            .line(format_args!("/Producer {}", PdfString(self.config.producer.as_bytes())))?;
        self.ledger.end_dictionary()?;

        self.info = Some(info);
        Ok(info)
    }

    /// Write a page whose content stream is supplied by the caller.
    ///
    /// `width` and `height` are the page box in points.
    pub fn write_page(&mut self, width: f64, height: f64, content: &[u8]) -> Result<ObjectRef> {
        self.ledger.check()?;
        validate_page_box(width, height)?;

        let page = self.ledger.reserve();
        let contents = self.ledger.reserve();

        self.write_page_dictionary(page, width, height, contents, None)?;
        self.ledger.write_stream_object(contents, content, |_| Ok(()))?;

        self.pages.push(page);
        log::debug!(
            "page {} written as object {} ({} x {} pt, {} content bytes)",
            self.pages.len(),
            page.id,
            width,
            height,
            content.len()
        );
        Ok(page)
    }

    /// Write a page showing a JPEG that fills the whole page.
    ///
    /// The page is sized so the image displays at the configured resolution.
    pub fn write_image_page(&mut self, width: u32, height: u32, jpeg: &[u8]) -> Result<ObjectRef> {
        self.ledger.check()?;
        let image = JpegImage::new(width, height, jpeg)?;
        self.write_jpeg_image_page(&image)
    }

    /// Write an image page, taking the pixel size from an already decoded image.
    pub fn write_jpeg_page<I>(&mut self, decoded: &I, jpeg: &[u8]) -> Result<ObjectRef>
    where
        I: image::GenericImageView,
    {
        self.ledger.check()?;
        let image = JpegImage::from_decoded(decoded, jpeg)?;
        self.write_jpeg_image_page(&image)
    }

    /// Write an image page for a [`JpegImage`].
    pub fn write_jpeg_image_page(&mut self, image: &JpegImage<'_>) -> Result<ObjectRef> {
        let (width, height) = image.page_size(self.config.dpi);
        self.ledger.check()?;
        validate_page_box(width, height)?;

        let page = self.ledger.reserve();
        let contents = self.ledger.reserve();
        let xobject = self.ledger.reserve();

        self.write_page_dictionary(page, width, height, contents, Some(xobject))?;

        let mut program = ContentStreamBuilder::new();
        program.draw_image(IMAGE_RESOURCE_NAME, 0.0, 0.0, width, height);
        self.ledger
            .write_stream_object(contents, &program.build(), |_| Ok(()))?;

        self.write_image_xobject(xobject, image)?;

        self.pages.push(page);
        log::debug!(
            "image page {} written as object {} ({}x{} px, {} JPEG bytes)",
            self.pages.len(),
            page.id,
            image.width,
            image.height,
            image.data.len()
        );
        Ok(page)
    }

    /// Write a standalone image XObject that no page references yet.
    pub fn write_image_object(&mut self, width: u32, height: u32, jpeg: &[u8]) -> Result<ObjectRef> {
        self.ledger.check()?;
        let image = JpegImage::new(width, height, jpeg)?;
        let xobject = self.ledger.reserve();
        self.write_image_xobject(xobject, &image)?;
        Ok(xobject)
    }

    /// Write an indirect object whose body is a single integer.
    pub fn write_integer_object(&mut self, value: i64) -> Result<ObjectRef> {
        self.ledger.check()?;
        let obj = self.ledger.reserve();
        self.ledger.begin_object(obj)?;
        self.ledger.line(format_args!("{}", value))?;
        self.ledger.end_object()?;
        Ok(obj)
    }

    fn write_page_dictionary(
        &mut self,
        page: ObjectRef,
        width: f64,
        height: f64,
        contents: ObjectRef,
        xobject: Option<ObjectRef>,
    ) -> Result<()> {
        let page_box = OriginRect { width, height };
        self.ledger.begin_dictionary(page)?;
        self.ledger.line(format_args!("/Type /Page"))?;
        self.ledger.line(format_args!("/Parent {}", self.pages_tree))?;
        self.ledger.line(format_args!("/MediaBox {}", page_box))?;
        self.ledger.line(format_args!("/CropBox {}", page_box))?;
        self.ledger.line(format_args!("/Contents {}", contents))?;
        if let Some(xobject) = xobject {
            self.ledger.line(format_args!(
                "/Resources << /XObject << {} {} >> >>",
                Name(IMAGE_RESOURCE_NAME),
                xobject
            ))?;
        }
        self.ledger.end_dictionary()
    }

    fn write_image_xobject(&mut self, xobject: ObjectRef, image: &JpegImage<'_>) -> Result<()> {
        self.ledger.write_stream_object(xobject, image.data, |ledger| {
            ledger.line(format_args!("/Type /XObject"))?;
            ledger.line(format_args!("/Subtype /Image"))?;
            ledger.line(format_args!("/Name {}", Name(IMAGE_RESOURCE_NAME)))?;
            ledger.line(format_args!("/Filter [ {} ]", Name(JPEG_FILTER)))?;
            ledger.line(format_args!("/Width {}", image.width))?;
            ledger.line(format_args!("/Height {}", image.height))?;
            ledger.line(format_args!("/ColorSpace {}", Name(IMAGE_COLOR_SPACE)))?;
            ledger.line(format_args!("/BitsPerComponent {}", IMAGE_BITS_PER_COMPONENT))
        })
    }

    /// Finish the document and hand back the sink.
    ///
    /// Writes the pages tree, catalog, cross-reference table and trailer,
    /// then flushes. Returns the first error of the writer's lifetime if
    /// there was one.
    pub fn finish(mut self) -> Result<W> {
        self.ledger.check()?;

        let pages = self.pages_tree;
        self.ledger.begin_dictionary(pages)?;
        self.ledger.line(format_args!("/Type /Pages"))?;
        self.ledger.line(format_args!("/Kids {}", ReferenceArray(&self.pages)))?;
        self.ledger.line(format_args!("/Count {}", self.pages.len()))?;
        self.ledger.end_dictionary()?;

        let root = self.ledger.reserve();
        self.ledger.begin_dictionary(root)?;
        self.ledger.line(format_args!("/Type /Catalog"))?;
        self.ledger.line(format_args!("/Pages {}", pages))?;
        self.ledger.end_dictionary()?;

        let xref_start = self.ledger.write_xref()?;
        let id = self.document_id();

        self.ledger.line(format_args!("trailer"))?;
        self.ledger.line(format_args!("<<"))?;
        self.ledger
            .line(format_args!("/Size {}", self.ledger.object_count() + 1))?;
        if let Some(info) = self.info {
            self.ledger.line(format_args!("/Info {}", info))?;
        }
        self.ledger.line(format_args!("/Root {}", root))?;
        self.ledger
            .line(format_args!("/ID [{} {}]", HexString(&id), HexString(&id)))?;
        self.ledger.line(format_args!(">>"))?;
        self.ledger.line(format_args!("startxref"))?;
        self.ledger.line(format_args!("{}", xref_start))?;
        self.ledger.line(format_args!("%%EOF"))?;
        self.ledger.flush()?;

        log::debug!(
            "PDF finished: {} pages, {} objects, {} bytes",
            self.pages.len(),
            self.ledger.object_count(),
            self.ledger.offset()
        );
        Ok(self.ledger.into_inner().into_inner())
    }

    fn document_id(&self) -> Vec<u8> {
        match &self.config.document_id {
            DocumentId::Placeholder => PLACEHOLDER_DOCUMENT_ID.to_vec(),
            DocumentId::Fixed(bytes) => bytes.clone(),
            DocumentId::ContentDigest => self
                .ledger
                .digest()
                .unwrap_or_else(|| PLACEHOLDER_DOCUMENT_ID.to_vec()),
        }
    }
}

fn validate_page_box(width: f64, height: f64) -> Result<()> {
    if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidDimensions { width, height })
    }
}
