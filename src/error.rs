//! Error types for the PDF writer.
//!
//! Writing can only really fail in one way: the sink refuses bytes. The other
//! variants describe caller input that was rejected before anything reached
//! the sink, so they leave the writer usable.

use std::sync::Arc;

/// Result type alias for writer operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while writing a PDF.
///
/// `Error` is `Clone` so a writer can hand the same sink failure back from
/// every call made after it.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// The output sink failed or accepted fewer bytes than requested.
    #[error("Sink write failed at byte {offset}: {source}")]
    Sink {
        /// Bytes successfully written before the failure
        offset: u64,
        /// Underlying IO error
        #[source]
        source: Arc<std::io::Error>,
    },

    /// Page or image dimensions that cannot describe a page box
    #[error("Invalid page dimensions: {width} x {height}")]
    InvalidDimensions {
        /// Requested width
        width: f64,
        /// Requested height
        height: f64,
    },

    /// Image header could not be read
    #[error("Image error: {0}")]
    Image(String),

    /// The document information dictionary was already written
    #[error("Document information dictionary already written")]
    InfoAlreadyWritten,

    /// An object id was reserved but its object never reached the sink
    #[error("Object {0} was reserved but never written")]
    UnwrittenObject(u32),
}

impl Error {
    /// Whether this error came from the sink (and therefore poisons a writer).
    pub fn is_sink(&self) -> bool {
        matches!(self, Error::Sink { .. })
    }
}
