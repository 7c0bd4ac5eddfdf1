//! PDF token serialization.
//!
//! Each type here wraps a value and renders it, through `Display`, in the
//! syntax of PDF specification ISO 32000-1:2008 Section 7.3. The ledger
//! formats whole lines at once, so tokens never need an intermediate buffer.

use crate::object::ObjectRef;
use std::fmt;

/// A PDF name (`/Type`), escaping delimiters and non-regular bytes as `#xx`.
#[derive(Debug, Clone, Copy)]
pub struct Name<'a>(pub &'a str);

impl fmt::Display for Name<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("/")?;
        for byte in self.0.bytes() {
            match byte {
                b'!'
                | b'"'
                | b'$'
                | b'&'
                | b'\''
                | b'*'..=b'.'
                | b'0'..=b';'
                | b'='
                | b'?'
                | b'@'
                | b'A'..=b'Z'
                | b'\\'
                | b'^'..=b'z'
                | b'|'
                | b'~' => write!(f, "{}", byte as char)?,
                _ => write!(f, "#{:02X}", byte)?,
            }
        }
        Ok(())
    }
}

/// A PDF string.
///
/// Printable ASCII uses literal syntax `(...)` with escapes; anything else
/// falls back to hex syntax `<...>`.
#[derive(Debug, Clone, Copy)]
pub struct PdfString<'a>(pub &'a [u8]);

impl fmt::Display for PdfString<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let is_printable = self
            .0
            .iter()
            .all(|&b| b == b'\n' || b == b'\r' || b == b'\t' || (0x20..=0x7E).contains(&b));

        if !is_printable {
            return fmt::Display::fmt(&HexString(self.0), f);
        }

        f.write_str("(")?;
        for &byte in self.0 {
            match byte {
                b'(' => f.write_str("\\(")?,
                b')' => f.write_str("\\)")?,
                b'\\' => f.write_str("\\\\")?,
                b'\n' => f.write_str("\\n")?,
                b'\r' => f.write_str("\\r")?,
                b'\t' => f.write_str("\\t")?,
                _ => write!(f, "{}", byte as char)?,
            }
        }
        f.write_str(")")
    }
}

/// A hex string `<...>`, lowercase.
#[derive(Debug, Clone, Copy)]
pub struct HexString<'a>(pub &'a [u8]);

impl fmt::Display for HexString<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<")?;
        for byte in self.0 {
            write!(f, "{:02x}", byte)?;
        }
        f.write_str(">")
    }
}

/// A page-space coordinate: two decimals, with exact zero printed as `0`.
#[derive(Debug, Clone, Copy)]
pub struct Coordinate(pub f64);

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0.0 {
            f.write_str("0")
        } else {
            write!(f, "{:.2}", self.0)
        }
    }
}

/// A box anchored at the origin: `[0 0 width height]`.
#[derive(Debug, Clone, Copy)]
pub struct OriginRect {
    /// Box width in points
    pub width: f64,
    /// Box height in points
    pub height: f64,
}

impl fmt::Display for OriginRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[0 0 {} {}]", Coordinate(self.width), Coordinate(self.height))
    }
}

/// An array of indirect references: `[ 3 0 R 6 0 R ]`.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceArray<'a>(pub &'a [ObjectRef]);

impl fmt::Display for ReferenceArray<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[ ")?;
        for r in self.0 {
            write!(f, "{} ", r)?;
        }
        f.write_str("]")
    }
}
