//! PDF content stream builder.
//!
//! Builds the small graphics programs that image pages need, following
//! PDF specification ISO 32000-1:2008 Section 8.

use super::object_serializer::{Coordinate, Name};
use std::io::Write;

/// Operations that can be added to a content stream.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentStreamOp {
    /// Save graphics state (q)
    SaveState,
    /// Restore graphics state (Q)
    RestoreState,
    /// Set transformation matrix (cm)
    Transform(f64, f64, f64, f64, f64, f64),
    /// Paint XObject (Do)
    PaintXObject(String),
}

/// Builder for page content streams.
#[derive(Debug, Clone, Default)]
pub struct ContentStreamBuilder {
    operations: Vec<ContentStreamOp>,
}

impl ContentStreamBuilder {
    /// Create a new content stream builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an operation to the stream.
    pub fn op(&mut self, op: ContentStreamOp) -> &mut Self {
        self.operations.push(op);
        self
    }

    /// Save the graphics state.
    pub fn save_state(&mut self) -> &mut Self {
        self.op(ContentStreamOp::SaveState)
    }

    /// Restore the graphics state.
    pub fn restore_state(&mut self) -> &mut Self {
        self.op(ContentStreamOp::RestoreState)
    }

    /// Concatenate a matrix onto the CTM.
    pub fn transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> &mut Self {
        self.op(ContentStreamOp::Transform(a, b, c, d, e, f))
    }

    /// Draw an image XObject at the specified position and size.
    ///
    /// Images occupy the unit square in their own space, so scaling by the
    /// display size maps them onto the requested box.
    pub fn draw_image(
        &mut self,
        resource_id: &str,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> &mut Self {
        self.save_state()
            .transform(width, 0.0, 0.0, height, x, y)
            .op(ContentStreamOp::PaintXObject(resource_id.to_string()))
            .restore_state()
    }

    /// Operations recorded so far.
    pub fn operations(&self) -> &[ContentStreamOp] {
        &self.operations
    }

    /// Build the content stream bytes, one operator per line.
    pub fn build(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        for op in &self.operations {
            // Writing into a Vec cannot fail.
            let _ = Self::write_op(&mut buf, op);
        }
        buf
    }

    fn write_op<W: Write>(w: &mut W, op: &ContentStreamOp) -> std::io::Result<()> {
        match op {
            ContentStreamOp::SaveState => writeln!(w, "q"),
            ContentStreamOp::RestoreState => writeln!(w, "Q"),
            ContentStreamOp::Transform(a, b, c, d, e, f) => writeln!(
                w,
                "{} {} {} {} {} {} cm",
                Coordinate(*a),
                Coordinate(*b),
                Coordinate(*c),
                Coordinate(*d),
                Coordinate(*e),
                Coordinate(*f)
            ),
            ContentStreamOp::PaintXObject(name) => writeln!(w, "{} Do", Name(name)),
        }
    }
}
