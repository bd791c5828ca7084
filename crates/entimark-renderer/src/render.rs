use crate::index::{PositionIndex, SpanTag};
use crate::syntax::SyntaxDictionary;
use crate::units::TextUnits;
use std::fmt::Write;

/// Writes markup and escaped literal text for one syntax.
pub struct MarkupWriter<'d, W: Write> {
    writer: W,
    dict: &'d SyntaxDictionary,
}

impl<'d, W: Write> MarkupWriter<'d, W> {
    pub fn new(writer: W, dict: &'d SyntaxDictionary) -> Self {
        Self { writer, dict }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    pub fn dictionary(&self) -> &'d SyntaxDictionary {
        self.dict
    }

    /// Literal text, with `\n` removed and the syntax's escaping applied.
    pub fn write_text(&mut self, text: &str) -> std::fmt::Result {
        for piece in text.split('\n') {
            self.dict.text_escaping.write(&mut self.writer, piece)?;
        }
        Ok(())
    }

    pub fn write_markup(&mut self, markup: &str) -> std::fmt::Result {
        self.writer.write_str(markup)
    }
}

/// Walks the index once and writes the whole message.
///
/// At every offset, tags close first and each close pops the open-tag
/// stack. The line break comes next, then new tags open, then the text up to
/// the next offset. The output is wrapped once in the paragraph tag.
pub fn render_index<W: Write>(
    units: &TextUnits<'_>,
    index: &PositionIndex,
    output: &mut MarkupWriter<'_, W>,
) -> std::fmt::Result {
    let dict = output.dictionary();
    output.write_markup(&dict.paragraph.opening)?;

    let mut open: Vec<&SpanTag> = Vec::new();
    let mut positions = index.iter().peekable();
    while let Some((&offset, change)) = positions.next() {
        for tag in &change.to_close {
            match open.pop() {
                Some(top) if top.entity == tag.entity => {}
                Some(top) => tracing::warn!(
                    offset,
                    closing = tag.entity,
                    innermost = top.entity,
                    "closing tag does not match the innermost open tag"
                ),
                None => {
                    tracing::warn!(offset, closing = tag.entity, "closing tag with nothing open")
                }
            }
            output.write_markup(&tag.tag.closing)?;
        }

        if change.line_break {
            if open.iter().any(|t| t.code_like) {
                output.write_markup(&dict.newline.closing)?;
            } else {
                output.write_markup(&dict.paragraph.closing)?;
                output.write_markup(&dict.paragraph.opening)?;
            }
        }

        for tag in &change.to_open {
            output.write_markup(&tag.tag.opening)?;
            open.push(tag);
        }

        let next = positions.peek().map(|(next, _)| **next).unwrap_or(units.len());
        if let Some(segment) = units.slice(offset, next) {
            output.write_text(segment)?;
        }
    }

    output.write_markup(&dict.paragraph.closing)
}
