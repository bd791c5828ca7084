//! Conversion between UTF-16 text units and byte offsets into a `str`.
//!
//! Entity spans are measured in UTF-16 code units, while Rust strings are
//! indexed by UTF-8 bytes. Every span boundary and every substring goes
//! through [`TextUnits`].

/// Lookup table from UTF-16 unit offset to byte offset.
#[derive(Debug, Clone)]
pub struct TextUnits<'a> {
    text: &'a str,
    /// One entry per unit boundary plus the end of the text. `None` marks the
    /// position between the two halves of a surrogate pair.
    boundaries: Vec<Option<usize>>,
}

impl<'a> TextUnits<'a> {
    pub fn new(text: &'a str) -> Self {
        let mut boundaries = Vec::with_capacity(text.len() + 1);
        for (byte, c) in text.char_indices() {
            boundaries.push(Some(byte));
            if c.len_utf16() == 2 {
                boundaries.push(None);
            }
        }
        boundaries.push(Some(text.len()));
        Self { text, boundaries }
    }

    /// Length of the text in UTF-16 units.
    pub fn len(&self) -> usize {
        self.boundaries.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Byte offset of a unit offset, or `None` when it is out of range or
    /// splits a surrogate pair.
    pub fn byte_offset(&self, unit: usize) -> Option<usize> {
        self.boundaries.get(unit).copied().flatten()
    }

    /// The text covered by the unit range `start..end`.
    pub fn slice(&self, start: usize, end: usize) -> Option<&'a str> {
        let start = self.byte_offset(start)?;
        let end = self.byte_offset(end)?;
        self.text.get(start..end)
    }

    /// Unit offsets of every `\n` in the text.
    pub fn line_breaks(&self) -> Vec<usize> {
        let mut unit = 0;
        let mut breaks = Vec::new();
        for c in self.text.chars() {
            if c == '\n' {
                breaks.push(unit);
            }
            unit += c.len_utf16();
        }
        breaks
    }
}
