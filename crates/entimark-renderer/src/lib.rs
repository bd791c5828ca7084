//! entimark renderer
//!
//! Converts message text plus formatting entities (offset/length spans
//! measured in UTF-16 code units) into HTML, Markdown, DokuWiki or plain text.
//!
//! ```
//! use entimark_renderer::{Entity, EntityKind, convert};
//!
//! let entities = [Entity::new(EntityKind::Bold, 0, 5)];
//! let html = convert("hello world", Some(&entities[..]), "html").unwrap();
//! assert_eq!(html, "<p><b>hello</b> world</p>");
//! ```

pub mod entity;
pub mod error;
pub mod escape;
pub mod index;
pub mod render;
pub mod syntax;
pub mod units;

pub use entity::{Entity, EntityKind};
pub use error::ConvertError;
pub use escape::Escaping;
pub use index::{PositionChange, PositionIndex, SpanTag};
pub use render::{MarkupWriter, render_index};
pub use syntax::{Syntax, SyntaxDictionary, Tag, TagMaker, TagRule};
pub use units::TextUnits;

use std::fmt::Write;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Render entities that overlap without nesting instead of rejecting
    /// them. Closing tags then pop whatever is innermost, which can produce
    /// mis-nested markup.
    pub allow_crossing_spans: bool,
}

/// One message and its entities, ready to be rendered in any syntax.
#[derive(Debug, Clone)]
pub struct MessageConverter<'a> {
    text: &'a str,
    entities: &'a [Entity],
    options: ConvertOptions,
}

impl<'a> MessageConverter<'a> {
    pub fn new(text: &'a str, entities: Option<&'a [Entity]>) -> Self {
        Self {
            text,
            entities: entities.unwrap_or_default(),
            options: ConvertOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ConvertOptions) -> Self {
        self.options = options;
        self
    }

    pub fn to_syntax(&self, syntax: Syntax) -> Result<String, ConvertError> {
        let mut output = String::with_capacity(self.text.len() * 2);
        self.write_syntax(syntax, &mut output)?;
        Ok(output)
    }

    /// Renders into `writer`.
    ///
    /// A message with no entities and no line breaks is written unchanged,
    /// without escaping or paragraph wrapping.
    pub fn write_syntax<W: Write>(
        &self,
        syntax: Syntax,
        writer: &mut W,
    ) -> Result<(), ConvertError> {
        let _span = tracing::debug_span!(
            "convert",
            %syntax,
            entities = self.entities.len(),
            len = self.text.len()
        )
        .entered();

        if self.entities.is_empty() && !self.text.contains('\n') {
            tracing::debug!("nothing to convert, passing text through");
            writer.write_str(self.text)?;
            return Ok(());
        }

        let dict = syntax.dictionary();
        let units = TextUnits::new(self.text);
        let index = PositionIndex::build(
            &units,
            self.entities,
            &dict,
            self.options.allow_crossing_spans,
        )?;
        tracing::trace!(positions = index.len(), "built position index");

        let mut output = MarkupWriter::new(writer, &dict);
        render_index(&units, &index, &mut output)?;
        Ok(())
    }
}

/// Renders `text` with `entities` in the syntax named by `syntax`.
///
/// Syntax names are matched case-insensitively:
/// - `docuwiki`, `dokuwiki` or `dw` select DokuWiki;
/// - `markdown` or `md` select Markdown;
/// - `html` selects HTML;
/// - anything else selects plain text.
pub fn convert(
    text: &str,
    entities: Option<&[Entity]>,
    syntax: &str,
) -> Result<String, ConvertError> {
    MessageConverter::new(text, entities).to_syntax(Syntax::parse(syntax))
}
