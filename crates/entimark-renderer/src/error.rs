use miette::Diagnostic;
use std::ops::Range;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum ConvertError {
    #[error("entity #{index} ({kind}) has a negative span: offset {offset}, length {length}")]
    #[diagnostic(
        code(entimark::span::negative),
        help("offsets and lengths are counted in UTF-16 code units and cannot be negative")
    )]
    NegativeSpan {
        index: usize,
        kind: &'static str,
        offset: i64,
        length: i64,
    },

    #[error("entity #{index} ({kind}) ends at {end}, past the end of the text ({len} UTF-16 units)")]
    #[diagnostic(code(entimark::span::out_of_bounds))]
    SpanOutOfBounds {
        index: usize,
        kind: &'static str,
        end: i64,
        len: usize,
    },

    #[error("entity #{index} ({kind}) has a boundary at {offset}, inside a surrogate pair")]
    #[diagnostic(
        code(entimark::span::surrogate),
        help("offsets must be counted in UTF-16 code units, not bytes or characters")
    )]
    SplitsSurrogatePair {
        index: usize,
        kind: &'static str,
        offset: usize,
    },

    #[error(
        "entity #{first} ({first_kind}, {first_span:?}) and entity #{second} ({second_kind}, {second_span:?}) overlap without nesting"
    )]
    #[diagnostic(
        code(entimark::span::crossing),
        help("split one of the entities so that they nest, or allow crossing spans to render them anyway")
    )]
    CrossingSpans {
        first: usize,
        first_kind: &'static str,
        first_span: Range<usize>,
        second: usize,
        second_kind: &'static str,
        second_span: Range<usize>,
    },

    #[error("failed to write markup: {0}")]
    #[diagnostic(code(entimark::write))]
    Fmt(#[from] std::fmt::Error),
}
