use markdown_weaver_escape::{FmtWriter, escape_html};
use std::fmt::Write;

/// How literal text and interpolated values are written for a syntax.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Escaping {
    /// Written as-is.
    #[default]
    Verbatim,
    /// `& < > " '` replaced by character references.
    Html,
}

impl Escaping {
    pub fn write<W: Write>(self, writer: &mut W, text: &str) -> std::fmt::Result {
        match self {
            Escaping::Verbatim => writer.write_str(text),
            Escaping::Html => write_escaped_html(writer, text),
        }
    }

    /// Appends `text` to `out`, escaped.
    pub fn push(self, out: &mut String, text: &str) -> std::fmt::Result {
        self.write(out, text)
    }
}

/// Escapes markup-significant characters, apostrophes included, so the
/// result is safe both as element content and inside either kind of
/// quoted attribute.
pub fn write_escaped_html<W: Write>(writer: &mut W, text: &str) -> std::fmt::Result {
    let mut pieces = text.split('\'');
    if let Some(first) = pieces.next() {
        escape_html(FmtWriter(&mut *writer), first)?;
    }
    for piece in pieces {
        writer.write_str("&#x27;")?;
        escape_html(FmtWriter(&mut *writer), piece)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn html(text: &str) -> String {
        let mut out = String::new();
        Escaping::Html.push(&mut out, text).unwrap();
        out
    }

    #[test]
    fn test_html_escapes_all_significant_characters() {
        assert_eq!(
            html(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#x27;s&lt;/a&gt;"
        );
    }

    #[test]
    fn test_html_leading_and_trailing_apostrophes() {
        assert_eq!(html("'quoted'"), "&#x27;quoted&#x27;");
        assert_eq!(html(""), "");
    }

    #[test]
    fn test_verbatim_passes_through() {
        let mut out = String::new();
        Escaping::Verbatim.push(&mut out, "<b>&'\"").unwrap();
        assert_eq!(out, "<b>&'\"");
    }
}
