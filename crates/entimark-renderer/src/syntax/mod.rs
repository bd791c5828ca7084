//! Target syntaxes and their tag dictionaries.
//!
//! Every syntax maps every [`EntityKind`] to a [`TagRule`] with an exhaustive
//! `match`, so a kind without a rule does not compile.

mod dokuwiki;
mod html;
mod markdown;
mod plain;

use crate::entity::{Entity, EntityKind};
use crate::escape::Escaping;
use std::borrow::Cow;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Opening and closing markup for one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub opening: Cow<'static, str>,
    pub closing: Cow<'static, str>,
}

impl Tag {
    pub const fn new(opening: &'static str, closing: &'static str) -> Self {
        Self {
            opening: Cow::Borrowed(opening),
            closing: Cow::Borrowed(closing),
        }
    }

    pub fn owned(
        opening: impl Into<Cow<'static, str>>,
        closing: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            opening: opening.into(),
            closing: closing.into(),
        }
    }
}

/// Builds a tag from an entity and the text it covers.
pub type TagMaker = fn(&Entity, &str) -> Result<Tag, fmt::Error>;

/// What a syntax does with one entity kind.
#[derive(Debug, Clone)]
pub enum TagRule {
    /// No markup; the covered text is still rendered.
    None,
    Static(Tag),
    Dynamic(TagMaker),
}

impl TagRule {
    pub fn resolve(&self, entity: &Entity, covered: &str) -> Result<Option<Tag>, fmt::Error> {
        match self {
            TagRule::None => Ok(None),
            TagRule::Static(tag) => Ok(Some(tag.clone())),
            TagRule::Dynamic(make) => make(entity, covered).map(Some),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Syntax {
    DokuWiki,
    Markdown,
    Html,
    Plain,
}

impl Syntax {
    pub const ALL: [Syntax; 4] = [
        Syntax::DokuWiki,
        Syntax::Markdown,
        Syntax::Html,
        Syntax::Plain,
    ];

    /// Resolves a syntax name case-insensitively. Unrecognised names select
    /// [`Syntax::Plain`].
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "docuwiki" | "dokuwiki" | "dw" => Syntax::DokuWiki,
            "markdown" | "md" => Syntax::Markdown,
            "html" => Syntax::Html,
            _ => Syntax::Plain,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Syntax::DokuWiki => "docuwiki",
            Syntax::Markdown => "markdown",
            Syntax::Html => "html",
            Syntax::Plain => "text",
        }
    }

    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Syntax::DokuWiki => &["docuwiki", "dokuwiki", "dw"],
            Syntax::Markdown => &["markdown", "md"],
            Syntax::Html => &["html"],
            Syntax::Plain => &["text"],
        }
    }

    pub fn dictionary(self) -> SyntaxDictionary {
        match self {
            Syntax::DokuWiki => dokuwiki::dictionary(),
            Syntax::Markdown => markdown::dictionary(),
            Syntax::Html => html::dictionary(),
            Syntax::Plain => plain::dictionary(),
        }
    }
}

impl FromStr for Syntax {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Syntax::parse(s))
    }
}

impl fmt::Display for Syntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The complete set of markup rules for one syntax.
#[derive(Debug, Clone)]
pub struct SyntaxDictionary {
    pub syntax: Syntax,
    rules: fn(&EntityKind) -> TagRule,
    /// Wraps the whole output and is closed and reopened at line breaks.
    pub paragraph: Tag,
    /// Closing text is emitted for a line break inside code.
    pub newline: Tag,
    /// Escaping applied to literal text between tags.
    pub text_escaping: Escaping,
}

impl SyntaxDictionary {
    pub fn rule(&self, kind: &EntityKind) -> TagRule {
        (self.rules)(kind)
    }
}

/// Writes `value` escaped into a fresh string, for interpolation into tags.
fn escaped(escaping: Escaping, value: &str) -> Result<String, fmt::Error> {
    let mut out = String::with_capacity(value.len());
    escaping.push(&mut out, value)?;
    Ok(out)
}

/// Link target for a mention of `@handle`.
fn handle_url(covered: &str) -> String {
    format!("https://t.me/{}", covered.trim_start_matches('@'))
}

fn user_url(entity: &Entity) -> String {
    format!("tg://user?id={}", entity.kind.user_id().unwrap_or_default())
}
