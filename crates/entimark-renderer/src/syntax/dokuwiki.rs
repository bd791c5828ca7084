use super::{Syntax, SyntaxDictionary, Tag, TagRule, escaped, handle_url, user_url};
use crate::entity::{Entity, EntityKind};
use crate::escape::Escaping;
use std::fmt;

pub(super) fn dictionary() -> SyntaxDictionary {
    SyntaxDictionary {
        syntax: Syntax::DokuWiki,
        rules: rule,
        paragraph: Tag::new("", "\n"),
        newline: Tag::new("", "\n"),
        text_escaping: Escaping::Html,
    }
}

fn rule(kind: &EntityKind) -> TagRule {
    match kind {
        EntityKind::Bold => TagRule::Static(Tag::new("**", "**")),
        EntityKind::Italic => TagRule::Static(Tag::new("//", "//")),
        EntityKind::Underline => TagRule::Static(Tag::new("__", "__")),
        EntityKind::Strikethrough => TagRule::Static(Tag::new("<del>", "</del>")),
        EntityKind::Spoiler => TagRule::Static(Tag::new("??", "??")),
        // two leading spaces make a preformatted line
        EntityKind::Code => TagRule::Static(Tag::new("\n  ", "")),
        EntityKind::Pre { .. } => TagRule::Dynamic(pre),
        EntityKind::Blockquote => TagRule::Static(Tag::new("> ", "")),
        EntityKind::Url => TagRule::Dynamic(|_, covered| link(covered)),
        EntityKind::TextLink { .. } => {
            TagRule::Dynamic(|entity, covered| link(entity.kind.url().unwrap_or(covered)))
        }
        EntityKind::Email => {
            TagRule::Dynamic(|_, covered| link(&format!("mailto:{covered}")))
        }
        EntityKind::PhoneNumber => {
            TagRule::Dynamic(|_, covered| link(&format!("tel:{covered}")))
        }
        EntityKind::Mention => TagRule::Dynamic(|_, covered| link(&handle_url(covered))),
        EntityKind::TextMention { .. } => {
            TagRule::Dynamic(|entity, _| link(&user_url(entity)))
        }
        EntityKind::BotCommand
        | EntityKind::Hashtag
        | EntityKind::Cashtag
        | EntityKind::BankCard
        | EntityKind::CustomEmoji { .. }
        | EntityKind::Unknown => TagRule::None,
    }
}

fn link(target: &str) -> Result<Tag, fmt::Error> {
    Ok(Tag::owned(format!("[[{target}|"), "]]"))
}

fn pre(entity: &Entity, _covered: &str) -> Result<Tag, fmt::Error> {
    let language = escaped(Escaping::Html, entity.kind.language().unwrap_or_default())?;
    Ok(Tag::owned(format!("<pre language=\"{language}\">"), "</pre>"))
}
