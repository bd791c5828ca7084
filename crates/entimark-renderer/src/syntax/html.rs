use super::{Syntax, SyntaxDictionary, Tag, TagRule, escaped, handle_url, user_url};
use crate::entity::{Entity, EntityKind};
use crate::escape::Escaping;
use std::fmt;

pub(super) fn dictionary() -> SyntaxDictionary {
    SyntaxDictionary {
        syntax: Syntax::Html,
        rules: rule,
        paragraph: Tag::new("<p>", "</p>"),
        newline: Tag::new("", "<br />"),
        text_escaping: Escaping::Html,
    }
}

fn rule(kind: &EntityKind) -> TagRule {
    match kind {
        EntityKind::Bold => TagRule::Static(Tag::new("<b>", "</b>")),
        EntityKind::Italic => TagRule::Static(Tag::new("<i>", "</i>")),
        EntityKind::Underline => TagRule::Static(Tag::new("<u>", "</u>")),
        EntityKind::Strikethrough => TagRule::Static(Tag::new("<s>", "</s>")),
        EntityKind::Spoiler => {
            TagRule::Static(Tag::new("<span class=\"tg-spoiler\">", "</span>"))
        }
        EntityKind::Code => TagRule::Static(Tag::new("<code>", "</code>")),
        EntityKind::Pre { .. } => TagRule::Dynamic(pre),
        EntityKind::Blockquote => TagRule::Static(Tag::new("<blockquote>", "</blockquote>")),
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
        EntityKind::Hashtag => TagRule::Static(Tag::new("<a href=\"#\">", "</a>")),
        EntityKind::BotCommand
        | EntityKind::Cashtag
        | EntityKind::BankCard
        | EntityKind::CustomEmoji { .. }
        | EntityKind::Unknown => TagRule::None,
    }
}

fn link(href: &str) -> Result<Tag, fmt::Error> {
    let href = escaped(Escaping::Html, href)?;
    Ok(Tag::owned(format!("<a href=\"{href}\">"), "</a>"))
}

fn pre(entity: &Entity, _covered: &str) -> Result<Tag, fmt::Error> {
    match entity.kind.language() {
        Some(language) if !language.is_empty() => {
            let language = escaped(Escaping::Html, language)?;
            Ok(Tag::owned(format!("<pre language=\"{language}\">"), "</pre>"))
        }
        _ => Ok(Tag::new("<pre>", "</pre>")),
    }
}
