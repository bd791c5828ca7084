use super::{Syntax, SyntaxDictionary, Tag, TagRule};
use crate::entity::EntityKind;
use crate::escape::Escaping;

/// Fallback for unrecognised syntaxes: formatting is dropped, and the targets
/// of links and mentions are appended in parentheses.
pub(super) fn dictionary() -> SyntaxDictionary {
    SyntaxDictionary {
        syntax: Syntax::Plain,
        rules: rule,
        paragraph: Tag::new("", "\n"),
        newline: Tag::new("", "\n"),
        text_escaping: Escaping::Verbatim,
    }
}

fn rule(kind: &EntityKind) -> TagRule {
    match kind {
        EntityKind::Blockquote => TagRule::Static(Tag::new("«", "»")),
        EntityKind::TextMention { .. } => TagRule::Dynamic(|entity, _| {
            let id = entity.kind.user_id().unwrap_or_default();
            Ok(Tag::owned("", format!(" ({id})")))
        }),
        EntityKind::TextLink { .. } => TagRule::Dynamic(|entity, covered| {
            let url = entity.kind.url().unwrap_or(covered);
            Ok(Tag::owned("", format!(" ({url})")))
        }),
        EntityKind::Bold
        | EntityKind::Italic
        | EntityKind::Underline
        | EntityKind::Strikethrough
        | EntityKind::Spoiler
        | EntityKind::Code
        | EntityKind::Pre { .. }
        | EntityKind::Url
        | EntityKind::Email
        | EntityKind::PhoneNumber
        | EntityKind::Mention
        | EntityKind::BotCommand
        | EntityKind::Hashtag
        | EntityKind::Cashtag
        | EntityKind::BankCard
        | EntityKind::CustomEmoji { .. }
        | EntityKind::Unknown => TagRule::None,
    }
}
