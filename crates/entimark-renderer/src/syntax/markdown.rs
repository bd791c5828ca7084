use super::{Syntax, SyntaxDictionary, Tag, TagRule, handle_url, user_url};
use crate::entity::{Entity, EntityKind};
use crate::escape::Escaping;
use std::fmt;

pub(super) fn dictionary() -> SyntaxDictionary {
    SyntaxDictionary {
        syntax: Syntax::Markdown,
        rules: rule,
        paragraph: Tag::new("", "\n"),
        newline: Tag::new("", "\n"),
        text_escaping: Escaping::Html,
    }
}

fn rule(kind: &EntityKind) -> TagRule {
    match kind {
        EntityKind::Bold => TagRule::Static(Tag::new("**", "**")),
        EntityKind::Italic => TagRule::Static(Tag::new("*", "*")),
        EntityKind::Underline => TagRule::Static(Tag::new("__", "__")),
        EntityKind::Strikethrough => TagRule::Static(Tag::new("~~", "~~")),
        EntityKind::Spoiler => TagRule::Static(Tag::new("||", "||")),
        EntityKind::Code => TagRule::Static(Tag::new("`", "`")),
        EntityKind::Pre { .. } => TagRule::Dynamic(fence),
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

fn link(destination: &str) -> Result<Tag, fmt::Error> {
    Ok(Tag::owned("[", format!("]({destination})")))
}

fn fence(entity: &Entity, _covered: &str) -> Result<Tag, fmt::Error> {
    let language = entity.kind.language().unwrap_or_default();
    Ok(Tag::owned(format!("```{language}\n"), "\n```"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_link_points_at_url() {
        let entity = Entity::new(
            EntityKind::TextLink {
                url: "https://example.com".into(),
            },
            0,
            4,
        );
        let tag = rule(&entity.kind).resolve(&entity, "here").unwrap().unwrap();
        assert_eq!(tag, Tag::new("[", "](https://example.com)"));
    }

    #[test]
    fn test_fence_carries_language() {
        let entity = Entity::new(
            EntityKind::Pre {
                language: "rust".into(),
            },
            0,
            4,
        );
        let tag = rule(&entity.kind).resolve(&entity, "main").unwrap().unwrap();
        assert_eq!(tag, Tag::new("```rust\n", "\n```"));
    }

    #[test]
    fn test_hashtag_is_dropped() {
        let entity = Entity::new(EntityKind::Hashtag, 0, 5);
        assert!(rule(&entity.kind).resolve(&entity, "#rust").unwrap().is_none());
    }
}
