use serde::{Deserialize, Serialize};

/// A formatting or semantic annotation over a span of message text.
///
/// `offset` and `length` are counted in UTF-16 code units, the way the
/// messaging protocol defines them. They are kept signed so that malformed
/// input survives deserialization and is rejected with a proper diagnostic
/// at conversion time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(flatten)]
    pub kind: EntityKind,
    pub offset: i64,
    pub length: i64,
}

impl Entity {
    pub fn new(kind: EntityKind, offset: i64, length: i64) -> Self {
        Self {
            kind,
            offset,
            length,
        }
    }

    pub fn end(&self) -> i64 {
        self.offset.saturating_add(self.length)
    }
}

/// Entity kinds, named after the Bot API `type` values.
///
/// The MTProto constructor names are accepted as aliases, and any type this
/// crate does not know about deserializes to [`EntityKind::Unknown`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EntityKind {
    #[serde(alias = "messageEntityBold")]
    Bold,
    #[serde(alias = "messageEntityItalic")]
    Italic,
    #[serde(alias = "messageEntityUnderline")]
    Underline,
    #[serde(alias = "messageEntityStrike")]
    Strikethrough,
    #[serde(alias = "messageEntitySpoiler")]
    Spoiler,
    #[serde(alias = "messageEntityCode")]
    Code,
    #[serde(alias = "messageEntityPre")]
    Pre {
        #[serde(default)]
        language: String,
    },
    #[serde(alias = "messageEntityBlockquote")]
    #[serde(alias = "expandable_blockquote")]
    Blockquote,
    #[serde(alias = "messageEntityUrl")]
    Url,
    #[serde(alias = "messageEntityTextUrl")]
    TextLink { url: String },
    #[serde(alias = "messageEntityEmail")]
    Email,
    #[serde(alias = "messageEntityPhone")]
    PhoneNumber,
    #[serde(alias = "messageEntityMention")]
    Mention,
    #[serde(alias = "messageEntityMentionName")]
    TextMention {
        #[serde(alias = "userId")]
        user_id: i64,
    },
    #[serde(alias = "messageEntityBotCommand")]
    BotCommand,
    #[serde(alias = "messageEntityHashtag")]
    Hashtag,
    #[serde(alias = "messageEntityCashtag")]
    Cashtag,
    #[serde(alias = "messageEntityBankCard")]
    BankCard,
    #[serde(alias = "messageEntityCustomEmoji")]
    CustomEmoji {
        #[serde(default, alias = "document_id")]
        custom_emoji_id: String,
    },
    #[serde(other)]
    Unknown,
}

impl EntityKind {
    /// Short, stable name used in diagnostics and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bold => "bold",
            Self::Italic => "italic",
            Self::Underline => "underline",
            Self::Strikethrough => "strikethrough",
            Self::Spoiler => "spoiler",
            Self::Code => "code",
            Self::Pre { .. } => "pre",
            Self::Blockquote => "blockquote",
            Self::Url => "url",
            Self::TextLink { .. } => "text_link",
            Self::Email => "email",
            Self::PhoneNumber => "phone_number",
            Self::Mention => "mention",
            Self::TextMention { .. } => "text_mention",
            Self::BotCommand => "bot_command",
            Self::Hashtag => "hashtag",
            Self::Cashtag => "cashtag",
            Self::BankCard => "bank_card",
            Self::CustomEmoji { .. } => "custom_emoji",
            Self::Unknown => "unknown",
        }
    }

    /// Line breaks inside these stay literal instead of splitting paragraphs.
    pub fn is_code_like(&self) -> bool {
        matches!(self, Self::Code | Self::Pre { .. })
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            Self::TextLink { url } => Some(url),
            _ => None,
        }
    }

    pub fn language(&self) -> Option<&str> {
        match self {
            Self::Pre { language } => Some(language),
            _ => None,
        }
    }

    pub fn user_id(&self) -> Option<i64> {
        match self {
            Self::TextMention { user_id } => Some(*user_id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_bot_api_entities() {
        let json = r#"[
            {"type": "bold", "offset": 0, "length": 4},
            {"type": "text_link", "offset": 5, "length": 4, "url": "https://example.com"},
            {"type": "pre", "offset": 10, "length": 3, "language": "rust"},
            {"type": "text_mention", "offset": 14, "length": 5, "user_id": 42}
        ]"#;

        let entities: Vec<Entity> = serde_json::from_str(json).unwrap();
        assert_eq!(entities.len(), 4);
        assert_eq!(entities[0], Entity::new(EntityKind::Bold, 0, 4));
        assert_eq!(entities[1].kind.url(), Some("https://example.com"));
        assert_eq!(entities[2].kind.language(), Some("rust"));
        assert_eq!(entities[3].kind.user_id(), Some(42));
        assert_eq!(entities[3].end(), 19);
    }

    #[test]
    fn test_deserialize_mtproto_aliases() {
        let json = r#"[
            {"type": "messageEntityStrike", "offset": 0, "length": 1},
            {"type": "messageEntityTextUrl", "offset": 0, "length": 1, "url": "x"},
            {"type": "messageEntityMentionName", "offset": 0, "length": 1, "userId": 7}
        ]"#;

        let entities: Vec<Entity> = serde_json::from_str(json).unwrap();
        assert!(matches!(entities[0].kind, EntityKind::Strikethrough));
        assert!(matches!(entities[1].kind, EntityKind::TextLink { .. }));
        assert!(matches!(entities[2].kind, EntityKind::TextMention { user_id: 7 }));
    }

    #[test]
    fn test_unrecognised_type_is_unknown() {
        let json = r#"{"type": "date_time", "offset": 3, "length": 2, "unix_time": 0}"#;
        let entity: Entity = serde_json::from_str(json).unwrap();
        assert_eq!(entity, Entity::new(EntityKind::Unknown, 3, 2));
    }

    #[test]
    fn test_pre_without_language() {
        let json = r#"{"type": "pre", "offset": 0, "length": 2}"#;
        let entity: Entity = serde_json::from_str(json).unwrap();
        assert_eq!(entity.kind.language(), Some(""));
        assert!(entity.kind.is_code_like());
    }

    #[test]
    fn test_serialize_keeps_type_tag() {
        let entity = Entity::new(
            EntityKind::TextLink {
                url: "https://example.com".into(),
            },
            1,
            2,
        );
        let value = serde_json::to_value(&entity).unwrap();
        assert_eq!(value["type"], "text_link");
        assert_eq!(value["url"], "https://example.com");
        assert_eq!(value["offset"], 1);
    }
}
