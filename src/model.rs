//! Type definitions for the Claude `conversations.json` export.
//!
//! The export is a single JSON array. Each element is a conversation:
//!
//! ```json
//! {
//!   "uuid": "abcd1234-5678-4e90-a1b2-c3d4e5f60718",
//!   "name": "Test Chat",
//!   "created_at": "2025-01-05T15:04:05.000000Z",
//!   "updated_at": "2025-01-05T15:10:00.000000Z",
//!   "chat_messages": [
//!     {
//!       "uuid": "…",
//!       "sender": "human",
//!       "created_at": "…",
//!       "text": "Hello",
//!       "content": [{ "type": "text", "text": "Hello", "citations": [] }],
//!       "attachments": []
//!     }
//!   ]
//! }
//! ```
//!
//! Nullable string and list fields are read as their empty value, since older
//! exports write `null` where newer ones omit the key.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use uuid::Uuid;

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Sender
// ---------------------------------------------------------------------------

/// Author of a chat message.
///
/// Anything other than `human` / `assistant` is kept verbatim so the renderer
/// can decide what to do with it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum Sender {
    Human,
    Assistant,
    Other(String),
}

impl From<String> for Sender {
    fn from(value: String) -> Self {
        match value.as_str() {
            "human" => Sender::Human,
            "assistant" => Sender::Assistant,
            _ => Sender::Other(value),
        }
    }
}

// ---------------------------------------------------------------------------
// Content items
// ---------------------------------------------------------------------------

/// One block of a message's structured content. Order within a message matters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentItem {
    Text {
        #[serde(default, deserialize_with = "null_as_default")]
        text: String,
        #[serde(default, deserialize_with = "null_as_default")]
        citations: Vec<Value>,
    },

    ToolUse {
        #[serde(default, deserialize_with = "null_as_default")]
        name: String,
        #[serde(default)]
        input: Value,
    },

    ToolResult {
        #[serde(default)]
        content: Value,
        #[serde(default, deserialize_with = "null_as_default")]
        is_error: bool,
    },

    /// `thinking`, `voice_note`, `token_budget` and whatever else newer exports add.
    #[serde(other)]
    Other,
}

impl ContentItem {
    /// The artifact carried by this item, if it is an `artifacts` tool call.
    pub fn as_artifact(&self) -> Option<Artifact> {
        match self {
            ContentItem::ToolUse { name, input } if name == ARTIFACTS_TOOL => {
                Some(Artifact::from_tool_input(input))
            }
            _ => None,
        }
    }
}

pub const ARTIFACTS_TOOL: &str = "artifacts";

// ---------------------------------------------------------------------------
// Artifacts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactCommand {
    Create,
    Update,
    Rewrite,
    #[serde(other)]
    Other,
}

/// A code or document artifact, decoded from the input of an `artifacts` tool call.
///
/// `update` commands usually carry `old_str` / `new_str` instead of `content`;
/// those end up with empty content and are not written out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Artifact {
    pub id: String,
    pub title: String,
    /// MIME type, e.g. `application/vnd.ant.code` or `text/markdown`.
    pub mime_type: String,
    pub language: String,
    pub command: Option<ArtifactCommand>,
    pub content: String,
}

impl Artifact {
    /// Decode a tool input payload field by field.
    ///
    /// A field with an unexpected type is dropped on its own, so the rest of the
    /// artifact survives. A payload that isn't an object yields an empty artifact.
    pub fn from_tool_input(input: &Value) -> Self {
        let fields = match input {
            Value::Object(fields) => fields,
            Value::Null => return Artifact::default(),
            other => {
                tracing::warn!("artifact payload is not an object: {other}");
                return Artifact::default();
            }
        };

        let command = match fields.get("command") {
            None | Some(Value::Null) => None,
            Some(value) => ArtifactCommand::deserialize(value)
                .map_err(|e| tracing::warn!(field = "command", "ignoring artifact field: {e}"))
                .ok(),
        };

        Artifact {
            id: string_field(fields, "id"),
            title: string_field(fields, "title"),
            mime_type: string_field(fields, "type"),
            language: string_field(fields, "language"),
            command,
            content: string_field(fields, "content"),
        }
    }

    /// Text used for the `[Artifact: …]` marker.
    pub fn label(&self) -> &str {
        if !self.title.is_empty() {
            &self.title
        } else if !self.id.is_empty() {
            &self.id
        } else {
            "untitled"
        }
    }
}

fn string_field(fields: &Map<String, Value>, key: &str) -> String {
    match fields.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => {
            tracing::warn!(field = key, "ignoring non-string artifact field: {other}");
            String::new()
        }
    }
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// File attached to a message. Only its metadata is present in the export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Attachment {
    #[serde(default, deserialize_with = "null_as_default")]
    pub file_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub file_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub file_size: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatMessage {
    #[serde(default)]
    pub uuid: Option<Uuid>,
    pub sender: Sender,
    pub created_at: DateTime<Utc>,
    /// Flattened plain text, used when `content` yields nothing.
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: Vec<ContentItem>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub attachments: Vec<Attachment>,
}

// ---------------------------------------------------------------------------
// Conversation
// ---------------------------------------------------------------------------

/// A conversation UUID as written in the export, plus its parsed form.
///
/// The raw text is what gets displayed. The parsed value gives the canonical
/// short id regardless of case or braces.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct ConversationId {
    raw: String,
    parsed: Uuid,
}

impl ConversationId {
    pub fn as_uuid(&self) -> &Uuid {
        &self.parsed
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl TryFrom<String> for ConversationId {
    type Error = uuid::Error;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        let parsed = Uuid::parse_str(raw.trim())?;
        Ok(Self { raw, parsed })
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Conversation {
    pub uuid: ConversationId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub chat_messages: Vec<ChatMessage>,
}

impl Conversation {
    /// First segment of the UUID (8 hex digits). Scopes filenames per conversation.
    pub fn short_id(&self) -> String {
        let full = self.uuid.as_uuid().hyphenated().to_string();
        full.split('-').next().unwrap_or(&full).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sender_keeps_unknown_values() {
        let s: Sender = serde_json::from_value(json!("human")).unwrap();
        assert_eq!(s, Sender::Human);
        let s: Sender = serde_json::from_value(json!("system")).unwrap();
        assert_eq!(s, Sender::Other("system".into()));
    }

    #[test]
    fn content_items_decode_by_tag() {
        let items: Vec<ContentItem> = serde_json::from_value(json!([
            { "type": "text", "text": "hi", "citations": [] },
            { "type": "tool_use", "name": "artifacts", "input": { "title": "a" } },
            { "type": "tool_result", "content": [{ "type": "text", "text": "ok" }], "is_error": false },
            { "type": "thinking", "thinking": "hmm" }
        ]))
        .unwrap();

        assert!(matches!(&items[0], ContentItem::Text { text, .. } if text == "hi"));
        assert!(matches!(&items[1], ContentItem::ToolUse { name, .. } if name == "artifacts"));
        assert!(matches!(&items[2], ContentItem::ToolResult { is_error: false, .. }));
        assert_eq!(items[3], ContentItem::Other);
    }

    #[test]
    fn null_text_reads_as_empty() {
        let item: ContentItem =
            serde_json::from_value(json!({ "type": "text", "text": null })).unwrap();
        assert!(matches!(item, ContentItem::Text { text, .. } if text.is_empty()));
    }

    #[test]
    fn artifact_from_tool_use() {
        let item: ContentItem = serde_json::from_value(json!({
            "type": "tool_use",
            "name": "artifacts",
            "input": {
                "id": "script",
                "title": "script.py",
                "type": "application/vnd.ant.code",
                "language": "python",
                "command": "create",
                "content": "print(1)"
            }
        }))
        .unwrap();

        let artifact = item.as_artifact().unwrap();
        assert_eq!(artifact.title, "script.py");
        assert_eq!(artifact.language, "python");
        assert_eq!(artifact.command, Some(ArtifactCommand::Create));
        assert_eq!(artifact.content, "print(1)");
    }

    #[test]
    fn other_tools_are_not_artifacts() {
        let item: ContentItem = serde_json::from_value(json!({
            "type": "tool_use", "name": "web_search", "input": { "query": "rust" }
        }))
        .unwrap();
        assert!(item.as_artifact().is_none());
    }

    #[test]
    fn mistyped_artifact_field_keeps_the_rest() {
        let artifact = Artifact::from_tool_input(&json!({
            "id": "main",
            "title": "main.py",
            "type": 3,
            "language": "python",
            "command": 7,
            "content": "print(1)"
        }));
        assert_eq!(artifact.title, "main.py");
        assert_eq!(artifact.content, "print(1)");
        assert_eq!(artifact.language, "python");
        assert!(artifact.mime_type.is_empty());
        assert_eq!(artifact.command, None);
        assert_eq!(artifact.label(), "main.py");
    }

    #[test]
    fn artifact_nulls_and_unknown_commands() {
        let artifact = Artifact::from_tool_input(&json!({
            "title": null,
            "command": "rename",
            "content": "x"
        }));
        assert!(artifact.title.is_empty());
        assert_eq!(artifact.command, Some(ArtifactCommand::Other));
        assert_eq!(artifact.content, "x");

        assert_eq!(Artifact::from_tool_input(&json!("text")), Artifact::default());
        assert_eq!(Artifact::from_tool_input(&Value::Null), Artifact::default());
    }

    #[test]
    fn conversation_id_keeps_raw_text() {
        let conv: Conversation = serde_json::from_value(json!({
            "uuid": "ABCD1234-5678-4E90-A1B2-C3D4E5F60718",
            "name": "Upper",
            "created_at": "2025-01-05T15:04:05Z",
            "updated_at": "2025-01-05T15:04:05Z",
            "chat_messages": []
        }))
        .unwrap();
        assert_eq!(conv.uuid.to_string(), "ABCD1234-5678-4E90-A1B2-C3D4E5F60718");
        assert_eq!(conv.short_id(), "abcd1234");

        let braced = ConversationId::try_from(
            "{abcd1234-5678-4e90-a1b2-c3d4e5f60718}".to_string(),
        )
        .unwrap();
        assert_eq!(braced.as_str(), "{abcd1234-5678-4e90-a1b2-c3d4e5f60718}");
        assert!(ConversationId::try_from("not-a-uuid".to_string()).is_err());
    }

    #[test]
    fn artifact_label_falls_back_to_id() {
        let artifact = Artifact {
            id: "snippet-1".into(),
            ..Artifact::default()
        };
        assert_eq!(artifact.label(), "snippet-1");
        assert_eq!(Artifact::default().label(), "untitled");
    }

    #[test]
    fn short_id_is_first_uuid_segment() {
        let conv: Conversation = serde_json::from_value(json!({
            "uuid": "abcd1234-5678-4e90-a1b2-c3d4e5f60718",
            "name": null,
            "created_at": "2025-01-05T15:04:05Z",
            "updated_at": "2025-01-05T15:04:05Z",
            "chat_messages": []
        }))
        .unwrap();
        assert_eq!(conv.short_id(), "abcd1234");
        assert!(conv.name.is_empty());
    }

    #[test]
    fn missing_chat_messages_is_an_error() {
        let result = serde_json::from_value::<Conversation>(json!({
            "uuid": "abcd1234-5678-4e90-a1b2-c3d4e5f60718",
            "name": "x",
            "created_at": "2025-01-05T15:04:05Z",
            "updated_at": "2025-01-05T15:04:05Z"
        }));
        assert!(result.is_err());
    }
}
