//! # claude-chat-export
//!
//! A CLI tool that turns a [Claude](https://claude.ai) data export
//! (`conversations.json`) into one Markdown file per conversation.
//!
//! ## What it does
//!
//! The export is a single JSON array of conversations. Each one is written as a
//! standalone Markdown document with YAML frontmatter (title, source link,
//! dates, tags) followed by the messages in order: human turns as block quotes,
//! Claude's replies verbatim.
//!
//! Code and documents Claude produced as *artifacts* are pulled out of the
//! message stream into their own files under `artifacts/<short id>/`, with an
//! extension picked from the artifact's language or MIME type. The message keeps
//! an `[Artifact: <title>]` marker where the artifact appeared.
//!
//! A malformed conversation is reported and skipped; the rest of the export is
//! still written.
//!
//! ## Usage
//!
//! ```sh
//! # Convert into ./claude-export
//! claude-chat-export conversations.json
//!
//! # Into a notes vault, with custom tags
//! claude-chat-export conversations.json ~/notes/claude --tags claude,ai-chat
//! ```
//!
//! Preferences can be persisted in `~/.config/claude-chat-export/config.toml`.
pub mod config;
pub mod error;
pub mod extensions;
pub mod loader;
pub mod model;
pub mod naming;
pub mod renderer;
pub mod utils;
pub mod writer;

pub use error::{ExportError, Result};
pub use model::{
    Artifact, Attachment, ChatMessage, ContentItem, Conversation, ConversationId, Sender,
};
pub use renderer::{RenderedConversation, render_conversation};
pub use utils::{ExportConfig, RenderOptions, RunSummary};
