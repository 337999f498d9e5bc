use std::borrow::Cow;
use std::fmt::Write;

use serde::Serialize;

use crate::error::Result;
use crate::model::{Artifact, Attachment, ChatMessage, ContentItem, Conversation, Sender};
use crate::naming::markdown_filename;
use crate::utils::{RenderOptions, UnknownSenderPolicy, format_kib, format_timestamp};

pub const DEFAULT_TITLE: &str = "Untitled Conversation";

/// Output of converting one conversation.
#[derive(Debug, Clone)]
pub struct RenderedConversation {
    /// `<base>.md`, relative to the output directory.
    pub filename: String,
    pub markdown: String,
    /// Every artifact found, in message order.
    pub artifacts: Vec<Artifact>,
}

#[derive(Serialize)]
struct Frontmatter<'a> {
    title: &'a str,
    source: String,
    author: Vec<&'a str>,
    published: String,
    created: String,
    description: &'a str,
    tags: &'a [String],
}

fn display_title(conversation: &Conversation) -> &str {
    if conversation.name.is_empty() {
        DEFAULT_TITLE
    } else {
        &conversation.name
    }
}

pub fn render_conversation(
    conversation: &Conversation,
    options: &RenderOptions,
) -> Result<RenderedConversation> {
    let mut out = String::new();
    write_frontmatter(&mut out, conversation, options)?;
    write_header(&mut out, conversation, options)?;

    let mut artifacts = Vec::new();
    let mut rendered = 0usize;

    for message in &conversation.chat_messages {
        let (text, found) = extract_text(message);
        artifacts.extend(found);

        let Some(label) = sender_label(&message.sender, options.unknown_senders) else {
            tracing::debug!(sender = ?message.sender, "dropping message from unknown sender");
            continue;
        };

        let attachments = attachment_summary(&message.attachments);
        let body = match (text.trim().is_empty(), attachments.is_empty()) {
            (true, true) => continue,
            (false, true) => text,
            (true, false) => attachments,
            (false, false) => format!("{text}\n\n{attachments}"),
        };

        if rendered > 0 {
            writeln!(out, "---")?;
            writeln!(out)?;
        }
        write_message(&mut out, message, &label, &body, options)?;
        rendered += 1;
    }

    let trimmed_len = out.trim_end().len();
    out.truncate(trimmed_len);
    out.push('\n');

    Ok(RenderedConversation {
        filename: markdown_filename(conversation),
        markdown: out,
        artifacts,
    })
}

fn write_frontmatter(
    out: &mut String,
    conversation: &Conversation,
    options: &RenderOptions,
) -> Result<()> {
    let source = options
        .source_url_base
        .join(conversation.uuid.as_str())
        .map(String::from)
        .unwrap_or_else(|_| format!("{}{}", options.source_url_base, conversation.uuid));

    let fm = Frontmatter {
        title: display_title(conversation),
        source,
        author: vec![options.author.as_str()],
        published: conversation.created_at.format("%Y-%m-%d").to_string(),
        created: options.created.format("%Y-%m-%d").to_string(),
        description: "",
        tags: &options.tags,
    };

    writeln!(out, "---")?;
    // serde_yaml 0.9 emits the mapping without a leading document marker.
    out.push_str(&serde_yaml::to_string(&fm)?);
    writeln!(out, "---")?;
    writeln!(out)?;
    Ok(())
}

fn write_header(
    out: &mut String,
    conversation: &Conversation,
    options: &RenderOptions,
) -> Result<()> {
    writeln!(out, "# {}", display_title(conversation))?;
    writeln!(out)?;
    writeln!(
        out,
        "- **Created:** {}",
        format_timestamp(&conversation.created_at, options.time_zone)
    )?;
    writeln!(
        out,
        "- **Updated:** {}",
        format_timestamp(&conversation.updated_at, options.time_zone)
    )?;
    writeln!(out, "- **Conversation ID:** {}", conversation.uuid)?;
    writeln!(out)?;
    Ok(())
}

fn write_message(
    out: &mut String,
    message: &ChatMessage,
    label: &str,
    body: &str,
    options: &RenderOptions,
) -> Result<()> {
    writeln!(
        out,
        "**{}** ({})",
        label,
        format_timestamp(&message.created_at, options.time_zone)
    )?;
    writeln!(out)?;

    if message.sender == Sender::Human {
        for line in body.lines() {
            if line.is_empty() {
                writeln!(out, ">")?;
            } else {
                writeln!(out, "> {line}")?;
            }
        }
    } else {
        writeln!(out, "{body}")?;
    }
    writeln!(out)?;
    Ok(())
}

fn sender_label(sender: &Sender, policy: UnknownSenderPolicy) -> Option<Cow<'_, str>> {
    match sender {
        Sender::Human => Some(Cow::Borrowed("Human")),
        Sender::Assistant => Some(Cow::Borrowed("Claude")),
        Sender::Other(raw) => match policy {
            UnknownSenderPolicy::Drop => None,
            UnknownSenderPolicy::Generic if raw.is_empty() => Some(Cow::Borrowed("Unknown")),
            UnknownSenderPolicy::Generic => Some(Cow::Borrowed(raw.as_str())),
        },
    }
}

/// Text of a message plus the artifacts it created.
///
/// Text items are joined with newlines and each `artifacts` tool call adds an
/// `[Artifact: …]` marker line in place. When the content list yields nothing
/// the plain `text` field is used instead.
pub fn extract_text(message: &ChatMessage) -> (String, Vec<Artifact>) {
    let mut parts: Vec<String> = Vec::new();
    let mut artifacts = Vec::new();

    for item in &message.content {
        match item {
            ContentItem::Text { text, .. } if !text.is_empty() => parts.push(text.clone()),
            ContentItem::ToolUse { .. } => {
                if let Some(artifact) = item.as_artifact() {
                    parts.push(format!("[Artifact: {}]", artifact.label()));
                    artifacts.push(artifact);
                }
            }
            _ => {}
        }
    }

    let text = if parts.is_empty() {
        message.text.clone()
    } else {
        parts.join("\n")
    };
    (text, artifacts)
}

/// One `📎 name (type, NKB)` line per attachment.
pub fn attachment_summary(attachments: &[Attachment]) -> String {
    attachments
        .iter()
        .map(|a| {
            format!(
                "📎 {} ({}, {}KB)",
                a.file_name,
                a.file_type,
                format_kib(a.file_size)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
