use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::Conversation;

pub const MAX_NAME_LEN: usize = 100;
/// Per-component limit on ext4, APFS, NTFS and most other filesystems.
pub const MAX_FILENAME_BYTES: usize = 255;
const MARKDOWN_EXT: &str = ".md";

static ILLEGAL_CHARS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"[<>:"/\\|?*]"#).unwrap());
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Make `input` usable as a file name: characters illegal on common filesystems
/// become `-`, whitespace runs become `_`, and the result is cut to
/// [`MAX_NAME_LEN`] characters.
pub fn sanitize_filename(input: &str) -> String {
    let replaced = ILLEGAL_CHARS_RE.replace_all(input, "-");
    let collapsed = WHITESPACE_RE.replace_all(&replaced, "_");
    collapsed.chars().take(MAX_NAME_LEN).collect()
}

/// Longest prefix of `name` that is at most `max_bytes` long, cut on a char boundary.
pub fn truncate_to_bytes(name: &str, max_bytes: usize) -> &str {
    if name.len() <= max_bytes {
        return name;
    }
    let mut end = max_bytes;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    &name[..end]
}

/// Join `stem` and `suffix`, shortening the stem so the result fits in one
/// filename component.
pub fn fit_filename(stem: &str, suffix: &str) -> String {
    let budget = MAX_FILENAME_BYTES.saturating_sub(suffix.len());
    format!("{}{}", truncate_to_bytes(stem, budget), suffix)
}

/// `<sanitized name>_<short id>`, or `conversation_<YYYY-MM-DD>_<short id>` when
/// the conversation has no name.
pub fn conversation_base_name(conversation: &Conversation) -> String {
    let stem = if conversation.name.is_empty() {
        format!(
            "conversation_{}",
            conversation.created_at.format("%Y-%m-%d")
        )
    } else {
        sanitize_filename(&conversation.name)
    };
    let suffix = format!("_{}", conversation.short_id());
    // Leave room for the `.md` added by `markdown_filename`.
    let budget = MAX_FILENAME_BYTES - MARKDOWN_EXT.len() - suffix.len();
    format!("{}{}", truncate_to_bytes(&stem, budget), suffix)
}

pub fn markdown_filename(conversation: &Conversation) -> String {
    format!("{}{MARKDOWN_EXT}", conversation_base_name(conversation))
}
