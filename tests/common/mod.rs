//! Shared fixtures for CLI integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Value, json};
use tempfile::TempDir;

pub const UUID: &str = "abcd1234-5678-4e90-a1b2-c3d4e5f60718";
pub const OTHER_UUID: &str = "0f0e0d0c-1111-4222-8333-444455556666";
pub const THIRD_UUID: &str = "99887766-aaaa-4bbb-8ccc-dddddddddddd";

/// A message with a single text content item.
pub fn message(sender: &str, text: &str) -> Value {
    json!({
        "uuid": "11111111-2222-4333-8444-555555555555",
        "sender": sender,
        "created_at": "2025-01-05T15:04:00.000000Z",
        "text": text,
        "content": [{ "type": "text", "text": text, "citations": [] }],
        "attachments": []
    })
}

/// An assistant message that creates one artifact.
pub fn artifact_message(title: &str, language: &str, content: &str) -> Value {
    json!({
        "uuid": "66666666-7777-4888-8999-000000000000",
        "sender": "assistant",
        "created_at": "2025-01-05T15:05:00.000000Z",
        "text": "",
        "content": [
            { "type": "text", "text": "Here it is." },
            { "type": "tool_use", "name": "artifacts", "input": {
                "id": "artifact-1",
                "title": title,
                "type": "application/vnd.ant.code",
                "language": language,
                "command": "create",
                "content": content
            }}
        ],
        "attachments": []
    })
}

pub fn conversation(uuid: &str, name: &str, messages: Vec<Value>) -> Value {
    json!({
        "uuid": uuid,
        "name": name,
        "created_at": "2025-01-05T15:04:00.000000Z",
        "updated_at": "2025-01-05T15:10:00.000000Z",
        "chat_messages": messages
    })
}

/// Temp workspace holding an input export and an output directory.
pub struct Workspace {
    temp_dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write `conversations` as the export file and return its path.
    pub fn with_export(&self, conversations: &[Value]) -> PathBuf {
        self.with_raw_export(&serde_json::to_string_pretty(conversations).unwrap())
    }

    pub fn with_raw_export(&self, content: &str) -> PathBuf {
        let path = self.temp_dir.path().join("conversations.json");
        fs::write(&path, content).expect("Failed to write export");
        path
    }

    pub fn out_dir(&self) -> PathBuf {
        self.temp_dir.path().join("out")
    }

    pub fn read_out(&self, relative: &str) -> String {
        fs::read_to_string(self.out_dir().join(relative))
            .unwrap_or_else(|e| panic!("Failed to read {relative}: {e}"))
    }

    /// Names of markdown files in the output directory, sorted.
    pub fn markdown_files(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.out_dir())
            .expect("Output dir missing")
            .flatten()
            .map(|e| e.file_name().to_string_lossy().to_string())
            .filter(|n| n.ends_with(".md"))
            .collect();
        names.sort();
        names
    }
}
