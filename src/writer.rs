use std::fs;
use std::io;
use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;

use crate::error::{ExportError, Result};
use crate::extensions::ExtensionTable;
use crate::loader::{decode_conversation, load_records};
use crate::model::Artifact;
use crate::naming::{fit_filename, sanitize_filename};
use crate::renderer::render_conversation;
use crate::utils::{ExportConfig, ProcessResult, RunSummary};

pub const ARTIFACTS_DIR: &str = "artifacts";

/// Outcome of one artifact write, reported while `write_artifacts` runs.
#[derive(Debug)]
pub enum ArtifactEvent<'a> {
    Saved { name: &'a str },
    Failed { path: &'a Path, error: &'a io::Error },
}

/// Load the export and write every conversation it contains.
///
/// Only a failure to read or parse the input file is returned as an error.
/// Problems with individual conversations or artifacts are logged and counted.
pub fn execute(config: &ExportConfig) -> Result<RunSummary> {
    let records = load_records(&config.input_path)?;

    fs::create_dir_all(&config.target_dir).map_err(|e| ExportError::io(&config.target_dir, e))?;

    let mut summary = RunSummary {
        total: records.len(),
        ..RunSummary::default()
    };

    let pb = if config.quiet {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(summary.total as u64);
        if let Ok(style) = ProgressStyle::with_template(
            "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({percent}%)",
        ) {
            bar.set_style(style.progress_chars("=>-"));
        }
        bar.suspend(|| println!("Found {} conversations.", summary.total));
        bar
    };

    for (index, record) in records.into_iter().enumerate() {
        let position = index + 1;
        match export_conversation(position, record, config, &pb, &mut summary) {
            Ok(result) => {
                summary.converted += 1;
                tracing::debug!(position, ?result, "conversation exported");
            }
            Err(e) => {
                pb.suspend(|| tracing::error!("Error [conversation {position}]: {e}"));
            }
        }
        pb.inc(1);
    }

    pb.finish_and_clear();

    let resolved =
        fs::canonicalize(&config.target_dir).unwrap_or_else(|_| config.target_dir.clone());

    if !config.quiet {
        let mut line = format!(
            "Done. {}/{} conversations converted.",
            summary.converted, summary.total
        );
        if summary.artifacts_written > 0 {
            line.push_str(&format!(" {} artifact(s) saved.", summary.artifacts_written));
        }
        if summary.artifact_errors > 0 {
            line.push_str(&format!(
                " {} artifact(s) could not be written.",
                summary.artifact_errors
            ));
        }
        line.push_str(&format!(" Output: {}", resolved.display()));
        println!("{line}");
    }

    Ok(summary)
}

fn export_conversation(
    position: usize,
    record: Value,
    config: &ExportConfig,
    pb: &ProgressBar,
    summary: &mut RunSummary,
) -> Result<ProcessResult> {
    let conversation = decode_conversation(position, record)?;
    let rendered = render_conversation(&conversation, &config.render)?;

    let md_path = config.target_dir.join(&rendered.filename);
    let result = if md_path.exists() {
        ProcessResult::Updated
    } else {
        ProcessResult::Created
    };

    fs::write(&md_path, &rendered.markdown).map_err(|e| ExportError::io(&md_path, e))?;

    if !config.quiet {
        let verb = match result {
            ProcessResult::Created => "Created:",
            ProcessResult::Updated => "Updated:",
        };
        pb.suspend(|| println!("{verb:<10}{}", rendered.filename));
    }

    if !rendered.artifacts.is_empty() {
        let short_id = conversation.short_id();
        let dir = config.target_dir.join(ARTIFACTS_DIR).join(&short_id);
        let (written, failed) = write_artifacts(
            &dir,
            &rendered.artifacts,
            &config.extensions,
            |event| match event {
                ArtifactEvent::Saved { name } => {
                    if !config.quiet {
                        pb.suspend(|| {
                            println!("{:<10}{ARTIFACTS_DIR}/{short_id}/{name}", "Saved:")
                        });
                    }
                }
                ArtifactEvent::Failed { path, error } => pb.suspend(|| {
                    tracing::error!("Failed to write artifact {}: {error}", path.display())
                }),
            },
        );
        summary.artifacts_written += written;
        summary.artifact_errors += failed;
    }

    Ok(result)
}

/// `<sanitized title><ext>`, or `artifact_<index><ext>` for untitled artifacts.
/// `index` is 1-based. An extension already present in the title is kept, so
/// `script.py` becomes `script.py.py`. Long multi-byte titles are shortened to
/// fit the filesystem's per-name byte limit.
pub fn artifact_filename(artifact: &Artifact, index: usize, extensions: &ExtensionTable) -> String {
    let stem = if artifact.title.is_empty() {
        format!("artifact_{index}")
    } else {
        sanitize_filename(&artifact.title)
    };
    fit_filename(&stem, extensions.extension_for(artifact))
}

/// Write each non-empty artifact into `dir`, reporting every save or failure to
/// `on_event`. Returns `(written, failed)`.
pub fn write_artifacts(
    dir: &Path,
    artifacts: &[Artifact],
    extensions: &ExtensionTable,
    mut on_event: impl FnMut(ArtifactEvent<'_>),
) -> (usize, usize) {
    if let Err(error) = fs::create_dir_all(dir) {
        let pending = artifacts.iter().filter(|a| !a.content.is_empty()).count();
        on_event(ArtifactEvent::Failed { path: dir, error: &error });
        return (0, pending);
    }

    let mut written = 0;
    let mut failed = 0;

    for (index, artifact) in artifacts.iter().enumerate() {
        if artifact.content.is_empty() {
            tracing::debug!(label = artifact.label(), "skipping artifact without content");
            continue;
        }

        let name = artifact_filename(artifact, index + 1, extensions);
        let path = dir.join(&name);
        match fs::write(&path, &artifact.content) {
            Ok(()) => {
                written += 1;
                on_event(ArtifactEvent::Saved { name: &name });
            }
            Err(error) => {
                failed += 1;
                on_event(ArtifactEvent::Failed { path: &path, error: &error });
            }
        }
    }

    (written, failed)
}
