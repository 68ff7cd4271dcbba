//! Read-only rendering of WAV tags for `--preview`

use super::model::{RichFrame, SourceTags};
use super::reader::read_source_tags;
use std::fmt::Write;
use std::path::PathBuf;

/// Render the tags of the first `limit` files as plain-text tables
pub fn render_preview(files: &[PathBuf], limit: usize) -> String {
    let mut out = String::new();
    let mut shown = 0;

    for path in files.iter().take(limit) {
        let _ = writeln!(out, "── {} ──", path.display());
        match read_source_tags(path) {
            Ok(Some(tags)) if !tags.is_empty() => {
                let rows = rows(&tags);
                let width = rows.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
                for (key, value) in rows {
                    let _ = writeln!(out, "  {:<width$}  {}", key, value, width = width);
                }
            }
            Ok(_) => out.push_str("  (no tags)\n"),
            Err(e) => {
                let _ = writeln!(out, "  error: {}", e);
            }
        }
        out.push('\n');
        shown += 1;
    }

    if shown == 0 {
        out.push_str("No files to preview.\n");
    }
    out
}

fn rows(tags: &SourceTags) -> Vec<(String, String)> {
    match tags {
        SourceTags::Rich(rich) => rich
            .frames
            .iter()
            .map(|frame| (frame.id().to_string(), describe(frame)))
            .collect(),
        SourceTags::Flat(flat) => flat
            .entries
            .iter()
            .map(|(key, values)| (key.clone(), values.join(", ")))
            .collect(),
    }
}

fn describe(frame: &RichFrame) -> String {
    match frame {
        RichFrame::Text { values, .. } => values.join(", "),
        RichFrame::Comment {
            language,
            description,
            values,
        } => format!(
            "[{}:{}] {}",
            language.as_deref().unwrap_or("???"),
            description,
            values.join(", ")
        ),
        RichFrame::Lyrics { text, .. } => format!("{} chars of lyrics", text.chars().count()),
        RichFrame::Picture {
            mime_type, data, ..
        } => format!(
            "<{}, {} bytes>",
            mime_type.as_deref().unwrap_or("unknown"),
            data.len()
        ),
        RichFrame::UserText {
            description,
            values,
        } => format!("{}={}", description, values.join(", ")),
        RichFrame::Other { .. } => "<unsupported frame>".to_string(),
    }
}
