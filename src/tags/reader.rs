//! Read WAV tags with lofty
//!
//! An `id3 ` chunk yields [`SourceTags::Rich`]; otherwise a `LIST/INFO` chunk
//! yields [`SourceTags::Flat`]. Files with neither have no tags.

use super::model::{FlatTags, RichFrame, RichTags, SourceTags};
use crate::error::{ConvertError, Result};
use lofty::config::ParseOptions;
use lofty::file::AudioFile;
use lofty::id3::v2::{Frame, Id3v2Tag};
use lofty::iff::wav::{RiffInfoList, WavFile};
use lofty::tag::TagExt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

/// ID3v2.4 separates multiple text values with NUL
const VALUE_SEPARATOR: char = '\0';

/// Read the tags embedded in a WAV file.
///
/// `Ok(None)` when the file has no tag chunk at all.
pub fn read_source_tags(path: &Path) -> Result<Option<SourceTags>> {
    let file = File::open(path).map_err(|e| tag_parse_error(path, e))?;
    let mut reader = BufReader::new(file);

    let wav = WavFile::read_from(&mut reader, ParseOptions::new().read_properties(false))
        .map_err(|e| tag_parse_error(path, e))?;

    if let Some(id3) = wav.id3v2() {
        debug!("{}: ID3v2 chunk with {} frames", path.display(), id3.len());
        return Ok(Some(SourceTags::Rich(rich_tags(id3))));
    }

    if let Some(info) = wav.riff_info() {
        debug!("{}: RIFF INFO chunk", path.display());
        return Ok(Some(SourceTags::Flat(flat_tags(info))));
    }

    debug!("No tags found in {}", path.display());
    Ok(None)
}

fn rich_tags(tag: &Id3v2Tag) -> RichTags {
    RichTags::new(tag.into_iter().map(rich_frame).collect())
}

fn rich_frame(frame: &Frame<'_>) -> RichFrame {
    match frame {
        Frame::Text(text) => RichFrame::Text {
            id: frame.id_str().to_string(),
            values: split_values(&text.value),
        },
        Frame::Timestamp(timestamp) => RichFrame::Text {
            id: frame.id_str().to_string(),
            values: vec![timestamp.timestamp.to_string()],
        },
        Frame::Comment(comment) => RichFrame::Comment {
            language: language_code(comment.language),
            description: comment.description.to_string(),
            values: split_values(&comment.content),
        },
        Frame::UnsynchronizedText(lyrics) => RichFrame::Lyrics {
            language: language_code(lyrics.language),
            description: lyrics.description.to_string(),
            text: lyrics.content.to_string(),
        },
        Frame::Picture(picture) => RichFrame::Picture {
            mime_type: picture.picture.mime_type().map(|m| m.as_str().to_string()),
            picture_type: picture.picture.pic_type().as_u8(),
            description: picture.picture.description().map(str::to_string),
            data: picture.picture.data().to_vec(),
        },
        Frame::UserText(user) => RichFrame::UserText {
            description: user.description.to_string(),
            values: split_values(&user.content),
        },
        _ => RichFrame::Other {
            id: frame.id_str().to_string(),
        },
    }
}

fn flat_tags(info: &RiffInfoList) -> FlatTags {
    info.into_iter()
        .map(|(key, value)| (key.as_str(), value.as_str()))
        .collect()
}

fn split_values(value: &str) -> Vec<String> {
    value
        .split(VALUE_SEPARATOR)
        .map(str::to_string)
        .collect()
}

/// `None` for an all-zero or non-text language field
fn language_code(language: [u8; 3]) -> Option<String> {
    if language.iter().all(|b| b.is_ascii_alphabetic()) {
        Some(String::from_utf8_lossy(&language).into_owned())
    } else {
        None
    }
}

fn tag_parse_error(path: &Path, err: impl std::fmt::Display) -> ConvertError {
    ConvertError::TagParse {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
}
