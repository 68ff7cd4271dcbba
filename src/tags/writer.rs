//! Write a [`TargetTagSet`] to an MP3 as a fresh ID3v2.4 tag

use super::model::{TargetFrame, TargetTagSet, DEFAULT_LANGUAGE};
use crate::error::{ConvertError, Result};
use lofty::config::WriteOptions;
use lofty::id3::v2::{
    AttachedPictureFrame, CommentFrame, ExtendedTextFrame, Frame, FrameId, Id3v2Tag,
    TextInformationFrame, TimestampFrame, UnsynchronizedTextFrame,
};
use lofty::picture::{MimeType, Picture, PictureType};
use lofty::tag::items::Timestamp;
use lofty::tag::TagExt;
use lofty::TextEncoding;
use std::path::Path;
use tracing::{debug, warn};

/// Frames that ID3v2.4 stores as timestamps rather than free text
const TIMESTAMP_FRAMES: [&str; 5] = ["TDRC", "TDOR", "TDRL", "TDEN", "TDTG"];

/// Every frame is written as UTF-8
const ENCODING: TextEncoding = TextEncoding::UTF8;

/// Build an ID3v2 tag from scratch. Returns the tag and the number of frames in it.
///
/// Frames that cannot be represented are logged and left out.
pub fn build_id3v2(tags: &TargetTagSet) -> (Id3v2Tag, usize) {
    let mut id3 = Id3v2Tag::new();

    for frame in tags {
        match to_id3_frame(frame) {
            Ok(id3_frame) => {
                if let Some(replaced) = id3.insert(id3_frame) {
                    debug!("Duplicate {} frame replaced an earlier one", replaced.id_str());
                }
            }
            Err(e) => warn!("{}", e),
        }
    }

    let written = id3.len();
    (id3, written)
}

/// Write `tags` into the MP3 at `path`, returning how many frames were written.
///
/// An empty set writes nothing.
pub fn write_tags(path: &Path, tags: &TargetTagSet) -> Result<usize> {
    if tags.is_empty() {
        return Ok(0);
    }

    let (id3, written) = build_id3v2(tags);
    if written == 0 {
        return Ok(0);
    }

    id3.save_to_path(path, WriteOptions::default())
        .map_err(|e| ConvertError::output_error(path, std::io::Error::other(e.to_string())))?;

    debug!("Wrote {} ID3 frames to {}", written, path.display());
    Ok(written)
}

fn to_id3_frame(frame: &TargetFrame) -> Result<Frame<'static>> {
    let id3_frame = match frame {
        TargetFrame::Text { id, values } if TIMESTAMP_FRAMES.contains(&id.as_str()) => {
            let raw = values.first().map(String::as_str).unwrap_or_default();
            let timestamp = parse_timestamp(raw)
                .ok_or_else(|| clone_error(id, format!("'{}' is not a timestamp", raw)))?;
            Frame::Timestamp(TimestampFrame::new(frame_id(id)?, ENCODING, timestamp))
        }
        TargetFrame::Text { id, values } => Frame::Text(TextInformationFrame::new(
            frame_id(id)?,
            ENCODING,
            values.join("\0"),
        )),
        TargetFrame::Comment {
            language,
            description,
            values,
        } => Frame::Comment(CommentFrame::new(
            ENCODING,
            language_bytes(language),
            description.clone(),
            values.join("\0"),
        )),
        TargetFrame::Lyrics {
            language,
            description,
            text,
        } => Frame::UnsynchronizedText(UnsynchronizedTextFrame::new(
            ENCODING,
            language_bytes(language),
            description.clone(),
            text.clone(),
        )),
        TargetFrame::Picture {
            mime_type,
            picture_type,
            description,
            data,
        } => {
            let description = (!description.is_empty()).then(|| description.clone());
            let picture = Picture::new_unchecked(
                PictureType::from_u8(*picture_type),
                mime_type.as_deref().map(mime_type_from),
                description,
                data.clone(),
            );
            Frame::Picture(AttachedPictureFrame::new(ENCODING, picture))
        }
        TargetFrame::UserText {
            description,
            values,
        } => Frame::UserText(ExtendedTextFrame::new(
            ENCODING,
            description.clone(),
            values.join("\0"),
        )),
    };

    Ok(id3_frame)
}

fn frame_id(id: &str) -> Result<FrameId<'static>> {
    FrameId::new(id.to_string()).map_err(|e| clone_error(id, e.to_string()))
}

fn language_bytes(language: &str) -> [u8; 3] {
    let bytes = language.as_bytes();
    if bytes.len() == 3 {
        [bytes[0], bytes[1], bytes[2]]
    } else {
        let fallback = DEFAULT_LANGUAGE.as_bytes();
        [fallback[0], fallback[1], fallback[2]]
    }
}

fn mime_type_from(mime: &str) -> MimeType {
    match mime.to_ascii_lowercase().as_str() {
        "image/png" => MimeType::Png,
        "image/jpeg" | "image/jpg" => MimeType::Jpeg,
        "image/tiff" => MimeType::Tiff,
        "image/bmp" => MimeType::Bmp,
        "image/gif" => MimeType::Gif,
        _ => MimeType::Unknown(mime.to_string()),
    }
}

/// Parse `YYYY[-MM[-DD[THH[:MM[:SS]]]]]`
fn parse_timestamp(value: &str) -> Option<Timestamp> {
    let mut parts = value
        .trim()
        .split(|c| matches!(c, '-' | 'T' | ' ' | ':'));

    let year_part = parts.next()?;
    if year_part.len() != 4 {
        return None;
    }
    let year = number::<u16>(year_part)?;

    let rest: Vec<&str> = parts.collect();
    if rest.len() > 5 {
        return None;
    }

    const RANGES: [(u8, u8); 5] = [(1, 12), (1, 31), (0, 23), (0, 59), (0, 59)];
    let mut fields = [None; 5];
    for (slot, (part, (min, max))) in fields.iter_mut().zip(rest.iter().zip(RANGES)) {
        if part.len() != 2 {
            return None;
        }
        let value = number::<u8>(part)?;
        if !(min..=max).contains(&value) {
            return None;
        }
        *slot = Some(value);
    }

    Some(Timestamp {
        year,
        month: fields[0],
        day: fields[1],
        hour: fields[2],
        minute: fields[3],
        second: fields[4],
    })
}

fn number<T: std::str::FromStr>(part: &str) -> Option<T> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

fn clone_error(frame: &str, reason: impl Into<String>) -> ConvertError {
    ConvertError::TagClone {
        frame: frame.to_string(),
        reason: reason.into(),
    }
}
