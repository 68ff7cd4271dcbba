//! WAV tag → MP3 tag translation
//!
//! Dispatches once on the source shape:
//!
//! - Rich (ID3v2 in the WAV): every frame is cloned into a fresh frame of the
//!   same kind with UTF-8 encoding. Unknown frame kinds are skipped.
//! - Flat (RIFF INFO): a fixed table maps the well-known keys onto ID3 frames.
//!   Keys outside the table are dropped.
//!
//! Translation never fails as a whole. A frame that cannot be cloned is logged
//! and skipped; an empty result is valid.

use super::model::{
    FlatTags, RichFrame, RichTags, SourceTags, TargetFrame, TargetTagSet, DEFAULT_LANGUAGE,
};
use crate::error::{ConvertError, Result};
use tracing::{debug, info, trace, warn};

/// Where a flat key ends up
#[derive(Debug, Clone, Copy)]
enum FlatTarget {
    Text(&'static str),
    Comment,
}

/// One row of the RIFF INFO → ID3 table. The first key present wins.
struct FlatMapping {
    keys: &'static [&'static str],
    target: FlatTarget,
}

/// RIFF INFO keys (and the ID3 codes themselves, as aliases) mapped to ID3v2.4 frames
const FLAT_TABLE: &[FlatMapping] = &[
    FlatMapping { keys: &["INAM", "TIT2"], target: FlatTarget::Text("TIT2") },
    FlatMapping { keys: &["IART", "TPE1"], target: FlatTarget::Text("TPE1") },
    FlatMapping { keys: &["IPRD", "TALB"], target: FlatTarget::Text("TALB") },
    // ID3v2.4 has no TYER; the recording time frame carries the year
    FlatMapping { keys: &["ICRD", "TYER", "TDRC"], target: FlatTarget::Text("TDRC") },
    FlatMapping { keys: &["IGNR", "TCON"], target: FlatTarget::Text("TCON") },
    FlatMapping { keys: &["ITRK", "IPRT", "TRCK"], target: FlatTarget::Text("TRCK") },
    FlatMapping { keys: &["ICMT", "COMM"], target: FlatTarget::Comment },
    FlatMapping { keys: &["ISFT", "TSSE"], target: FlatTarget::Text("TSSE") },
];

/// Translate source tags into a fresh target tag set
pub fn translate(source: &SourceTags) -> TargetTagSet {
    match source {
        SourceTags::Rich(tags) => translate_rich(tags),
        SourceTags::Flat(tags) => translate_flat(tags),
    }
}

fn translate_rich(tags: &RichTags) -> TargetTagSet {
    let mut target = TargetTagSet::new();

    for frame in &tags.frames {
        match clone_frame(frame) {
            Ok(Some(cloned)) => target.push(cloned),
            Ok(None) => info!("Skipping unknown/incompatible ID3 frame: {}", frame.id()),
            Err(e) => warn!("{}", e),
        }
    }

    debug!(
        "Cloned {} of {} ID3 frames",
        target.len(),
        tags.frames.len()
    );
    target
}

/// Clone one rich frame. `Ok(None)` means the frame kind is not carried over.
fn clone_frame(frame: &RichFrame) -> Result<Option<TargetFrame>> {
    let cloned = match frame {
        RichFrame::Text { id, values } => {
            if !is_text_frame_id(id) {
                return Err(clone_error(id, "not a valid text frame id"));
            }
            TargetFrame::Text {
                id: id.clone(),
                values: values.clone(),
            }
        }
        RichFrame::Comment {
            language,
            description,
            values,
        } => TargetFrame::Comment {
            language: normalize_language(language.as_deref()),
            description: description.clone(),
            values: values.clone(),
        },
        RichFrame::Lyrics {
            language,
            description,
            text,
        } => TargetFrame::Lyrics {
            language: normalize_language(language.as_deref()),
            description: description.clone(),
            text: text.clone(),
        },
        RichFrame::Picture {
            mime_type,
            picture_type,
            description,
            data,
        } => {
            if data.is_empty() {
                return Err(clone_error("APIC", "picture has no image data"));
            }
            TargetFrame::Picture {
                mime_type: mime_type.clone(),
                picture_type: *picture_type,
                description: description.clone().unwrap_or_default(),
                data: data.clone(),
            }
        }
        RichFrame::UserText {
            description,
            values,
        } => TargetFrame::UserText {
            description: description.clone(),
            values: values.clone(),
        },
        RichFrame::Other { .. } => return Ok(None),
    };

    Ok(Some(cloned))
}

fn translate_flat(tags: &FlatTags) -> TargetTagSet {
    let mut target = TargetTagSet::new();

    for mapping in FLAT_TABLE {
        let Some((key, values)) = mapping
            .keys
            .iter()
            .find_map(|key| tags.get(key).map(|values| (*key, values)))
        else {
            continue;
        };

        trace!("RIFF {} -> {:?}", key, mapping.target);
        let frame = match mapping.target {
            FlatTarget::Text(id) => TargetFrame::Text {
                id: id.to_string(),
                values: values.to_vec(),
            },
            FlatTarget::Comment => TargetFrame::Comment {
                language: DEFAULT_LANGUAGE.to_string(),
                description: String::new(),
                values: values.to_vec(),
            },
        };
        target.push(frame);
    }

    debug!(
        "Mapped {} of {} RIFF INFO keys",
        target.len(),
        tags.entries.len()
    );
    target
}

/// `T` followed by three uppercase letters or digits, excluding `TXXX`
fn is_text_frame_id(id: &str) -> bool {
    id.len() == 4
        && id.starts_with('T')
        && id != "TXXX"
        && id.bytes().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
}

/// Three ASCII letters, lowercased; anything else falls back to the default
fn normalize_language(language: Option<&str>) -> String {
    match language {
        Some(lang) if lang.len() == 3 && lang.bytes().all(|b| b.is_ascii_alphabetic()) => {
            lang.to_ascii_lowercase()
        }
        _ => DEFAULT_LANGUAGE.to_string(),
    }
}

fn clone_error(frame: &str, reason: &str) -> ConvertError {
    ConvertError::TagClone {
        frame: frame.to_string(),
        reason: reason.to_string(),
    }
}
