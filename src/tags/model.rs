//! Tag data model
//!
//! A WAV file carries its metadata in one of two shapes:
//!
//! - **Rich**: an embedded ID3v2 chunk, a list of typed frames with encoding,
//!   language and description metadata
//! - **Flat**: a RIFF `LIST/INFO` chunk, plain key → value pairs
//!
//! Both are read into [`SourceTags`]; the translator turns either into a
//! [`TargetTagSet`] that is written to the MP3 as ID3v2.4.

/// Language code used when a comment or lyrics frame has none
pub const DEFAULT_LANGUAGE: &str = "eng";

// =============================================================================
// Source side
// =============================================================================

/// Tags read from a WAV file. Immutable once read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceTags {
    Rich(RichTags),
    Flat(FlatTags),
}

impl SourceTags {
    /// True when the file carried an ID3v2 container, even an empty one
    pub fn is_rich_shape(&self) -> bool {
        matches!(self, SourceTags::Rich(_))
    }

    /// Number of frames (rich) or keys (flat)
    pub fn len(&self) -> usize {
        match self {
            SourceTags::Rich(tags) => tags.frames.len(),
            SourceTags::Flat(tags) => tags.entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Frames from an embedded ID3v2 container, in file order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RichTags {
    pub frames: Vec<RichFrame>,
}

impl RichTags {
    pub fn new(frames: Vec<RichFrame>) -> Self {
        Self { frames }
    }
}

/// One frame of a rich container
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RichFrame {
    /// Text information frame (`T***`), including dates
    Text { id: String, values: Vec<String> },
    /// `COMM`
    Comment {
        language: Option<String>,
        description: String,
        values: Vec<String>,
    },
    /// `USLT`
    Lyrics {
        language: Option<String>,
        description: String,
        text: String,
    },
    /// `APIC`
    Picture {
        mime_type: Option<String>,
        picture_type: u8,
        description: Option<String>,
        data: Vec<u8>,
    },
    /// `TXXX`
    UserText {
        description: String,
        values: Vec<String>,
    },
    /// Anything else (URLs, popularimeter, private data, ...)
    Other { id: String },
}

impl RichFrame {
    /// Four character frame code
    pub fn id(&self) -> &str {
        match self {
            RichFrame::Text { id, .. } | RichFrame::Other { id } => id,
            RichFrame::Comment { .. } => "COMM",
            RichFrame::Lyrics { .. } => "USLT",
            RichFrame::Picture { .. } => "APIC",
            RichFrame::UserText { .. } => "TXXX",
        }
    }
}

/// Key/value pairs from a RIFF INFO chunk, in file order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlatTags {
    pub entries: Vec<(String, Vec<String>)>,
}

impl FlatTags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value, grouping repeated keys
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value),
            None => self.entries.push((key, vec![value])),
        }
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, values)| values.as_slice())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FlatTags {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tags = FlatTags::new();
        for (key, value) in iter {
            tags.push(key, value);
        }
        tags
    }
}

// =============================================================================
// Target side
// =============================================================================

/// A frame to be written to the MP3's ID3v2 tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetFrame {
    Text {
        id: String,
        values: Vec<String>,
    },
    Comment {
        language: String,
        description: String,
        values: Vec<String>,
    },
    Lyrics {
        language: String,
        description: String,
        text: String,
    },
    Picture {
        mime_type: Option<String>,
        picture_type: u8,
        description: String,
        data: Vec<u8>,
    },
    UserText {
        description: String,
        values: Vec<String>,
    },
}

impl TargetFrame {
    pub fn id(&self) -> &str {
        match self {
            TargetFrame::Text { id, .. } => id,
            TargetFrame::Comment { .. } => "COMM",
            TargetFrame::Lyrics { .. } => "USLT",
            TargetFrame::Picture { .. } => "APIC",
            TargetFrame::UserText { .. } => "TXXX",
        }
    }
}

/// Frames for one destination file, always built from scratch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetTagSet {
    frames: Vec<TargetFrame>,
}

impl TargetTagSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, frame: TargetFrame) {
        self.frames.push(frame);
    }

    pub fn frames(&self) -> &[TargetFrame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// First text frame with the given id
    pub fn text(&self, id: &str) -> Option<&[String]> {
        self.frames.iter().find_map(|frame| match frame {
            TargetFrame::Text { id: frame_id, values } if frame_id == id => Some(values.as_slice()),
            _ => None,
        })
    }
}

impl<'a> IntoIterator for &'a TargetTagSet {
    type Item = &'a TargetFrame;
    type IntoIter = std::slice::Iter<'a, TargetFrame>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}
