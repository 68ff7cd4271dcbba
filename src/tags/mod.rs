//! Tag reading, translation and writing
//!
//! - `model`: the two source shapes and the target frame set
//! - `reader`: WAV → [`SourceTags`] via lofty
//! - `translate`: [`SourceTags`] → [`TargetTagSet`]
//! - `writer`: [`TargetTagSet`] → ID3v2.4 on the MP3
//! - `preview`: read-only listing for `--preview`

pub mod model;
pub mod preview;
pub mod reader;
pub mod translate;
pub mod writer;

pub use model::{FlatTags, RichFrame, RichTags, SourceTags, TargetFrame, TargetTagSet};
pub use preview::render_preview;
pub use reader::read_source_tags;
pub use translate::translate;
pub use writer::write_tags;

use std::path::Path;
use tracing::{debug, warn};

/// Read and translate the tags of a WAV file.
///
/// An unreadable tag container is logged and yields an empty set.
pub fn target_tags_for(path: &Path) -> TargetTagSet {
    match read_source_tags(path) {
        Ok(Some(source)) => translate(&source),
        Ok(None) => {
            debug!("No tags to copy from {}", path.display());
            TargetTagSet::new()
        }
        Err(e) => {
            warn!("Tags could not be read, converting without tags: {}", e);
            TargetTagSet::new()
        }
    }
}
