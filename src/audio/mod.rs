//! Audio transcoding: symphonia decode → LAME encode

pub mod decoder;
pub mod encoder;

pub use decoder::PcmStream;
pub use encoder::Mp3Writer;

use crate::error::Result;
use crate::types::Bitrate;
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// How a transcode ended
#[derive(Debug)]
pub enum Transcoded<W> {
    /// Every sample was encoded; the writer is returned flushed
    Finished(W),
    /// `interrupted` returned true between two chunks
    Interrupted,
}

/// Decode `source` and write it as MP3 into `output`.
///
/// `interrupted` is polled between chunks so a run can be cancelled mid-file.
pub fn transcode<W, F>(
    source: &Path,
    output: W,
    label: &Path,
    bitrate: Bitrate,
    interrupted: F,
) -> Result<Transcoded<W>>
where
    W: Write,
    F: Fn() -> bool,
{
    let mut pcm = PcmStream::open(source)?;
    let mut mp3 = Mp3Writer::new(output, label, pcm.sample_rate(), pcm.channels(), bitrate)?;

    let mut samples = 0usize;
    while let Some(chunk) = pcm.next_chunk()? {
        if interrupted() {
            debug!("Transcode of {} interrupted", source.display());
            return Ok(Transcoded::Interrupted);
        }
        samples += chunk.len();
        mp3.write_interleaved(chunk)?;
    }

    debug!(
        "Encoded {} samples from {} at {}",
        samples,
        source.display(),
        bitrate
    );
    Ok(Transcoded::Finished(mp3.finish()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_tone(path: &Path, seconds: f32) {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 22050,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for i in 0..(seconds * 22050.0) as usize {
            writer
                .write_sample(((i as f32 * 0.1).sin() * 6000.0) as i16)
                .unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_transcode_finishes() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("tone.wav");
        write_tone(&source, 0.5);

        let result = transcode(&source, Vec::new(), Path::new("tone.mp3"), Bitrate::default(), || false)
            .unwrap();

        match result {
            Transcoded::Finished(mp3) => assert!(!mp3.is_empty()),
            Transcoded::Interrupted => panic!("nothing asked to stop"),
        }
    }

    #[test]
    fn test_transcode_stops_when_interrupted() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("tone.wav");
        write_tone(&source, 0.5);

        let result = transcode(&source, Vec::new(), Path::new("tone.mp3"), Bitrate::default(), || true)
            .unwrap();

        assert!(matches!(result, Transcoded::Interrupted));
    }
}
