//! Audio decoding using symphonia
//!
//! Streams a WAV file as interleaved 16-bit PCM, one packet at a time,
//! so memory use does not grow with file length.

use crate::error::{ConvertError, Result};
use std::path::{Path, PathBuf};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{Decoder, DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, trace};

/// Decoded PCM, pulled chunk by chunk
pub struct PcmStream {
    path: PathBuf,
    format: Box<dyn FormatReader>,
    decoder: Box<dyn Decoder>,
    track_id: u32,
    sample_rate: u32,
    channels: usize,
    buffer: Option<SampleBuffer<i16>>,
}

impl PcmStream {
    /// Open and probe a WAV file
    pub fn open(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|e| {
            ConvertError::decode_error(path, format!("Failed to open file: {}", e))
        })?;

        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(&ext.to_ascii_lowercase());
        }

        let probed = symphonia::default::get_probe()
            .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
            .map_err(|e| ConvertError::decode_error(path, format!("Failed to probe format: {}", e)))?;

        let format = probed.format;

        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| ConvertError::decode_error(path, "No audio tracks found"))?;

        let track_id = track.id;
        let codec_params = track.codec_params.clone();

        let sample_rate = codec_params
            .sample_rate
            .ok_or_else(|| ConvertError::decode_error(path, "Unknown sample rate"))?;
        let channels = codec_params.channels.map(|c| c.count()).unwrap_or(2);

        debug!(
            "Decoding: {} @ {}Hz, {} channels",
            path.display(),
            sample_rate,
            channels
        );

        let decoder = symphonia::default::get_codecs()
            .make(&codec_params, &DecoderOptions::default())
            .map_err(|e| {
                ConvertError::decode_error(path, format!("Failed to create decoder: {}", e))
            })?;

        Ok(Self {
            path: path.to_path_buf(),
            format,
            decoder,
            track_id,
            sample_rate,
            channels,
            buffer: None,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Next chunk of interleaved samples, `None` at end of stream
    pub fn next_chunk(&mut self) -> Result<Option<&[i16]>> {
        loop {
            let packet = match self.format.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    return Ok(None);
                }
                Err(e) => {
                    return Err(ConvertError::decode_error(
                        &self.path,
                        format!("Failed to read packet: {}", e),
                    ));
                }
            };

            if packet.track_id() != self.track_id {
                continue;
            }

            let decoded = match self.decoder.decode(&packet) {
                Ok(decoded) => decoded,
                Err(SymphoniaError::DecodeError(e)) => {
                    trace!("Skipping corrupted frame: {}", e);
                    continue;
                }
                Err(e) => {
                    return Err(ConvertError::decode_error(
                        &self.path,
                        format!("Decode error: {}", e),
                    ));
                }
            };

            if decoded.frames() == 0 {
                continue;
            }

            let spec = *decoded.spec();
            let buffer = self
                .buffer
                .insert(SampleBuffer::<i16>::new(decoded.capacity() as u64, spec));
            buffer.copy_interleaved_ref(decoded);
            return Ok(Some(buffer.samples()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_rejects_non_audio() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("broken.wav");
        std::fs::write(&path, b"definitely not audio").unwrap();

        let err = PcmStream::open(&path).err().unwrap();
        assert!(err.is_codec_error());
    }

    #[test]
    fn test_open_missing_file() {
        let err = PcmStream::open(Path::new("/no/such/file.wav")).err().unwrap();
        assert!(matches!(err, ConvertError::Decode { .. }));
    }
}
