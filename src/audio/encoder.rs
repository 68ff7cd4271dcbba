//! MP3 encoding using LAME via mp3lame-encoder
//!
//! Constant bitrate, fed interleaved 16-bit chunks as they come out of the decoder.

use crate::error::{ConvertError, Result};
use crate::types::Bitrate;
use mp3lame_encoder::{Builder, DualPcm, Encoder, FlushNoGap};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Extra room LAME may need when flushing its internal buffers
const FLUSH_RESERVE: usize = 7200;

/// Streaming MP3 encoder writing into `W`
pub struct Mp3Writer<W: Write> {
    encoder: Encoder,
    output: W,
    path: PathBuf,
    channels: usize,
    left: Vec<i16>,
    right: Vec<i16>,
    mp3: Vec<u8>,
}

impl<W: Write> Mp3Writer<W> {
    /// `path` only labels errors; all bytes go to `output`
    pub fn new(
        output: W,
        path: &Path,
        sample_rate: u32,
        channels: usize,
        bitrate: Bitrate,
    ) -> Result<Self> {
        if channels == 0 {
            return Err(ConvertError::encode_error(path, "Source has no audio channels"));
        }

        let mut builder = Builder::new()
            .ok_or_else(|| ConvertError::encode_error(path, "LAME encoder init failed"))?;

        // LAME encodes mono or stereo; extra channels are dropped
        let lame_channels = channels.min(2) as u8;
        builder.set_num_channels(lame_channels).map_err(|e| {
            ConvertError::encode_error(path, format!("LAME set channels failed: {:?}", e))
        })?;

        builder.set_sample_rate(sample_rate).map_err(|e| {
            ConvertError::encode_error(path, format!("LAME set sample rate {} failed: {:?}", sample_rate, e))
        })?;

        builder.set_brate(lame_bitrate(bitrate, path)?).map_err(|e| {
            ConvertError::encode_error(path, format!("LAME set bitrate failed: {:?}", e))
        })?;

        builder
            .set_quality(mp3lame_encoder::Quality::Good)
            .map_err(|e| {
                ConvertError::encode_error(path, format!("LAME set quality failed: {:?}", e))
            })?;

        let encoder = builder
            .build()
            .map_err(|e| ConvertError::encode_error(path, format!("LAME build failed: {:?}", e)))?;

        Ok(Self {
            encoder,
            output,
            path: path.to_path_buf(),
            channels,
            left: Vec::new(),
            right: Vec::new(),
            mp3: Vec::new(),
        })
    }

    /// Encode one chunk of interleaved samples
    pub fn write_interleaved(&mut self, samples: &[i16]) -> Result<()> {
        self.left.clear();
        self.right.clear();

        for frame in samples.chunks_exact(self.channels) {
            self.left.push(frame[0]);
            // Mono: duplicate to both channels
            self.right.push(if self.channels > 1 { frame[1] } else { frame[0] });
        }

        if self.left.is_empty() {
            return Ok(());
        }

        self.mp3.clear();
        self.mp3
            .reserve(mp3lame_encoder::max_required_buffer_size(self.left.len()));

        let input = DualPcm {
            left: &self.left,
            right: &self.right,
        };

        let encoded_size = self
            .encoder
            .encode(input, self.mp3.spare_capacity_mut())
            .map_err(|e| ConvertError::encode_error(&self.path, format!("LAME encode failed: {:?}", e)))?;

        // SAFETY: encoder wrote encoded_size bytes into spare capacity
        unsafe {
            self.mp3.set_len(encoded_size);
        }

        self.output
            .write_all(&self.mp3)
            .map_err(|e| ConvertError::output_error(&self.path, e))
    }

    /// Flush LAME and hand back the writer
    pub fn finish(mut self) -> Result<W> {
        self.mp3.clear();
        self.mp3.reserve(FLUSH_RESERVE);

        let flush_size = self
            .encoder
            .flush::<FlushNoGap>(self.mp3.spare_capacity_mut())
            .map_err(|e| ConvertError::encode_error(&self.path, format!("LAME flush failed: {:?}", e)))?;

        // SAFETY: encoder wrote flush_size bytes into spare capacity
        unsafe {
            self.mp3.set_len(flush_size);
        }

        self.output
            .write_all(&self.mp3)
            .and_then(|_| self.output.flush())
            .map_err(|e| ConvertError::output_error(&self.path, e))?;

        Ok(self.output)
    }
}

/// Convert a validated bitrate to the LAME enum
fn lame_bitrate(bitrate: Bitrate, path: &Path) -> Result<mp3lame_encoder::Bitrate> {
    use mp3lame_encoder::Bitrate as Lame;

    let lame = match bitrate.kbps() {
        8 => Lame::Kbps8,
        16 => Lame::Kbps16,
        24 => Lame::Kbps24,
        32 => Lame::Kbps32,
        40 => Lame::Kbps40,
        48 => Lame::Kbps48,
        64 => Lame::Kbps64,
        80 => Lame::Kbps80,
        96 => Lame::Kbps96,
        112 => Lame::Kbps112,
        128 => Lame::Kbps128,
        160 => Lame::Kbps160,
        192 => Lame::Kbps192,
        224 => Lame::Kbps224,
        256 => Lame::Kbps256,
        320 => Lame::Kbps320,
        other => {
            return Err(ConvertError::encode_error(
                path,
                format!("LAME does not support {}k", other),
            ))
        }
    };
    Ok(lame)
}
