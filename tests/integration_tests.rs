//! Integration tests for the wav2mp3 pipeline
//!
//! These tests drive full runs over generated WAV trees and inspect the
//! resulting MP3 tree, tags and log.

use lofty::config::{ParseOptions, WriteOptions};
use lofty::id3::v2::{
    AttachedPictureFrame, CommentFrame, ExtendedTextFrame, Frame, FrameId, Id3v2Tag,
    TextInformationFrame, TimestampFrame,
};
use lofty::iff::wav::RiffInfoList;
use lofty::mpeg::MpegFile;
use lofty::picture::{MimeType, Picture, PictureType};
use lofty::prelude::*;
use lofty::tag::items::Timestamp;
use lofty::TextEncoding;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use wav2mp3::logging::LOG_FILE_NAME;
use wav2mp3::pipeline::{self, CancelFlag};
use wav2mp3::{config::Settings, ConvertError};

/// Generate a sine wave WAV file for testing
///
/// Creates a mono 16-bit WAV file at the specified path.
fn generate_sine_wav(path: &Path, frequency_hz: f32, duration_secs: f32, sample_rate: u32) {
    use std::f32::consts::PI;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create WAV directory");
    }

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec).expect("Failed to create WAV file");

    let num_samples = (duration_secs * sample_rate as f32) as usize;
    let amplitude = 0.5f32;

    for i in 0..num_samples {
        let t = i as f32 / sample_rate as f32;
        let sample = (2.0 * PI * frequency_hz * t).sin() * amplitude;
        writer
            .write_sample((sample * 32767.0) as i16)
            .expect("Failed to write sample");
    }

    writer.finalize().expect("Failed to finalize WAV");
}

fn short_wav(path: &Path) {
    generate_sine_wav(path, 440.0, 0.25, 44100);
}

/// Settings for tests: two workers, no progress bar, silent console
fn create_test_settings(source: PathBuf, destination: PathBuf) -> Settings {
    Settings {
        source,
        destination,
        workers: 2,
        show_progress: false,
        console_level: None,
        ..Settings::default()
    }
}

fn read_log(dest: &Path) -> String {
    fs::read_to_string(dest.join(LOG_FILE_NAME)).expect("Log file should exist")
}

fn mp3_files(dir: &Path) -> Vec<PathBuf> {
    walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| p.extension().is_some_and(|e| e == "mp3"))
        .collect()
}

#[test]
fn test_converts_tree_preserving_structure() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("src");
    let dest = temp.path().join("out");
    short_wav(&src.join("a/1.wav"));
    short_wav(&src.join("a/b/2.wav"));
    fs::write(src.join("a/notes.txt"), "ignored").unwrap();

    let summary = pipeline::run(&create_test_settings(src, dest.clone())).unwrap();

    assert_eq!(summary.total_files, 2);
    assert_eq!(summary.converted, 2);
    assert_eq!(summary.failed, 0);
    assert!(dest.join("a/1.mp3").is_file());
    assert!(dest.join("a/b/2.mp3").is_file());
    assert!(!dest.join("a/notes.txt").exists());
    assert!(fs::metadata(dest.join("a/1.mp3")).unwrap().len() > 0);
}

#[test]
fn test_existing_mp3_is_never_overwritten() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("src");
    let dest = temp.path().join("out");
    short_wav(&src.join("a/1.wav"));
    short_wav(&src.join("a/b/2.wav"));
    fs::create_dir_all(dest.join("a")).unwrap();
    fs::write(dest.join("a/1.mp3"), b"hand-made").unwrap();

    let summary = pipeline::run(&create_test_settings(src, dest.clone())).unwrap();

    assert_eq!(summary.converted, 1);
    assert_eq!(summary.skipped, 1);
    assert_eq!(fs::read(dest.join("a/1.mp3")).unwrap(), b"hand-made");
    assert!(read_log(&dest).contains("Skipped (already exists)"));
}

#[test]
fn test_corrupt_wav_fails_alone() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("src");
    let dest = temp.path().join("out");
    short_wav(&src.join("good.wav"));
    fs::write(src.join("broken.wav"), b"RIFF....WAVEjunk").unwrap();

    let summary = pipeline::run(&create_test_settings(src, dest.clone())).unwrap();

    assert_eq!(summary.converted, 1);
    assert_eq!(summary.failed, 1);
    assert!(dest.join("good.mp3").is_file());
    assert!(!dest.join("broken.mp3").exists());

    let log = read_log(&dest);
    assert!(
        log.lines()
            .any(|line| line.contains("ERROR") && line.contains("broken.wav")),
        "log should name the failed file:\n{}",
        log
    );
    // No staging leftovers next to the outputs
    let leftovers: Vec<_> = fs::read_dir(&dest)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".part"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn test_second_run_skips_everything() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("src");
    let dest = temp.path().join("out");
    short_wav(&src.join("x.wav"));
    short_wav(&src.join("deep/er/y.wav"));
    let settings = create_test_settings(src, dest.clone());

    let first = pipeline::run(&settings).unwrap();
    let before = fs::read(dest.join("deep/er/y.mp3")).unwrap();
    let second = pipeline::run(&settings).unwrap();

    assert_eq!(first.converted, 2);
    assert_eq!(second.converted, 0);
    assert_eq!(second.skipped, 2);
    assert_eq!(fs::read(dest.join("deep/er/y.mp3")).unwrap(), before);
    // Both runs append to the same log
    assert_eq!(read_log(&dest).matches("Workers: 2").count(), 2);
}

#[test]
fn test_dry_run_writes_no_audio() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("src");
    let dest = temp.path().join("out");
    short_wav(&src.join("one.wav"));
    short_wav(&src.join("sub/two.wav"));
    short_wav(&src.join("sub/three.wav"));
    fs::create_dir_all(dest.join("sub")).unwrap();
    fs::write(dest.join("sub/two.mp3"), b"existing").unwrap();

    let mut settings = create_test_settings(src, dest.clone());
    settings.dry_run = true;
    let summary = pipeline::run(&settings).unwrap();

    assert!(summary.dry_run);
    assert_eq!(summary.total_files, 3);
    assert_eq!(summary.would_convert, 2);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.would_convert + summary.skipped, summary.total_files);
    assert_eq!(summary.converted, 0);
    assert_eq!(mp3_files(&dest), vec![dest.join("sub/two.mp3")]);
}

#[test]
fn test_missing_source_is_fatal() {
    let temp = TempDir::new().unwrap();
    let settings = create_test_settings(temp.path().join("nope"), temp.path().join("out"));

    let err = pipeline::run(&settings).unwrap_err();

    assert!(matches!(err, ConvertError::SourceNotFound(_)));
}

#[test]
fn test_empty_source_tree() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("src");
    fs::create_dir_all(&src).unwrap();

    let summary = pipeline::run(&create_test_settings(src, temp.path().join("out"))).unwrap();

    assert_eq!(summary.total_files, 0);
    assert_eq!(summary.accounted(), 0);
}

#[test]
fn test_uppercase_extension_becomes_mp3() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("src");
    let dest = temp.path().join("out");
    short_wav(&src.join("LOUD.WAV"));

    let summary = pipeline::run(&create_test_settings(src, dest.clone())).unwrap();

    assert_eq!(summary.converted, 1);
    assert!(dest.join("LOUD.mp3").is_file());
}

#[test]
fn test_riff_info_tags_are_translated() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("src");
    let dest = temp.path().join("out");
    let wav = src.join("song.wav");
    short_wav(&wav);

    let mut info = RiffInfoList::default();
    info.insert(String::from("INAM"), String::from("Song"));
    info.insert(String::from("IART"), String::from("Band"));
    info.insert(String::from("ICRD"), String::from("1999"));
    info.save_to_path(&wav, WriteOptions::default())
        .expect("Failed to write RIFF INFO");

    let summary = pipeline::run(&create_test_settings(src, dest.clone())).unwrap();
    assert_eq!(summary.converted, 1);

    let tagged = lofty::read_from_path(dest.join("song.mp3")).expect("MP3 should be readable");
    let tag = tagged.primary_tag().expect("MP3 should carry a tag");
    assert_eq!(tag.title().as_deref(), Some("Song"));
    assert_eq!(tag.artist().as_deref(), Some("Band"));
    assert!(read_log(&dest).contains("tags copied: 3"));
}

#[test]
fn test_id3_tags_are_cloned() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("src");
    let dest = temp.path().join("out");
    let wav = src.join("album/track.wav");
    short_wav(&wav);

    let mut id3 = Id3v2Tag::new();
    id3.set_title(String::from("Rich Title"));
    id3.set_artist(String::from("Rich Artist"));
    id3.set_album(String::from("Rich Album"));
    id3.save_to_path(&wav, WriteOptions::default())
        .expect("Failed to write ID3 chunk");

    let summary = pipeline::run(&create_test_settings(src, dest.clone())).unwrap();
    assert_eq!(summary.converted, 1);

    let tagged = lofty::read_from_path(dest.join("album/track.mp3")).unwrap();
    let tag = tagged.primary_tag().expect("MP3 should carry a tag");
    assert_eq!(tag.title().as_deref(), Some("Rich Title"));
    assert_eq!(tag.artist().as_deref(), Some("Rich Artist"));
    assert_eq!(tag.album().as_deref(), Some("Rich Album"));
    assert!(read_log(&dest).contains("tags copied: 3"));
}

#[test]
fn test_every_rich_frame_kind_survives() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("src");
    let dest = temp.path().join("out");
    let wav = src.join("rich.wav");
    short_wav(&wav);

    let utf8 = TextEncoding::UTF8;
    let mut id3 = Id3v2Tag::new();
    id3.insert(Frame::Text(TextInformationFrame::new(
        FrameId::new("TPE1").unwrap(),
        utf8,
        String::from("A\0B\0C"),
    )));
    id3.insert(Frame::Comment(CommentFrame::new(
        utf8,
        *b"deu",
        String::from("notes"),
        String::from("Aufgenommen live"),
    )));
    id3.insert(Frame::UserText(ExtendedTextFrame::new(
        utf8,
        String::from("CAT"),
        String::from("XYZ-001"),
    )));
    id3.insert(Frame::Picture(AttachedPictureFrame::new(
        utf8,
        Picture::new_unchecked(
            PictureType::CoverFront,
            Some(MimeType::Png),
            Some(String::from("front")),
            vec![0x89, b'P', b'N', b'G', 1, 2, 3],
        ),
    )));
    id3.insert(Frame::Picture(AttachedPictureFrame::new(
        utf8,
        Picture::new_unchecked(
            PictureType::CoverBack,
            Some(MimeType::Jpeg),
            Some(String::from("back")),
            vec![0xFF, 0xD8, 0xFF, 9, 8, 7],
        ),
    )));
    id3.insert(Frame::Timestamp(TimestampFrame::new(
        FrameId::new("TDRC").unwrap(),
        utf8,
        Timestamp {
            year: 2001,
            month: Some(5),
            day: Some(3),
            hour: None,
            minute: None,
            second: None,
        },
    )));
    id3.save_to_path(&wav, WriteOptions::default())
        .expect("Failed to write ID3 chunk");

    let summary = pipeline::run(&create_test_settings(src, dest.clone())).unwrap();
    assert_eq!(summary.converted, 1);
    assert!(read_log(&dest).contains("tags copied: 6"));

    let mut file = fs::File::open(dest.join("rich.mp3")).unwrap();
    let mp3 = MpegFile::read_from(&mut file, ParseOptions::new()).unwrap();
    let tag = mp3.id3v2().expect("MP3 should carry an ID3v2 tag");
    let frames: Vec<&Frame<'static>> = tag.into_iter().collect();
    assert_eq!(frames.len(), 6);

    let artist = frames.iter().find_map(|frame| match frame {
        Frame::Text(text) if frame.id_str() == "TPE1" => Some(text.value.as_str()),
        _ => None,
    });
    assert_eq!(artist, Some("A\0B\0C"));

    let comment = frames.iter().find_map(|frame| match frame {
        Frame::Comment(comment) => Some(comment),
        _ => None,
    });
    let comment = comment.expect("COMM should be copied");
    assert_eq!(&comment.language, b"deu");
    assert_eq!(comment.description, "notes");
    assert_eq!(comment.content, "Aufgenommen live");

    let user_text = frames.iter().find_map(|frame| match frame {
        Frame::UserText(user) => Some((user.description.as_str(), user.content.as_str())),
        _ => None,
    });
    assert_eq!(user_text, Some(("CAT", "XYZ-001")));

    let pictures: Vec<&Picture> = frames
        .iter()
        .filter_map(|frame| match frame {
            Frame::Picture(picture) => Some(&picture.picture),
            _ => None,
        })
        .collect();
    assert_eq!(pictures.len(), 2);
    let front = pictures
        .iter()
        .find(|p| p.pic_type() == PictureType::CoverFront)
        .expect("front cover should be copied");
    assert_eq!(front.mime_type(), Some(&MimeType::Png));
    assert_eq!(front.description(), Some("front"));
    assert_eq!(front.data(), &[0x89, b'P', b'N', b'G', 1, 2, 3]);
    let back = pictures
        .iter()
        .find(|p| p.pic_type() == PictureType::CoverBack)
        .expect("back cover should be copied");
    assert_eq!(back.mime_type(), Some(&MimeType::Jpeg));
    assert_eq!(back.data(), &[0xFF, 0xD8, 0xFF, 9, 8, 7]);

    let recorded = frames.iter().find_map(|frame| match frame {
        Frame::Timestamp(ts) if frame.id_str() == "TDRC" => Some(ts.timestamp),
        _ => None,
    });
    let recorded = recorded.expect("TDRC should be copied");
    assert_eq!((recorded.year, recorded.month, recorded.day), (2001, Some(5), Some(3)));
}

#[test]
fn test_untagged_wav_converts_with_zero_tags() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("src");
    let dest = temp.path().join("out");
    short_wav(&src.join("plain.wav"));

    let summary = pipeline::run(&create_test_settings(src, dest.clone())).unwrap();

    assert_eq!(summary.converted, 1);
    assert!(read_log(&dest).contains("tags copied: 0"));
}

#[test]
fn test_cancelled_run_creates_nothing() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("src");
    let dest = temp.path().join("out");
    for i in 0..5 {
        short_wav(&src.join(format!("t{}.wav", i)));
    }
    let cancel = CancelFlag::new();
    cancel.cancel();

    let summary =
        pipeline::run_with_cancel(&create_test_settings(src, dest.clone()), &cancel).unwrap();

    assert_eq!(summary.total_files, 5);
    assert_eq!(summary.cancelled, 5);
    assert_eq!(summary.converted, 0);
    assert!(mp3_files(&dest).is_empty());
}

#[test]
fn test_single_worker_matches_parallel_result() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("src");
    for i in 0..4 {
        short_wav(&src.join(format!("d{}/f.wav", i)));
    }

    let mut serial = create_test_settings(src.clone(), temp.path().join("serial"));
    serial.workers = 1;
    let mut parallel = create_test_settings(src, temp.path().join("parallel"));
    parallel.workers = 4;

    let a = pipeline::run(&serial).unwrap();
    let b = pipeline::run(&parallel).unwrap();

    assert_eq!(a, b);
    assert_eq!(a.converted, 4);
}
