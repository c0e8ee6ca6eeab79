//! WAVE Codec Integration Tests
//!
//! Files written by an independent implementation (hound) are decoded, and
//! files we encode are read back by it.

use std::fs;
use std::path::{Path, PathBuf};

use approx::assert_relative_eq;
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use ndarray::array;
use pretty_assertions::assert_eq;
use tempfile::{tempdir, TempDir};
use test_case::test_case;

use soundproc::{
    AudioDecoder, AudioEncoder, AudioSignal, AudioSignalMeta, SoundError, WaveDecoder, WaveEncoder,
};

const SAMPLE_RATE: u32 = 44100;

/// One second of 16-bit stereo: sample i holds (i % 1000) - 500, interleaved.
fn write_stereo_fixture(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("fixture.wav");
    let spec = WavSpec {
        channels: 2,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(&path, spec).unwrap();
    for i in 0..(SAMPLE_RATE as i32 * 2) {
        writer.write_sample(((i % 1000) - 500) as i16).unwrap();
    }
    writer.finalize().unwrap();
    path
}

fn stereo_fixture_value(frame: usize, channel: usize) -> i32 {
    ((frame * 2 + channel) % 1000) as i32 - 500
}

fn write_bytes(dir: &TempDir, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, bytes).unwrap();
    path
}

/// Canonical 44-byte header followed by `payload`
fn wave_image(channels: u16, sample_rate: u32, bits: u16, payload: &[u8]) -> Vec<u8> {
    let block_align = channels * bits / 8;
    let mut out = Vec::new();
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + payload.len() as u32).to_le_bytes());
    out.extend_from_slice(b"WAVE");
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&channels.to_le_bytes());
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&(sample_rate * u32::from(block_align)).to_le_bytes());
    out.extend_from_slice(&block_align.to_le_bytes());
    out.extend_from_slice(&bits.to_le_bytes());
    out.extend_from_slice(b"data");
    out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    out.extend_from_slice(payload);
    out
}

fn assert_rejected(path: &Path) -> SoundError {
    let decoder = WaveDecoder::new();
    assert!(
        !decoder.is_valid(path),
        "{} should be invalid",
        path.display()
    );
    decoder.decode(path).unwrap_err()
}

// === Decoding Tests ===

#[test]
fn test_decode_reference_file() {
    let dir = tempdir().unwrap();
    let path = write_stereo_fixture(&dir);

    let decoder = WaveDecoder::new();
    assert!(decoder.is_valid(&path));

    let signal = decoder.decode(&path).unwrap();

    assert_eq!(signal.data().shape(), &[2, SAMPLE_RATE as usize]);
    assert_eq!(signal.meta().sampling_rate(), SAMPLE_RATE);
    assert_eq!(signal.meta().channels(), 2);
    assert_eq!(signal.meta().bits_per_sample(), 16);
    assert_relative_eq!(signal.duration(), 1.0);

    for frame in [0, 1, 499, 500, 12345, SAMPLE_RATE as usize - 1] {
        for channel in 0..2 {
            assert_eq!(
                signal.data()[[channel, frame]],
                stereo_fixture_value(frame, channel),
                "frame {} channel {}",
                frame,
                channel
            );
        }
    }
}

#[test]
fn test_validate_returns_fmt_fields() {
    let dir = tempdir().unwrap();
    let path = write_stereo_fixture(&dir);

    let fmt = WaveDecoder::new().validate(&path).unwrap();

    assert_eq!(fmt.num_channels, 2);
    assert_eq!(fmt.sample_rate, SAMPLE_RATE);
    assert_eq!(fmt.block_align, 4);
    assert_eq!(fmt.byte_rate, SAMPLE_RATE * 4);
    assert_eq!(fmt.bits_per_sample, 16);
}

#[test]
fn test_uppercase_extension_is_accepted() {
    let dir = tempdir().unwrap();
    let path = write_bytes(&dir, "LOUD.WAV", &wave_image(1, 8000, 16, &[1, 0]));
    let signal = WaveDecoder::new().decode(&path).unwrap();
    assert_eq!(signal.data(), array![[1]]);
}

// === Round Trip Tests ===

#[test]
fn test_reencode_is_byte_identical() {
    let dir = tempdir().unwrap();
    let path = write_stereo_fixture(&dir);

    let signal = WaveDecoder::new().decode(&path).unwrap();
    let encoded = WaveEncoder::new().encode_to_bytes(&signal).unwrap();

    assert!(
        encoded == fs::read(&path).unwrap(),
        "re-encoded bytes differ"
    );
}

#[test]
fn test_encoded_file_decodes_to_same_signal() {
    let dir = tempdir().unwrap();
    let meta = AudioSignalMeta::new(22050, 3, 24).unwrap();
    let signal = AudioSignal::new(
        array![
            [8_388_607, -8_388_608, 0],
            [1, -1, 2],
            [100_000, -100_000, 42]
        ],
        meta,
    )
    .unwrap();

    let path = dir.path().join("three.wav");
    WaveEncoder::new().encode(&signal, &path).unwrap();

    assert_eq!(WaveDecoder::new().decode(&path).unwrap(), signal);
}

#[test]
fn test_hound_reads_encoded_file() {
    let dir = tempdir().unwrap();
    let meta = AudioSignalMeta::new(16000, 2, 16).unwrap();
    let signal = AudioSignal::new(array![[10, 20, 30], [-10, -20, -30]], meta).unwrap();

    let path = dir.path().join("out.wav");
    WaveEncoder::new().encode(&signal, &path).unwrap();

    let mut reader = WavReader::open(&path).unwrap();
    let spec = reader.spec();
    assert_eq!(spec.channels, 2);
    assert_eq!(spec.sample_rate, 16000);
    assert_eq!(spec.bits_per_sample, 16);

    let samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
    assert_eq!(samples, vec![10, -10, 20, -20, 30, -30]);
}

// === Channel Editing Tests ===

#[test]
fn test_drop_channel_then_encode() {
    let dir = tempdir().unwrap();
    let path = write_stereo_fixture(&dir);

    let mut signal = WaveDecoder::new().decode(&path).unwrap();
    signal.drop_channel(0).unwrap();

    let out = dir.path().join("mono.wav");
    WaveEncoder::new().encode(&signal, &out).unwrap();

    let mono = WaveDecoder::new().decode(&out).unwrap();
    assert_eq!(mono.meta().channels(), 1);
    assert_eq!(mono.num_frames(), SAMPLE_RATE as usize);
    assert_eq!(mono.data()[[0, 3]], stereo_fixture_value(3, 1));

    let reader = WavReader::open(&out).unwrap();
    assert_eq!(reader.spec().channels, 1);
    assert_eq!(reader.len(), SAMPLE_RATE);
}

#[test]
fn test_duplicate_channel_then_encode() {
    let dir = tempdir().unwrap();
    let path = write_stereo_fixture(&dir);

    let mut signal = WaveDecoder::new().decode(&path).unwrap();
    signal.duplicate_channel(1, 0).unwrap();

    let out = dir.path().join("three.wav");
    WaveEncoder::new().encode(&signal, &out).unwrap();

    let decoded = WaveDecoder::new().decode(&out).unwrap();
    assert_eq!(decoded.meta().channels(), 3);
    assert_eq!(decoded.channel(0), decoded.channel(2));
    assert_eq!(
        decoded.data()[[1, 7]],
        stereo_fixture_value(7, 0),
        "original channel 0 moved to index 1"
    );
}

#[test]
fn test_channel_errors_leave_signal_unchanged() {
    let dir = tempdir().unwrap();
    let path = write_stereo_fixture(&dir);
    let mut signal = WaveDecoder::new().decode(&path).unwrap();
    let before = signal.clone();

    let err = signal.drop_channel(2).unwrap_err();
    assert!(matches!(err, SoundError::ChannelOutOfRange { channel: 2, .. }));
    let err = signal.duplicate_channel(0, 3).unwrap_err();
    assert!(matches!(err, SoundError::PositionOutOfRange { position: 3, .. }));
    assert_eq!(signal, before);
}

// === Malformed Input Tests ===

#[test]
fn test_nonexistent_path() {
    let dir = tempdir().unwrap();
    let err = assert_rejected(&dir.path().join("missing.wav"));
    assert!(matches!(err, SoundError::Path { .. }));
}

#[test]
fn test_directory_is_rejected() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("folder.wav");
    fs::create_dir(&sub).unwrap();
    let err = assert_rejected(&sub);
    assert!(matches!(err, SoundError::Path { .. }));
}

#[test_case("audio.mp3" ; "other extension")]
#[test_case("audio" ; "no extension")]
fn test_wrong_extension_is_path_error(name: &str) {
    let dir = tempdir().unwrap();
    let path = write_bytes(&dir, name, &wave_image(1, 8000, 16, &[0, 0]));
    let err = assert_rejected(&path);
    match err {
        SoundError::Path { reason, .. } => assert!(reason.contains("extension"), "{}", reason),
        other => panic!("Expected Path, got: {:?}", other),
    }
}

#[test]
fn test_empty_file() {
    let dir = tempdir().unwrap();
    let path = write_bytes(&dir, "empty.wav", &[]);
    assert!(matches!(assert_rejected(&path), SoundError::WavFormat { .. }));
}

#[test]
fn test_raw_pcm_without_header() {
    let dir = tempdir().unwrap();
    let path = write_bytes(&dir, "raw.wav", &[0u8; 64]);
    assert!(matches!(assert_rejected(&path), SoundError::WavFormat { .. }));
}

#[test]
fn test_missing_fmt_chunk() {
    let dir = tempdir().unwrap();
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&12u32.to_le_bytes());
    bytes.extend_from_slice(b"WAVE");
    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&0u32.to_le_bytes());
    let path = write_bytes(&dir, "nofmt.wav", &bytes);

    assert!(matches!(assert_rejected(&path), SoundError::WavFormat { .. }));
}

#[test]
fn test_missing_data_chunk() {
    let dir = tempdir().unwrap();
    let mut bytes = wave_image(1, 8000, 16, &[]);
    bytes.truncate(36);
    bytes[4..8].copy_from_slice(&28u32.to_le_bytes());
    let path = write_bytes(&dir, "nodata.wav", &bytes);

    assert!(matches!(assert_rejected(&path), SoundError::WavFormat { .. }));
}

#[test]
fn test_unsupported_width() {
    let dir = tempdir().unwrap();
    let path = write_bytes(&dir, "twelve.wav", &wave_image(1, 8000, 12, &[0, 0]));
    assert!(matches!(assert_rejected(&path), SoundError::WavFormat { .. }));
}

#[test]
fn test_is_valid_agrees_with_decode() {
    let dir = tempdir().unwrap();
    let good = write_stereo_fixture(&dir);
    let mut truncated = fs::read(&good).unwrap();
    truncated.truncate(1000);
    let bad = write_bytes(&dir, "truncated.wav", &truncated);

    let decoder = WaveDecoder::new();
    for path in [&good, &bad] {
        assert_eq!(decoder.is_valid(path), decoder.decode(path).is_ok());
    }
}
