//! CLI Command Implementations
//!
//! Each command decodes its input through the codec picked by file
//! extension, runs a transformation if it has one, and encodes the result.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::codec::wav::WAVE_EXTENSIONS;
use crate::codec::{decoder_for, encoder_for, WaveDecoder};
use crate::error::{Result, SoundError};
use crate::signal::{AudioSignal, AudioSignalMeta};
use crate::transform::{
    DropChannel, DuplicateChannel, SelectChannels, TimeTransformation, TransformationChain,
};

/// Printable description of a decoded file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalSummary {
    pub path: PathBuf,
    #[serde(flatten)]
    pub meta: AudioSignalMeta,
    pub frames: usize,
    pub duration_seconds: f64,
}

impl SignalSummary {
    pub fn new(path: &Path, signal: &AudioSignal) -> Self {
        Self {
            path: path.to_path_buf(),
            meta: *signal.meta(),
            frames: signal.num_frames(),
            duration_seconds: signal.duration(),
        }
    }
}

/// Outcome of validating a set of files
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub passed: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
}

impl ValidationReport {
    /// Number of files examined
    pub fn checked(&self) -> usize {
        self.passed.len() + self.failed.len()
    }

    pub fn all_passed(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Decode `path` with the decoder registered for its extension.
pub fn load_signal(path: &Path) -> Result<AudioSignal> {
    let decoder = decoder_for(path)
        .ok_or_else(|| SoundError::path(path, "no decoder for this file extension"))?;
    decoder.decode(path)
}

/// Encode `signal` to `path` with the encoder registered for its extension.
pub fn save_signal(signal: &AudioSignal, path: &Path) -> Result<()> {
    let encoder = encoder_for(path)
        .ok_or_else(|| SoundError::path(path, "no encoder for this file extension"))?;
    encoder.encode(signal, path)
}

/// Print metadata of an audio file.
pub fn info(path: &Path, json: bool) -> Result<()> {
    info!("Inspecting: {}", path.display());

    let signal = load_signal(path)?;
    let summary = SignalSummary::new(path, &signal);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("File: {}", summary.path.display());
    println!("Sampling rate: {} Hz", summary.meta.sampling_rate());
    println!("Channels: {}", summary.meta.channels());
    println!("Bits per sample: {}", summary.meta.bits_per_sample());
    println!("Frames: {}", summary.frames);
    println!("Duration: {:.3} s", summary.duration_seconds);

    Ok(())
}

/// Validate files; directories are searched recursively for WAVE files.
///
/// Failing files are reported, not returned as errors.
pub fn validate(paths: &[PathBuf]) -> Result<ValidationReport> {
    let decoder = WaveDecoder::new();
    let mut report = ValidationReport::default();

    for file in collect_files(paths, &mut report) {
        match decoder.validate(&file) {
            Ok(_) => {
                println!("OK    {}", file.display());
                report.passed.push(file);
            }
            Err(e) => {
                println!("FAIL  {}: {}", file.display(), e);
                report.failed.push((file, e.to_string()));
            }
        }
    }

    println!(
        "{} checked, {} passed, {} failed",
        report.checked(),
        report.passed.len(),
        report.failed.len()
    );

    Ok(report)
}

fn collect_files(paths: &[PathBuf], report: &mut ValidationReport) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for path in paths {
        if !path.is_dir() {
            files.push(path.clone());
            continue;
        }

        debug!("Searching directory: {}", path.display());
        for entry in WalkDir::new(path).sort_by_file_name() {
            match entry {
                Ok(entry) if entry.file_type().is_file() && has_wave_extension(entry.path()) => {
                    files.push(entry.into_path());
                }
                Ok(_) => {}
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    let failed = e.path().unwrap_or(path.as_path()).to_path_buf();
                    report.failed.push((failed, e.to_string()));
                }
            }
        }
    }

    files
}

fn has_wave_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| WAVE_EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)))
}

/// Remove one channel.
pub fn drop_channel(input: &Path, output: &Path, channel: i64) -> Result<()> {
    info!("Dropping channel {} of {}", channel, input.display());

    let signal = load_signal(input)?;
    let channel = channel_index(channel, signal.num_channels())?;

    apply(&DropChannel::new(channel), &signal, output)
}

/// Copy one channel to a new position.
pub fn duplicate_channel(input: &Path, output: &Path, source: i64, position: i64) -> Result<()> {
    info!(
        "Duplicating channel {} of {} to position {}",
        source,
        input.display(),
        position
    );

    let signal = load_signal(input)?;
    let channels = signal.num_channels();
    let position = usize::try_from(position)
        .map_err(|_| SoundError::PositionOutOfRange { position, channels })?;
    let source = channel_index(source, channels)?;

    apply(&DuplicateChannel::new(source, position), &signal, output)
}

/// Keep only the listed channels.
pub fn select_channels(input: &Path, output: &Path, channels: &[i64]) -> Result<()> {
    info!("Selecting channels {:?} of {}", channels, input.display());

    let signal = load_signal(input)?;
    let indices = channels
        .iter()
        .map(|&c| channel_index(c, signal.num_channels()))
        .collect::<Result<Vec<_>>>()?;

    apply(&SelectChannels::new(indices), &signal, output)
}

/// Decode and encode a file without changes.
pub fn reencode(input: &Path, output: &Path) -> Result<()> {
    info!("Re-encoding {}", input.display());

    let signal = load_signal(input)?;
    apply(&TransformationChain::new(), &signal, output)
}

fn apply(
    transformation: &dyn TimeTransformation,
    signal: &AudioSignal,
    output: &Path,
) -> Result<()> {
    let result = transformation.transform(signal)?;
    save_signal(&result, output)?;

    println!("Applied: {}", transformation.identification());
    println!(
        "Wrote {} ({} channels, {} frames)",
        output.display(),
        result.num_channels(),
        result.num_frames()
    );

    Ok(())
}

/// Negative indices are reported as out of range.
fn channel_index(channel: i64, channels: u16) -> Result<usize> {
    usize::try_from(channel).map_err(|_| SoundError::ChannelOutOfRange { channel, channels })
}
