//! CLI Module
//!
//! Command-line interface for the soundproc binary.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Soundproc - inspect, validate and edit PCM WAVE files
#[derive(Parser, Debug)]
#[command(name = "soundproc")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the metadata of an audio file
    #[command(name = "info")]
    Info {
        /// Audio file to inspect
        path: PathBuf,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that files are well-formed (directories are searched recursively)
    #[command(name = "validate")]
    Validate {
        /// Files or directories to check
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Remove one channel
    #[command(name = "drop-channel")]
    DropChannel {
        /// Source audio file
        input: PathBuf,

        /// Destination audio file
        output: PathBuf,

        /// Index of the channel to remove
        #[arg(short, long, allow_negative_numbers = true)]
        channel: i64,
    },

    /// Copy one channel to a new position
    #[command(name = "duplicate-channel")]
    DuplicateChannel {
        /// Source audio file
        input: PathBuf,

        /// Destination audio file
        output: PathBuf,

        /// Index of the channel to copy
        #[arg(short, long, allow_negative_numbers = true)]
        source: i64,

        /// Index the copy is inserted before
        #[arg(short, long, allow_negative_numbers = true)]
        position: i64,
    },

    /// Keep only the listed channels, in the listed order
    #[command(name = "select-channels")]
    SelectChannels {
        /// Source audio file
        input: PathBuf,

        /// Destination audio file
        output: PathBuf,

        /// Comma-separated channel indices
        #[arg(short, long, required = true)]
        #[arg(value_delimiter = ',', allow_negative_numbers = true)]
        channels: Vec<i64>,
    },

    /// Decode and re-encode a file unchanged
    #[command(name = "reencode")]
    Reencode {
        /// Source audio file
        input: PathBuf,

        /// Destination audio file
        output: PathBuf,
    },
}
