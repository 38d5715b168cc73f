//! CLI Module
//!
//! Command-line interface for encoding audio files through a silk worker.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// silkworker - encode audio to SILK on a background worker
#[derive(Parser, Debug)]
#[command(name = "silkworker")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// JSON config file (defaults and SILKWORKER_* env vars otherwise)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Encode a single WAV or raw PCM file
    #[command(name = "encode")]
    Encode {
        /// Input audio file
        input: PathBuf,

        /// Output path (default: input with a .silk extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Sample rate of raw PCM input
        #[arg(short = 'r', long, default_value_t = 24000)]
        sample_rate: u32,

        /// Use the mock encoder
        #[arg(long)]
        mock: bool,
    },

    /// Encode every .wav and .pcm file under a directory
    #[command(name = "batch")]
    Batch {
        /// Directory to scan
        dir: PathBuf,

        /// Sample rate of raw PCM inputs
        #[arg(short = 'r', long, default_value_t = 24000)]
        sample_rate: u32,

        /// Use the mock encoder
        #[arg(long)]
        mock: bool,
    },
}
