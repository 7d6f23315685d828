//! CLI argument definitions for the icondiff command-line interface.
//!
//! All `#[derive(Parser)]` and `#[derive(Subcommand)]` types are defined here,
//! keeping `main.rs` focused on dispatch logic.

use clap::{Args, Parser, Subcommand, ValueEnum};
use icondiff_core::EncodeConfig;

/// icondiff - Sprite-level diffs for icon sheets
#[derive(Parser)]
#[command(name = "icondiff")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub(crate) struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit log records as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Compare two versions of one icon sheet
    Compare {
        /// Path to the old sheet (omit for an added file)
        #[arg(short, long)]
        before: Option<String>,

        /// Path to the new sheet (omit for a removed file)
        #[arg(short, long)]
        after: Option<String>,

        /// Display name for the report (default: file name)
        #[arg(short, long)]
        name: Option<String>,

        /// Directory to write sprite artifacts into
        #[arg(short, long)]
        out: Option<String>,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        encode: EncodeArgs,
    },

    /// Compare every icon sheet in two directory trees
    CompareDirs {
        /// Root of the old tree
        #[arg(short, long)]
        before: String,

        /// Root of the new tree
        #[arg(short, long)]
        after: String,

        /// Directory to write sprite artifacts into
        #[arg(short, long)]
        out: Option<String>,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        encode: EncodeArgs,
    },

    /// Print the parsed description and sprites of one sheet
    Inspect {
        /// Path to the sheet
        #[arg(short, long)]
        input: String,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        encode: EncodeArgs,
    },
}

/// PNG compression preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum CompressionArg {
    Fast,
    Default,
    Best,
}

/// Sprite encoder flags shared by every command.
#[derive(Debug, Clone, Args)]
pub(crate) struct EncodeArgs {
    /// PNG compression preset
    #[arg(long, value_enum, default_value_t = CompressionArg::Default)]
    pub compression: CompressionArg,

    /// GIF quantization speed (1 = best quality, 30 = fastest)
    #[arg(long, value_parser = clap::value_parser!(i32).range(1..=30))]
    pub gif_speed: Option<i32>,
}

impl EncodeArgs {
    pub fn to_config(&self) -> EncodeConfig {
        let config = match self.compression {
            CompressionArg::Fast => EncodeConfig::fast(),
            CompressionArg::Default => EncodeConfig::default(),
            CompressionArg::Best => EncodeConfig::best_compression(),
        };
        match self.gif_speed {
            Some(speed) => config.with_gif_speed(speed),
            None => config,
        }
    }
}
