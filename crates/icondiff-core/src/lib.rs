//! icondiff core: icon-sheet decoding, sprite compositing and diffing.
//!
//! An icon sheet is a PNG whose `Description` text chunk explains how the
//! image is cut into fixed-size cells and grouped into states. This crate
//! turns two versions of such a sheet into a list of per-sprite changes.
//!
//! # Pipeline
//!
//! - **Metadata**: [`metadata::parse_description`] parses the embedded text
//! - **Compositing**: [`compositor::extract_sprites`] slices the grid, stitches
//!   direction strips, assembles animations and deduplicates by fingerprint
//! - **Diffing**: [`diff::diff_sprites`] compares two sprite maps
//! - **Engine**: [`engine::generate_diff`] runs the whole thing for one file
//!
//! # Example
//!
//! ```no_run
//! use icondiff_core::{generate_diff, EncodeConfig, SheetDiff};
//!
//! let before = std::fs::read("before.dmi").unwrap();
//! let after = std::fs::read("after.dmi").unwrap();
//!
//! match generate_diff(Some(before.as_slice()), Some(after.as_slice()), &EncodeConfig::default()).unwrap() {
//!     SheetDiff::Changes(records) => {
//!         for record in records {
//!             println!("{}: {}", record.name, record.kind());
//!         }
//!     }
//!     SheetDiff::RenderFailed { side, reason } => eprintln!("{side} failed: {reason}"),
//! }
//! ```
//!
//! # Determinism
//!
//! Encoders use fixed settings, so byte-identical input always yields the same
//! fingerprints. Fingerprints are BLAKE3 digests of the encoded sprite bytes.

pub mod artifact;
pub mod compositor;
pub mod container;
pub mod diff;
pub mod encode;
pub mod engine;
pub mod error;
pub mod metadata;

pub use artifact::{SpriteArtifact, SpriteMap};
pub use compositor::{extract_sprites, RasterCursor};
pub use container::{read_sheet, SheetImage};
pub use diff::{diff_sprites, ChangeKind, DiffRecord};
pub use encode::{EncodeConfig, EncodeError};
pub use engine::{extract, generate_diff, load_sheet, SheetDiff, Side};
pub use error::{DecodeError, ParseError, ParseErrorKind, SheetError};
pub use metadata::{extract_description, parse_description, SheetDocument, StateSpec};
