//! # class-verifier
//!
//! Recursively checks `.class` files in directories and `.jar`/`.zip` archives
//! (nested archives included) against per-path-prefix class file version
//! limits.
//!
//! ## Architecture
//!
//! - **rules**: Ordered rule table with longest-prefix matching and the
//!   Java-version-to-major-byte mapping
//! - **walk**: Parallel directory traversal, one rayon task per child entry
//! - **archive**: Jar/zip visiting via the central directory, with in-memory
//!   recursion into nested archives
//! - **header**: Fixed-format class file header parsing (magic + major byte)
//! - **verify**: Per-class rule matching and violation recording
//! - **report**: Concurrency-safe counters and violation aggregation
//! - **checker**: Run orchestration and finalization into a single outcome
//! - **config**: Rules file / inline rule resolution for the CLI
//! - **cli**: Command line definition

pub mod archive;
pub mod checker;
pub mod cli;
pub mod config;
pub mod error;
pub mod header;
pub mod report;
pub mod rules;
pub mod verify;
pub mod walk;

pub use checker::check_class_versions;
pub use error::CheckError;
pub use report::CheckSummary;
