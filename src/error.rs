use std::path::PathBuf;
use thiserror::Error;

/// Fatal outcomes of a check run. Per-class problems (bad header, version
/// exceeded) are not represented here individually; they are collected during
/// traversal and surface together as a single [`CheckError::Violations`].
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("invalid configuration: missing default version rule (empty path prefix)")]
    MissingDefaultRule,

    #[error("invalid configuration: cannot parse version limit {value:?} for prefix {prefix:?}")]
    InvalidVersionLimit { prefix: String, value: String },

    #[error("no classes found under {} - please check the configuration", .root.display())]
    NoClassesFound { root: PathBuf },

    #[error("failed with {count} problems:\n{report}")]
    Violations { count: usize, report: String },

    #[error(
        "class version rules for the following paths don't match any files, \
         the entries are probably out of date:\n{}",
        .prefixes.join("\n")
    )]
    UnusedRules { prefixes: Vec<String> },

    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read archive {path}: {source}")]
    Archive {
        path: String,
        #[source]
        source: zip::result::ZipError,
    },
}
