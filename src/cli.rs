use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "class-verifier")]
#[command(
    about = "Check Java class file versions in directories and jar archives against per-path rules"
)]
pub struct Cli {
    /// Directory, .class file or .jar/.zip archive to check
    pub root: PathBuf,

    /// JSON rules file mapping path prefixes to version limits,
    /// e.g. {"": "1.8", "lib/idea_rt.jar": "1.3"}
    #[arg(long, value_name = "FILE")]
    pub rules: Option<PathBuf>,

    /// Extra rule in PREFIX=VERSION form, overrides the rules file;
    /// use "=VERSION" for the default (empty prefix) rule
    #[arg(short = 'r', long = "rule", value_name = "PREFIX=VERSION")]
    pub rule: Vec<String>,

    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}
