use anyhow::Result;
use clap::Parser;
use class_verifier::checker::check_class_versions;
use class_verifier::cli::{Cli, OutputFormat};
use class_verifier::config::resolve_rules;
use class_verifier::report::CheckSummary;
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = resolve_rules(&cli)?;
    let summary = check_class_versions(&config, &cli.root)?;
    write_summary(&summary, cli.format, cli.output.as_deref())?;
    Ok(())
}

fn write_summary(summary: &CheckSummary, format: OutputFormat, output: Option<&Path>) -> Result<()> {
    let content = match format {
        OutputFormat::Json => serde_json::to_string_pretty(summary)?,
        OutputFormat::Text => {
            let mut out = String::new();
            out.push_str(&format!("root: {}\n", summary.root));
            out.push_str(&format!("rules: {}\n", summary.rule_count));
            out.push_str(&format!("classes_checked: {}\n", summary.classes_checked));
            out.push_str(&format!("archives_checked: {}\n", summary.archives_checked));
            out.push_str(&format!("duration_ms: {}\n", summary.duration_ms));
            out
        }
    };

    if let Some(path) = output {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)?;
    } else {
        print!("{content}");
        if !content.ends_with('\n') {
            println!();
        }
    }

    Ok(())
}
