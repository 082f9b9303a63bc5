use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};

use crate::cli::Cli;

/// Builds the effective rule configuration for a run: the rules file (if any)
/// first, then `--rule PREFIX=VERSION` overrides on top.
pub fn resolve_rules(cli: &Cli) -> Result<BTreeMap<String, String>> {
    let mut config = match resolve_rules_path(cli)? {
        Some(path) => load_rules_file(&path)?,
        None => BTreeMap::new(),
    };

    for spec in &cli.rule {
        let (prefix, version) = spec
            .split_once('=')
            .with_context(|| format!("Invalid --rule value (expected PREFIX=VERSION): {spec}"))?;
        config.insert(prefix.to_string(), version.to_string());
    }

    if config.is_empty() {
        anyhow::bail!(
            "No rules configured. Pass --rules FILE or at least one --rule PREFIX=VERSION \
             (the empty-prefix default rule is required, e.g. -r =1.8)"
        );
    }
    Ok(config)
}

pub fn load_rules_file(path: &Path) -> Result<BTreeMap<String, String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read rules file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse rules file as a JSON object: {}", path.display()))
}

/// Resolution order: `--rules` flag, `CLASS_VERIFIER_RULES` env var, then
/// `~/.class-verifier/rules.json` when it exists.
fn resolve_rules_path(cli: &Cli) -> Result<Option<PathBuf>> {
    if let Some(p) = cli.rules.clone() {
        return Ok(Some(p));
    }

    if let Ok(p) = env::var("CLASS_VERIFIER_RULES") {
        return Ok(Some(PathBuf::from(p)));
    }

    let default_path = class_verifier_home()?.join("rules.json");
    if default_path.exists() {
        return Ok(Some(default_path));
    }
    Ok(None)
}

fn class_verifier_home() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Failed to resolve home directory"))?;
    Ok(home.join(".class-verifier"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!(
            "class_verifier_test_{}_{}_{}",
            std::process::id(),
            nanos,
            name
        ))
    }

    #[test]
    fn inline_rules_override_the_file() {
        let rules_file = temp_path("rules.json");
        std::fs::write(&rules_file, r#"{"": "1.8", "lib/": "11"}"#).unwrap();

        let cli = Cli::parse_from([
            "class-verifier",
            "--rules",
            rules_file.to_string_lossy().as_ref(),
            "-r",
            "lib/=17",
            "/tmp/root",
        ]);

        let config = resolve_rules(&cli).unwrap();
        assert_eq!(config.get(""), Some(&"1.8".to_string()));
        assert_eq!(config.get("lib/"), Some(&"17".to_string()));

        let _ = std::fs::remove_file(rules_file);
    }

    #[test]
    fn default_rule_can_be_given_inline() {
        let cli = Cli::parse_from(["class-verifier", "-r", "=1.8", "/tmp/root"]);
        let config = resolve_rules(&cli).unwrap();
        assert_eq!(config.get(""), Some(&"1.8".to_string()));
    }

    #[test]
    fn malformed_inline_rule_is_rejected() {
        let cli = Cli::parse_from(["class-verifier", "-r", "no-equals-sign", "/tmp/root"]);
        assert!(resolve_rules(&cli).is_err());
    }

    #[test]
    fn missing_rules_file_is_an_error() {
        let cli = Cli::parse_from([
            "class-verifier",
            "--rules",
            "/definitely/not/here/rules.json",
            "/tmp/root",
        ]);
        assert!(resolve_rules(&cli).is_err());
    }
}
