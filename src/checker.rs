use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;

use crate::error::CheckError;
use crate::report::{Aggregator, CheckSummary};
use crate::rules::RuleSet;
use crate::walk;

/// Runs a full class version check.
///
/// `config` maps relative path prefixes to Java version limits (`""` = no
/// limit) and must contain the empty-prefix default entry, e.g.
/// `{"": "1.8", "lib/idea_rt.jar": "1.3"}`. `root` may be a directory, a
/// single class file or a jar/zip archive.
///
/// Succeeds silently with a [`CheckSummary`]; otherwise returns exactly one
/// of the fatal outcomes: invalid configuration, no classes found, an
/// aggregated violation report, or unused rule prefixes.
pub fn check_class_versions(
    config: &BTreeMap<String, String>,
    root: &Path,
) -> Result<CheckSummary, CheckError> {
    let span = tracing::info_span!(
        "check_class_versions",
        rule_count = config.len(),
        root = %root.display(),
    );
    let _guard = span.enter();
    let start = Instant::now();

    let rules = RuleSet::from_config(config)?;
    let stats = Aggregator::new();
    walk::visit_root(root, &rules, &stats)?;

    if stats.classes_checked() == 0 {
        return Err(CheckError::NoClassesFound {
            root: root.to_path_buf(),
        });
    }

    let violations = stats.take_violations();
    tracing::info!(
        classes_checked = stats.classes_checked(),
        archives_checked = stats.archives_checked(),
        violation_count = violations.len(),
        "class version check finished"
    );

    if !violations.is_empty() {
        return Err(CheckError::Violations {
            count: violations.len(),
            report: violations.join("\n---\n"),
        });
    }

    let unused = rules.unused_prefixes();
    if !unused.is_empty() {
        return Err(CheckError::UnusedRules { prefixes: unused });
    }

    Ok(CheckSummary {
        root: root.to_string_lossy().to_string(),
        rule_count: rules.len(),
        classes_checked: stats.classes_checked(),
        archives_checked: stats.archives_checked(),
        duration_ms: start.elapsed().as_millis() as u64,
    })
}
