use std::io::Read;

use crate::header::{self, HeaderCheck};
use crate::report::Aggregator;
use crate::rules::RuleSet;

/// Checks one class entry: parses the header, matches the rule table and
/// records any violation. Always counts the class, malformed input included.
pub fn check_class(rel_path: &str, reader: &mut impl Read, rules: &RuleSet, stats: &Aggregator) {
    stats.record_class();

    let major = match header::parse_class_header(reader) {
        HeaderCheck::Valid(major) => major,
        HeaderCheck::InvalidHeader => {
            stats.record_violation(format!("{rel_path}: invalid .class file header"));
            return;
        }
        HeaderCheck::SuspiciousVersion(major) => {
            stats.record_violation(format!(
                "{rel_path}: suspicious .class file version: {major}"
            ));
            return;
        }
    };

    let rule = rules.match_path(rel_path);
    rule.mark_matched();
    if let Some(expected) = rule.max_major
        && major > expected
    {
        stats.record_violation(format!(
            "{rel_path}: .class file version {major} exceeds expected {expected}"
        ));
    }
}

/// Class entries that take part in the check: plain `.class` files, excluding
/// module descriptors and multi-release variants.
pub fn is_checkable_class(path: &str) -> bool {
    path.ends_with(".class") && !path.ends_with("module-info.class") && !is_multi_release(path)
}

/// Multi-release jar variants (`META-INF/versions/<N>/...`) carry alternate
/// class bodies for newer JDKs and are exempt from the baseline check.
pub fn is_multi_release(path: &str) -> bool {
    path.starts_with("META-INF/versions/")
        || path.contains("/META-INF/versions/")
        || (cfg!(windows) && path.contains("\\META-INF\\versions\\"))
}

/// Joins relative path segments, leaving a bare suffix when the prefix is
/// empty so root-level entries don't pick up a leading separator.
pub fn join_rel(prefix: &str, separator: &str, suffix: &str) -> String {
    if prefix.is_empty() {
        suffix.to_string()
    } else {
        format!("{prefix}{separator}{suffix}")
    }
}
