use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::CheckError;

/// A single version limit: a relative path prefix and the highest allowed
/// class file major version. `max_major == None` means the rule always passes.
pub struct Rule {
    pub prefix: String,
    pub max_major: Option<u8>,
    matched: AtomicBool,
}

impl Rule {
    pub fn mark_matched(&self) {
        // Racy writes from sibling workers are fine, the flag only ever
        // transitions false -> true.
        self.matched.store(true, Ordering::Relaxed);
    }

    pub fn was_matched(&self) -> bool {
        self.matched.load(Ordering::Relaxed)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("prefix", &self.prefix)
            .field("max_major", &self.max_major)
            .field("matched", &self.was_matched())
            .finish()
    }
}

/// Ordered rule table: longest prefix first, the mandatory empty-prefix
/// default rule last.
#[derive(Debug)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Builds the table from a `prefix -> version string` mapping.
    ///
    /// Version strings follow the Java convention: `"8"` and `"1.8"` both mean
    /// feature release 8 (class file major 52), an empty string means no limit.
    pub fn from_config(config: &BTreeMap<String, String>) -> Result<Self, CheckError> {
        let mut rules = Vec::with_capacity(config.len());
        for (prefix, version) in config {
            let max_major = parse_version_limit(version).map_err(|_| {
                CheckError::InvalidVersionLimit {
                    prefix: prefix.clone(),
                    value: version.clone(),
                }
            })?;
            rules.push(Rule {
                prefix: prefix.clone(),
                max_major,
                matched: AtomicBool::new(false),
            });
        }

        rules.sort_by(|a, b| b.prefix.len().cmp(&a.prefix.len()));
        if rules.last().is_none_or(|r| !r.prefix.is_empty()) {
            return Err(CheckError::MissingDefaultRule);
        }
        Ok(Self { rules })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// First rule whose prefix matches the given relative path. The table is
    /// sorted by descending prefix length, so the most specific rule wins, and
    /// the default rule at the end matches everything.
    pub fn match_path(&self, path: &str) -> &Rule {
        for rule in &self.rules {
            if rule.prefix.is_empty() || path.starts_with(rule.prefix.as_str()) {
                return rule;
            }
        }
        // Unreachable while the default-rule invariant holds.
        &self.rules[self.rules.len() - 1]
    }

    /// Prefixes of non-default rules that never matched a file.
    pub fn unused_prefixes(&self) -> Vec<String> {
        self.rules
            .iter()
            .filter(|r| !r.prefix.is_empty() && !r.was_matched())
            .map(|r| r.prefix.clone())
            .collect()
    }
}

/// Maps a Java version string to a class file major version byte.
///
/// Feature release `v` corresponds to major `v + 44` (so `"1.1"` is 45).
/// An empty string means unbounded. Returns `Err(())` for anything that does
/// not parse or does not fit the major version byte.
pub fn parse_version_limit(version: &str) -> Result<Option<u8>, ()> {
    let version = version.trim();
    if version.is_empty() {
        return Ok(None);
    }

    let feature = version.strip_prefix("1.").unwrap_or(version);
    let feature: u32 = feature.parse().map_err(|_| ())?;
    if feature == 0 {
        return Err(());
    }
    let major = feature.checked_add(44).ok_or(())?;
    u8::try_from(major).map(Some).map_err(|_| ())
}
