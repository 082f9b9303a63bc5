use rayon::prelude::*;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::archive;
use crate::error::CheckError;
use crate::report::Aggregator;
use crate::rules::RuleSet;
use crate::verify::{self, join_rel};

/// Entry point of the traversal: a directory is walked recursively, anything
/// else is treated as a single file (class or archive).
pub fn visit_root(root: &Path, rules: &RuleSet, stats: &Aggregator) -> Result<(), CheckError> {
    if root.is_dir() {
        visit_directory(root, "", rules, stats)
    } else {
        visit_file(root, "", rules, stats)
    }
}

/// Fans out one rayon task per child entry and joins them here. Subtrees have
/// no data dependency on each other, so sibling order is unspecified; the
/// shared aggregator absorbs results from all workers.
fn visit_directory(
    directory: &Path,
    rel_path: &str,
    rules: &RuleSet,
    stats: &Aggregator,
) -> Result<(), CheckError> {
    let read_dir = std::fs::read_dir(directory).map_err(|source| CheckError::Io {
        path: directory.display().to_string(),
        source,
    })?;

    let mut children = Vec::new();
    for entry in read_dir {
        let entry = entry.map_err(|source| CheckError::Io {
            path: directory.display().to_string(),
            source,
        })?;
        children.push(entry.path());
    }

    children.par_iter().try_for_each(|child| {
        let name = child
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let child_rel = join_rel(rel_path, "/", &name);
        if child.is_dir() {
            visit_directory(child, &child_rel, rules, stats)
        } else {
            visit_file(child, &child_rel, rules, stats)
        }
    })
}

fn visit_file(
    file: &Path,
    rel_path: &str,
    rules: &RuleSet,
    stats: &Aggregator,
) -> Result<(), CheckError> {
    let full_path = file.to_string_lossy();
    if full_path.ends_with(".zip") || full_path.ends_with(".jar") {
        archive::visit_archive(file, rel_path, rules, stats)
    } else if verify::is_checkable_class(&full_path) {
        let handle = File::open(file).map_err(|source| CheckError::Io {
            path: file.display().to_string(),
            source,
        })?;
        verify::check_class(rel_path, &mut BufReader::new(handle), rules, stats);
        Ok(())
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_dir(name: &str) -> PathBuf {
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

    fn rules(entries: &[(&str, &str)]) -> RuleSet {
        let config: BTreeMap<String, String> = entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        RuleSet::from_config(&config).unwrap()
    }

    fn class_bytes(major: u8) -> Vec<u8> {
        vec![0xCA, 0xFE, 0xBA, 0xBE, 0x00, 0x00, 0x00, major]
    }

    fn write_class(path: &Path, major: u8) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, class_bytes(major)).unwrap();
    }

    #[test]
    fn directory_tree_is_visited_recursively() {
        let base = temp_dir("walk_tree");
        write_class(&base.join("app/Main.class"), 52);
        write_class(&base.join("lib/deep/nested/Util.class"), 52);
        std::fs::write(base.join("app/readme.txt"), "not a class").unwrap();

        let rules = rules(&[("", "8")]);
        let stats = Aggregator::new();
        visit_root(&base, &rules, &stats).unwrap();

        assert_eq!(stats.classes_checked(), 2);
        assert!(stats.take_violations().is_empty());

        let _ = std::fs::remove_dir_all(base);
    }

    #[test]
    fn relative_paths_drive_rule_matching() {
        let base = temp_dir("walk_rel");
        write_class(&base.join("app/Main.class"), 52);
        write_class(&base.join("lib/Old.class"), 61);

        let rules = rules(&[("", "17"), ("lib/", "8")]);
        let stats = Aggregator::new();
        visit_root(&base, &rules, &stats).unwrap();

        let violations = stats.take_violations();
        assert_eq!(violations.len(), 1);
        assert!(violations[0].starts_with("lib/Old.class"));

        let _ = std::fs::remove_dir_all(base);
    }

    #[test]
    fn single_class_file_root_is_checked_directly() {
        let base = temp_dir("walk_single");
        let class = base.join("Solo.class");
        write_class(&class, 61);

        let rules = rules(&[("", "8")]);
        let stats = Aggregator::new();
        visit_root(&class, &rules, &stats).unwrap();

        assert_eq!(stats.classes_checked(), 1);
        assert_eq!(stats.take_violations().len(), 1);

        let _ = std::fs::remove_dir_all(base);
    }

    #[test]
    fn missing_root_is_an_io_error() {
        let rules = rules(&[("", "8")]);
        let stats = Aggregator::new();
        let missing = temp_dir("walk_missing").join("nope.class");
        let err = visit_root(&missing, &rules, &stats).unwrap_err();
        assert!(matches!(err, CheckError::Io { .. }));
    }
}
