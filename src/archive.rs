use memmap2::Mmap;
use std::fs::File;
use std::io::{Cursor, Read, Seek};
use std::path::Path;
use zip::ZipArchive;

use crate::error::CheckError;
use crate::report::Aggregator;
use crate::rules::RuleSet;
use crate::verify::{self, join_rel};

/// Opens a jar/zip on disk and streams its class entries to the checker.
/// ZipArchive reads the central directory, so entry headers are not scanned
/// one by one.
pub fn visit_archive(
    path: &Path,
    rel_path: &str,
    rules: &RuleSet,
    stats: &Aggregator,
) -> Result<(), CheckError> {
    let display_path = path.display().to_string();
    let file = File::open(path).map_err(|source| CheckError::Io {
        path: display_path.clone(),
        source,
    })?;
    // SAFETY: The file is opened read-only and remains valid for the lifetime
    // of the mmap. The mmap is dropped before the file, ensuring memory safety.
    let mmap = unsafe { Mmap::map(&file) }.map_err(|source| CheckError::Io {
        path: display_path.clone(),
        source,
    })?;
    let archive =
        ZipArchive::new(Cursor::new(&mmap[..])).map_err(|source| CheckError::Archive {
            path: display_path.clone(),
            source,
        })?;

    visit_zip(&display_path, rel_path, archive, rules, stats)
}

/// Walks one open archive. Nested jars/zips are buffered fully in memory and
/// recursed into; a read or parse failure on a nested archive is fatal for the
/// run, wrapped with the `!/`-joined path of the offending entry.
fn visit_zip<R: Read + Seek>(
    zip_path: &str,
    zip_rel_path: &str,
    mut archive: ZipArchive<R>,
    rules: &RuleSet,
    stats: &Aggregator,
) -> Result<(), CheckError> {
    stats.record_archive();

    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|source| CheckError::Archive {
                path: zip_path.to_string(),
                source,
            })?;
        if entry.is_dir() {
            continue;
        }

        let name = entry.name().to_string();
        if name.ends_with(".zip") || name.ends_with(".jar") {
            let child_zip_path = format!("{zip_path}!/{name}");
            // The declared entry size is untrusted input, let the buffer grow
            // from what is actually read.
            let mut buffer = Vec::new();
            entry
                .read_to_end(&mut buffer)
                .map_err(|source| CheckError::Io {
                    path: child_zip_path.clone(),
                    source,
                })?;
            let nested =
                ZipArchive::new(Cursor::new(buffer)).map_err(|source| CheckError::Archive {
                    path: child_zip_path.clone(),
                    source,
                })?;
            visit_zip(
                &child_zip_path,
                &join_rel(zip_rel_path, "!/", &name),
                nested,
                rules,
                stats,
            )?;
        } else if verify::is_checkable_class(&name) {
            verify::check_class(&join_rel(zip_rel_path, "!/", &name), &mut entry, rules, stats);
        }
    }

    Ok(())
}
