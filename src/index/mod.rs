//! Markdown index of a notes directory.
//!
//! Given a base directory, [`make_index`] writes `README.md` with one section
//! per immediate subdirectory and one link per file inside it:
//!
//! ```text
//! # INDEX
//!
//! ## docs
//!
//! - [a.md](./docs/a.md)
//! - [b c.md](./docs/b%20c.md)
//!
//! ## src
//!
//! - [z.py](./src/z.py)
//!
//! ```
//!
//! Subdirectories whose name starts with `.` are skipped. Only one level is
//! listed; files in the base itself and deeper subdirectories are ignored.
//! Both levels are sorted by name.

pub mod markdown;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::Error;

use self::markdown::{heading, link, list_item};

/// Name of the file [`make_index`] writes.
pub const INDEX_FILE: &str = "README.md";

/// What one run of [`write_index`] covered.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct IndexSummary {
    pub sections: usize,
    pub skipped: usize,
    pub files: usize,
}

/// Writes `base/README.md`, replacing any existing file, and returns its path.
///
/// Not atomic: a failure midway leaves a truncated file behind.
pub fn make_index(base: &Path) -> Result<PathBuf, Error> {
    let readme = base.join(INDEX_FILE);
    let mut out = BufWriter::new(File::create(&readme)?);

    let summary = write_index(base, &mut out)?;
    out.flush()?;

    info!(
        path = %readme.display(),
        sections = summary.sections,
        skipped = summary.skipped,
        files = summary.files,
        "wrote index",
    );
    Ok(readme)
}

/// Writes the index of `base` to `out`.
pub fn write_index<W: Write>(base: &Path, out: &mut W) -> Result<IndexSummary, Error> {
    let dirs = children(base, Path::is_dir)?;
    let mut summary = IndexSummary::default();

    write!(out, "{}\n\n", heading("INDEX", 1))?;

    for dir in dirs {
        let dir_name = file_name(&dir);
        if is_hidden(&dir_name) {
            debug!(dir = %dir_name, "skipping hidden directory");
            summary.skipped += 1;
            continue;
        }

        write!(out, "{}\n\n", heading(&dir_name, 2))?;

        let files = children(&dir, Path::is_file)?;
        for file in &files {
            let name = file_name(file);
            let target = format!("./{dir_name}/{name}");
            writeln!(out, "{}", list_item(&link(&name, &target)))?;
        }
        writeln!(out)?;

        debug!(dir = %dir_name, files = files.len(), "indexed directory");
        summary.sections += 1;
        summary.files += files.len();
    }

    Ok(summary)
}

/// Whether a directory name is dot-prefixed.
pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// Immediate children of `dir` that pass `keep`, sorted by file name.
///
/// `keep` sees the path, so symlinks are classified by their target and a
/// dangling link is kept by neither `is_dir` nor `is_file`.
fn children(dir: &Path, keep: fn(&Path) -> bool) -> Result<Vec<PathBuf>, Error> {
    let mut kept = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry?;
        if keep(entry.path()) {
            kept.push(entry.into_path());
        }
    }
    Ok(kept)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
