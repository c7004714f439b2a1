// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Source file discovery.

use camino::{Utf8Path, Utf8PathBuf};
use miette::{Context, IntoDiagnostic, Result};
use std::fs;

/// Extension of minisql source files.
pub const SOURCE_EXTENSION: &str = "sql";

/// Find the source files named by `path`.
///
/// A file must have the `.sql` extension. A directory is searched
/// recursively. Results are sorted so reports are stable across platforms.
pub fn find_source_files(path: &Utf8Path) -> Result<Vec<Utf8PathBuf>> {
    let mut files = Vec::new();

    if path.is_file() {
        if path.extension() == Some(SOURCE_EXTENSION) {
            files.push(path.to_path_buf());
        } else {
            miette::bail!("File '{}' is not a .sql source file", path);
        }
    } else if path.is_dir() {
        collect_sql_files_recursive(path, &mut files)?;
        files.sort();
    } else {
        miette::bail!("Path '{}' does not exist", path);
    }

    Ok(files)
}

/// The directory holding `minisql.toml` for `path`: the path itself for a
/// directory, otherwise its parent.
pub fn project_root(path: &Utf8Path) -> Utf8PathBuf {
    if path.is_dir() {
        path.to_path_buf()
    } else {
        path.parent()
            .filter(|p| !p.as_str().is_empty())
            .map_or_else(|| Utf8PathBuf::from("."), Utf8Path::to_path_buf)
    }
}

/// Recursively collect all `.sql` files from a directory tree.
///
/// Symlinks are skipped to avoid potential infinite recursion from circular links.
fn collect_sql_files_recursive(dir: &Utf8Path, files: &mut Vec<Utf8PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to read directory '{dir}'"))?
    {
        let entry = entry.into_diagnostic()?;
        let file_type = entry.file_type().into_diagnostic()?;
        if file_type.is_symlink() {
            continue;
        }
        let entry_path = Utf8PathBuf::from_path_buf(entry.path())
            .map_err(|_| miette::miette!("Non-UTF-8 path"))?;

        if file_type.is_dir() {
            collect_sql_files_recursive(&entry_path, files)?;
        } else if file_type.is_file() && entry_path.extension() == Some(SOURCE_EXTENSION) {
            files.push(entry_path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn root(temp: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap()
    }

    #[test]
    fn directory_is_searched_recursively_and_sorted() {
        let temp = TempDir::new().unwrap();
        let root = root(&temp);
        fs::create_dir_all(root.join("nested/deeper")).unwrap();
        fs::write(root.join("b.sql"), "").unwrap();
        fs::write(root.join("a.sql"), "").unwrap();
        fs::write(root.join("notes.txt"), "").unwrap();
        fs::write(root.join("nested/deeper/c.sql"), "").unwrap();

        let files = find_source_files(&root).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|f| f.strip_prefix(&root).unwrap().as_str().replace('\\', "/"))
            .collect();
        assert_eq!(names, vec!["a.sql", "b.sql", "nested/deeper/c.sql"]);
    }

    #[test]
    fn single_file_must_be_sql() {
        let temp = TempDir::new().unwrap();
        let root = root(&temp);
        fs::write(root.join("q.sql"), "").unwrap();
        fs::write(root.join("q.txt"), "").unwrap();

        assert_eq!(
            find_source_files(&root.join("q.sql")).unwrap(),
            vec![root.join("q.sql")]
        );
        let err = find_source_files(&root.join("q.txt")).unwrap_err();
        assert!(err.to_string().contains("is not a .sql source file"));
    }

    #[test]
    fn missing_path_is_an_error() {
        let temp = TempDir::new().unwrap();
        let err = find_source_files(&root(&temp).join("nope")).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn project_root_of_file_is_its_directory() {
        let temp = TempDir::new().unwrap();
        let root = root(&temp);
        fs::write(root.join("q.sql"), "").unwrap();
        assert_eq!(project_root(&root.join("q.sql")), root);
        assert_eq!(project_root(&root), root);
        assert_eq!(project_root(Utf8Path::new("q.sql")), Utf8PathBuf::from("."));
    }
}
