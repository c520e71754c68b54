//! Bundle-size budget: find the build artifact by glob and compare its size.

use crate::errors::{ScoreGateError, ScoreGateResult};
use globset::{Glob, GlobMatcher};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BundleCheck {
    /// Matched file, relative to the artifact directory.
    pub artifact: PathBuf,
    pub pattern: String,
    pub bytes: u64,
    pub actual_kb: f64,
    pub max_kb: f64,
    pub within_budget: bool,
}

impl BundleCheck {
    /// Kilobytes over budget; zero when within budget.
    pub fn overage_kb(&self) -> f64 {
        (self.actual_kb - self.max_kb).max(0.0)
    }
}

/// Locate the file matching `pattern` under `artifact_dir` and compare its
/// size with `max_kb` (1 KB = 1024 bytes).
///
/// A pattern containing `/` is matched against the slash-separated path
/// relative to `artifact_dir`; otherwise against the file name. When several
/// files match, the largest one is judged.
pub fn check_bundle_size(
    artifact_dir: &Path,
    max_kb: f64,
    pattern: &str,
) -> ScoreGateResult<BundleCheck> {
    let matcher: GlobMatcher = Glob::new(pattern)
        .map_err(|e| ScoreGateError::config(format!("invalid artifact pattern `{pattern}`: {e}")))?
        .compile_matcher();
    let match_path = pattern.contains('/');

    if !artifact_dir.is_dir() {
        return Err(ScoreGateError::ArtifactNotFound {
            dir: artifact_dir.to_path_buf(),
            pattern: pattern.to_string(),
            detail: Some("artifact directory does not exist".to_string()),
        });
    }

    let mut files = Vec::new();
    collect_files_recursive(artifact_dir, &mut files)?;

    let mut matches: Vec<(PathBuf, u64)> = Vec::new();
    for path in files {
        let rel = path.strip_prefix(artifact_dir).unwrap_or(&path).to_path_buf();
        let hit = if match_path {
            matcher.is_match(slash_path(&rel))
        } else {
            rel.file_name().is_some_and(|n| matcher.is_match(n))
        };
        if !hit {
            continue;
        }
        let bytes = std::fs::metadata(&path)
            .map_err(|e| ScoreGateError::io(&path, e))?
            .len();
        matches.push((rel, bytes));
    }

    if matches.len() > 1 {
        tracing::warn!(
            pattern,
            count = matches.len(),
            "several artifacts match the bundle pattern; judging the largest"
        );
    }

    // Largest first; ties broken by path for a stable choice.
    matches.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    let (artifact, bytes) = matches
        .into_iter()
        .next()
        .ok_or_else(|| ScoreGateError::artifact_not_found(artifact_dir, pattern))?;

    let actual_kb = bytes as f64 / 1024.0;
    let within_budget = actual_kb <= max_kb;
    tracing::debug!(
        artifact = %artifact.display(),
        actual_kb,
        max_kb,
        within_budget,
        "checked bundle size"
    );

    Ok(BundleCheck {
        artifact,
        pattern: pattern.to_string(),
        bytes,
        actual_kb,
        max_kb,
        within_budget,
    })
}

fn slash_path(p: &Path) -> String {
    p.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn collect_files_recursive(dir: &Path, out: &mut Vec<PathBuf>) -> ScoreGateResult<()> {
    let entries = std::fs::read_dir(dir).map_err(|e| ScoreGateError::io(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| ScoreGateError::io(dir, e))?;
        let path = entry.path();
        let ft = entry.file_type().map_err(|e| ScoreGateError::io(&path, e))?;
        if ft.is_dir() {
            collect_files_recursive(&path, out)?;
        } else if ft.is_file() {
            out.push(path);
        } else if ft.is_symlink() {
            // Linked files count; linked directories are not descended (no cycles).
            match std::fs::metadata(&path) {
                Ok(meta) if meta.is_file() => out.push(path),
                Ok(_) => tracing::debug!(path = %path.display(), "skipping linked directory"),
                Err(e) => tracing::debug!(path = %path.display(), "skipping broken link: {e}"),
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    fn write_kb(path: &Path, kb: usize) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, vec![b'x'; kb * 1024]).unwrap();
    }

    #[test]
    fn within_budget_when_smaller() {
        let dir = tempfile::tempdir().unwrap();
        write_kb(&dir.path().join("main.3f2a.js"), 150);
        write_kb(&dir.path().join("vendor.js"), 900);

        let check = check_bundle_size(dir.path(), 200.0, "main.*.js").unwrap();
        assert_eq!(check.artifact, PathBuf::from("main.3f2a.js"));
        assert_eq!(check.actual_kb, 150.0);
        assert!(check.within_budget);
        assert_eq!(check.overage_kb(), 0.0);
    }

    #[test]
    fn over_budget_is_reported_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        write_kb(&dir.path().join("main.abc.js"), 210);

        let check = check_bundle_size(dir.path(), 200.0, "main.*.js").unwrap();
        assert_eq!(check.actual_kb, 210.0);
        assert!(!check.within_budget);
        assert_eq!(check.overage_kb(), 10.0);
    }

    #[test]
    fn exactly_on_budget_passes() {
        let dir = tempfile::tempdir().unwrap();
        write_kb(&dir.path().join("main.js"), 200);
        assert!(check_bundle_size(dir.path(), 200.0, "main*.js").unwrap().within_budget);
    }

    #[test]
    fn searches_nested_directories_by_file_name() {
        let dir = tempfile::tempdir().unwrap();
        write_kb(&dir.path().join("static/js/main.9c1.js"), 12);

        let check = check_bundle_size(dir.path(), 200.0, "main.*.js").unwrap();
        assert_eq!(check.artifact, Path::new("static").join("js").join("main.9c1.js"));
    }

    #[test]
    fn pattern_with_slash_matches_relative_path() {
        let dir = tempfile::tempdir().unwrap();
        write_kb(&dir.path().join("static/js/main.1.js"), 5);
        write_kb(&dir.path().join("legacy/main.2.js"), 50);

        let check = check_bundle_size(dir.path(), 200.0, "static/**/main.*.js").unwrap();
        assert_eq!(check.bytes, 5 * 1024);
    }

    #[test]
    fn largest_match_is_judged() {
        let dir = tempfile::tempdir().unwrap();
        write_kb(&dir.path().join("main.a.js"), 20);
        write_kb(&dir.path().join("main.b.js"), 40);

        let check = check_bundle_size(dir.path(), 30.0, "main.*.js").unwrap();
        assert_eq!(check.artifact, PathBuf::from("main.b.js"));
        assert!(!check.within_budget);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_artifact_is_measured_through_the_link() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("store/main.real.bin");
        write_kb(&target, 2);
        std::os::unix::fs::symlink(&target, dir.path().join("main.abc.js")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone"), dir.path().join("main.dead.js"))
            .unwrap();

        let check = check_bundle_size(dir.path(), 200.0, "main.*.js").unwrap();
        assert_eq!(check.artifact, PathBuf::from("main.abc.js"));
        assert_eq!(check.bytes, 2048);
        assert!(check.within_budget);
    }

    #[test]
    fn no_match_is_artifact_not_found() {
        let dir = tempfile::tempdir().unwrap();
        write_kb(&dir.path().join("vendor.js"), 1);
        let err = check_bundle_size(dir.path(), 200.0, "main.*.js").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArtifactNotFound);
    }

    #[test]
    fn missing_directory_is_artifact_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = check_bundle_size(&dir.path().join("dist"), 200.0, "main.*.js").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArtifactNotFound);
        assert!(err.to_string().contains("does not exist"), "{err}");
    }
}
