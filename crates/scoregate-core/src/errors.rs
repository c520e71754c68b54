//! Error types for goal, report and artifact loading.
//!
//! A goal that is not met is never an error: it is a failed category in the
//! [`crate::Verdict`]. Everything here aborts the evaluation.

use std::path::{Path, PathBuf};

/// Stable classification used by callers to pick exit and reason codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    ReportLoad,
    ArtifactNotFound,
    Io,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Config => "config error",
            Self::ReportLoad => "report load error",
            Self::ArtifactNotFound => "artifact not found",
            Self::Io => "i/o error",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ScoreGateError {
    /// Goals declaration missing or malformed.
    #[error("config error{}: {message}", at(.path))]
    Config {
        path: Option<PathBuf>,
        message: String,
    },

    /// Report file unreadable, unparsable, or missing a declared category.
    #[error("report load error{}: {message}", at(.path))]
    ReportLoad {
        path: Option<PathBuf>,
        message: String,
    },

    /// No file under the artifact directory matches the configured pattern.
    #[error("no artifact matching `{pattern}` under {}{}", .dir.display(), detail_suffix(.detail))]
    ArtifactNotFound {
        dir: PathBuf,
        pattern: String,
        detail: Option<String>,
    },

    #[error("i/o error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn at(path: &Option<PathBuf>) -> String {
    match path {
        Some(p) => format!(" in {}", p.display()),
        None => String::new(),
    }
}

fn detail_suffix(detail: &Option<String>) -> String {
    match detail {
        Some(d) => format!(" ({d})"),
        None => String::new(),
    }
}

impl ScoreGateError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            path: None,
            message: message.into(),
        }
    }

    pub fn config_at(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::Config {
            path: Some(path.as_ref().to_path_buf()),
            message: message.into(),
        }
    }

    pub fn report_load(message: impl Into<String>) -> Self {
        Self::ReportLoad {
            path: None,
            message: message.into(),
        }
    }

    pub fn report_load_at(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::ReportLoad {
            path: Some(path.as_ref().to_path_buf()),
            message: message.into(),
        }
    }

    pub fn artifact_not_found(dir: impl AsRef<Path>, pattern: impl Into<String>) -> Self {
        Self::ArtifactNotFound {
            dir: dir.as_ref().to_path_buf(),
            pattern: pattern.into(),
            detail: None,
        }
    }

    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config { .. } => ErrorKind::Config,
            Self::ReportLoad { .. } => ErrorKind::ReportLoad,
            Self::ArtifactNotFound { .. } => ErrorKind::ArtifactNotFound,
            Self::Io { .. } => ErrorKind::Io,
        }
    }

    /// Path of the offending input, when one is known.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Config { path, .. } | Self::ReportLoad { path, .. } => path.as_deref(),
            Self::ArtifactNotFound { dir, .. } => Some(dir),
            Self::Io { path, .. } => Some(path),
        }
    }
}

pub type ScoreGateResult<T> = Result<T, ScoreGateError>;
