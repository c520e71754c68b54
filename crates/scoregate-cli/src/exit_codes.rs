//! Exit codes and reason codes for `scoregate check`.
//! Both are part of the public contract: CI jobs branch on them.

use scoregate_core::ErrorKind;

pub const SUCCESS: i32 = 0;
pub const GOAL_FAILED: i32 = 1; // A category below its goal or the bundle over budget
pub const CONFIG_ERROR: i32 = 2; // Goals, reports or artifacts could not be loaded

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReasonCode {
    Success,
    EGoalNotMet,
    EBundleOverBudget,
    ECfgParse,
    EReportLoad,
    EArtifactNotFound,
    EIo,
}

impl ReasonCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "OK",
            Self::EGoalNotMet => "E_GOAL_NOT_MET",
            Self::EBundleOverBudget => "E_BUNDLE_OVER_BUDGET",
            Self::ECfgParse => "E_CFG_PARSE",
            Self::EReportLoad => "E_REPORT_LOAD",
            Self::EArtifactNotFound => "E_ARTIFACT_NOT_FOUND",
            Self::EIo => "E_IO",
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Success => SUCCESS,
            Self::EGoalNotMet | Self::EBundleOverBudget => GOAL_FAILED,
            Self::ECfgParse | Self::EReportLoad | Self::EArtifactNotFound | Self::EIo => {
                CONFIG_ERROR
            }
        }
    }

    pub fn next_step(&self) -> Option<&'static str> {
        match self {
            Self::Success => None,
            Self::EGoalNotMet => {
                Some("Open the full reports and fix the categories below their goal")
            }
            Self::EBundleOverBudget => {
                Some("Reduce the bundle size or raise `max_kb` in the goals file")
            }
            Self::ECfgParse => Some("Run `scoregate validate --config <file>` for details"),
            Self::EReportLoad => {
                Some("Check that every variant produced a complete JSON report")
            }
            Self::EArtifactNotFound => {
                Some("Check --artifacts and the bundle `pattern` in the goals file")
            }
            Self::EIo => Some("Check file permissions and paths"),
        }
    }

    pub fn from_error_kind(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Config => Self::ECfgParse,
            ErrorKind::ReportLoad => Self::EReportLoad,
            ErrorKind::ArtifactNotFound => Self::EArtifactNotFound,
            ErrorKind::Io => Self::EIo,
        }
    }

    /// A failed category wins over an oversized bundle.
    pub fn from_verdict(categories_passed: bool, bundle_passed: bool) -> Self {
        if !categories_passed {
            Self::EGoalNotMet
        } else if !bundle_passed {
            Self::EBundleOverBudget
        } else {
            Self::Success
        }
    }
}
