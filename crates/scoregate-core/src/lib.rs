//! Aggregates repeated performance-audit runs and gates them against declared goals.
//!
//! The flow is `load_goals` + `load_reports` -> `evaluate` -> one of the
//! renderers in [`report`]. Nothing in this crate writes to the review system
//! or exits the process; callers decide what to do with the [`Verdict`].

pub mod aggregate;
pub mod bundle;
pub mod errors;
pub mod evaluate;
pub mod goals;
pub mod report;
pub mod reports;

pub use aggregate::{aggregate, AggregatedResult, Aggregation, CategoryAggregate};
pub use bundle::{check_bundle_size, BundleCheck};
pub use errors::{ErrorKind, ScoreGateError, ScoreGateResult};
pub use evaluate::{evaluate, CategoryVerdict, VariantVerdict, Verdict, VerdictCounts};
pub use goals::{load_goals, parse_goals, BundleBudget, Goal, Goals};
pub use report::links::{load_report_links, ReportLinks};
pub use report::markdown::{render_error_summary, render_summary};
pub use reports::{load_reports, Report, ReportsByVariant};
