//! Combining repeated runs of one variant into a single score per category.

use crate::errors::{ScoreGateError, ScoreGateResult};
use crate::reports::Report;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How repeated runs of the same variant are combined.
///
/// Every strategy returns a score that was actually observed in one of the runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    /// Highest score across runs. A single noisy run cannot fail the gate.
    #[default]
    Best,
    /// Lower median of the runs.
    Median,
    /// First run in execution order.
    First,
}

impl Aggregation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Best => "best",
            Self::Median => "median",
            Self::First => "first",
        }
    }

    /// Combine samples given in execution order. `None` for an empty slice.
    pub fn apply(&self, samples: &[f64]) -> Option<f64> {
        if samples.is_empty() {
            return None;
        }
        match self {
            Self::Best => samples.iter().copied().reduce(f64::max),
            Self::First => samples.first().copied(),
            Self::Median => {
                let mut sorted = samples.to_vec();
                sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
                let idx = ((0.5 * (sorted.len() - 1) as f64).floor() as usize).min(sorted.len() - 1);
                Some(sorted[idx])
            }
        }
    }
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Aggregation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "best" | "max" => Ok(Self::Best),
            "median" => Ok(Self::Median),
            "first" => Ok(Self::First),
            other => Err(format!(
                "unknown aggregation `{other}` (expected best, median or first)"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryAggregate {
    pub category: String,
    pub score: f64,
    /// Raw scores in execution order.
    pub samples: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedResult {
    pub variant: String,
    pub runs: usize,
    pub aggregation: Aggregation,
    pub categories: Vec<CategoryAggregate>,
}

impl AggregatedResult {
    pub fn score(&self, category: &str) -> Option<f64> {
        self.categories
            .iter()
            .find(|c| c.category == category)
            .map(|c| c.score)
    }

    pub fn category(&self, category: &str) -> Option<&CategoryAggregate> {
        self.categories.iter().find(|c| c.category == category)
    }
}

/// Aggregate the reports of a single variant, one entry per requested category.
///
/// Reports are expected in execution order (as returned by
/// [`crate::load_reports`]). A report lacking a requested category is an
/// error, never a default score.
pub fn aggregate(
    reports: &[Report],
    categories: &[String],
    strategy: Aggregation,
) -> ScoreGateResult<AggregatedResult> {
    let first = reports
        .first()
        .ok_or_else(|| ScoreGateError::report_load("cannot aggregate an empty set of reports"))?;
    let variant = first.variant.clone();

    if let Some(stray) = reports.iter().find(|r| r.variant != variant) {
        return Err(ScoreGateError::report_load_at(
            &stray.source,
            format!(
                "report belongs to variant `{}` but is aggregated with `{}`",
                stray.variant, variant
            ),
        ));
    }

    let mut out = Vec::with_capacity(categories.len());
    for category in categories {
        let samples = reports
            .iter()
            .map(|r| {
                r.score(category).ok_or_else(|| {
                    ScoreGateError::report_load_at(
                        &r.source,
                        format!("missing score for category `{category}`"),
                    )
                })
            })
            .collect::<ScoreGateResult<Vec<f64>>>()?;
        // Non-empty: at least one report exists.
        let score = strategy.apply(&samples).unwrap_or_default();
        tracing::debug!(
            variant = %variant,
            category = %category,
            aggregation = %strategy,
            score,
            runs = samples.len(),
            "aggregated category"
        );
        out.push(CategoryAggregate {
            category: category.clone(),
            score,
            samples,
        });
    }

    Ok(AggregatedResult {
        variant,
        runs: reports.len(),
        aggregation: strategy,
        categories: out,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    fn report(variant: &str, id: &str, scores: &[(&str, f64)]) -> Report {
        Report {
            variant: variant.to_string(),
            execution_id: id.to_string(),
            source: PathBuf::from(format!("{id}.json")),
            scores: scores
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    fn cats(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn best_of_n_takes_maximum_per_category() {
        let reports = vec![
            report("anonymous", "a-1", &[("performance", 88.0), ("accessibility", 96.0)]),
            report("anonymous", "a-2", &[("performance", 93.0), ("accessibility", 94.0)]),
        ];
        let agg = aggregate(&reports, &cats(&["performance", "accessibility"]), Aggregation::Best)
            .unwrap();
        assert_eq!(agg.variant, "anonymous");
        assert_eq!(agg.runs, 2);
        assert_eq!(agg.score("performance"), Some(93.0));
        assert_eq!(agg.score("accessibility"), Some(96.0));
        assert_eq!(agg.category("performance").unwrap().samples, vec![88.0, 93.0]);
    }

    #[test]
    fn median_is_lower_median_and_observed() {
        assert_eq!(Aggregation::Median.apply(&[70.0, 90.0, 80.0]), Some(80.0));
        assert_eq!(Aggregation::Median.apply(&[90.0, 70.0, 80.0, 100.0]), Some(80.0));
        assert_eq!(Aggregation::Median.apply(&[55.0]), Some(55.0));
    }

    #[test]
    fn first_uses_execution_order() {
        assert_eq!(Aggregation::First.apply(&[61.0, 99.0]), Some(61.0));
    }

    #[test]
    fn empty_samples_yield_none() {
        assert_eq!(Aggregation::Best.apply(&[]), None);
        assert_eq!(Aggregation::Median.apply(&[]), None);
    }

    #[test]
    fn aggregate_rejects_empty_reports() {
        let err = aggregate(&[], &cats(&["seo"]), Aggregation::Best).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ReportLoad);
    }

    #[test]
    fn aggregate_rejects_missing_category() {
        let reports = vec![
            report("anonymous", "a-1", &[("performance", 88.0), ("seo", 90.0)]),
            report("anonymous", "a-2", &[("performance", 93.0)]),
        ];
        let err = aggregate(&reports, &cats(&["performance", "seo"]), Aggregation::Best)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ReportLoad);
        assert!(err.to_string().contains("a-2.json"), "{err}");
    }

    #[test]
    fn aggregate_rejects_mixed_variants() {
        let reports = vec![
            report("anonymous", "a-1", &[("seo", 90.0)]),
            report("authenticated", "b-1", &[("seo", 90.0)]),
        ];
        let err = aggregate(&reports, &cats(&["seo"]), Aggregation::Best).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ReportLoad);
    }

    #[test]
    fn parse_and_display_round_trip() {
        for s in ["best", "median", "first"] {
            let a: Aggregation = s.parse().unwrap();
            assert_eq!(a.to_string(), s);
        }
        assert_eq!("MAX".parse::<Aggregation>().unwrap(), Aggregation::Best);
        assert!("mean".parse::<Aggregation>().is_err());
    }
}
