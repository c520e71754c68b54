use super::{fmt_kb, fmt_score};
use crate::errors::ScoreGateError;
use crate::evaluate::{CategoryVerdict, Verdict};

/// Format one category result. Deterministic, unit-testable.
#[must_use]
pub fn format_category_line(variant: &str, c: &CategoryVerdict) -> String {
    let icon = if c.passed { "✅" } else { "❌" };
    let id = format!("{}/{}", variant, c.category);
    format!(
        "{} {:<32} {:>5} (goal {})",
        icon,
        id,
        fmt_score(c.actual),
        fmt_score(c.goal)
    )
}

pub fn print_summary(verdict: &Verdict) {
    eprintln!();
    for variant in &verdict.variants {
        for c in &variant.categories {
            eprintln!("{}", format_category_line(&variant.variant, c));
            if c.samples.len() > 1 {
                let samples = c
                    .samples
                    .iter()
                    .map(|s| fmt_score(*s))
                    .collect::<Vec<_>>()
                    .join(", ");
                eprintln!("      runs: {} ({})", samples, verdict.aggregation);
            }
        }
    }
    if let Some(b) = &verdict.bundle {
        let icon = if b.within_budget { "✅" } else { "❌" };
        let id = format!("bundle/{}", b.artifact.display());
        eprintln!(
            "{} {:<32} {} (budget {})",
            icon,
            id,
            fmt_kb(b.actual_kb),
            fmt_kb(b.max_kb)
        );
    }

    let counts = verdict.counts();
    eprintln!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    eprintln!(
        "Summary: {} passed, {} failed ({})",
        counts.passed,
        counts.failed,
        if verdict.passed { "PASS" } else { "FAIL" }
    );
}

pub fn print_error(error: &ScoreGateError) {
    eprintln!("💥 {}: {}", error.kind().as_str(), error);
}
