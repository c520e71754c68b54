//! Markdown body for the review comment.
//!
//! The leading HTML marker lets the notifier find and update its previous
//! comment instead of posting a new one on every push.

use super::links::ReportLinks;
use super::{fmt_kb, fmt_score};
use crate::errors::ScoreGateError;
use crate::evaluate::{VariantVerdict, Verdict};

pub const COMMENT_MARKER: &str = "<!-- scoregate-report -->";

const TITLE: &str = "## Performance Audit Report";

pub fn render_summary(verdict: &Verdict, report_links: &ReportLinks) -> String {
    let mut md = String::new();

    md.push_str(COMMENT_MARKER);
    md.push('\n');
    md.push_str(TITLE);
    md.push_str("\n\n");

    let status = if verdict.passed {
        "**Status:** :white_check_mark: Pass"
    } else {
        "**Status:** :x: Fail"
    };
    md.push_str(status);
    md.push_str("\n\n");

    let counts = verdict.counts();
    md.push_str(&format!(
        "{}/{} checks passed · aggregation: `{}`\n",
        counts.passed, counts.total, verdict.aggregation
    ));

    for variant in &verdict.variants {
        md.push('\n');
        push_variant_table(&mut md, variant);
    }

    if let Some(bundle) = &verdict.bundle {
        md.push_str("\n### Bundle size\n\n");
        md.push_str("| Artifact | Budget | Actual | Status |\n");
        md.push_str("|----------|--------|--------|--------|\n");
        let status = if bundle.within_budget {
            "✅".to_string()
        } else {
            format!("❌ +{}", fmt_kb(bundle.overage_kb()))
        };
        md.push_str(&format!(
            "| `{}` | {} | {} | {} |\n",
            bundle
                .artifact
                .display()
                .to_string()
                .replace('`', "'")
                .replace('|', "\\|"),
            fmt_kb(bundle.max_kb),
            fmt_kb(bundle.actual_kb),
            status
        ));
    }

    let failed = verdict.failed_categories();
    if !failed.is_empty() || !verdict.bundle_passed() {
        md.push_str("\n<details>\n<summary>Why this failed</summary>\n\n");
        for (variant, c) in &failed {
            md.push_str(&format!(
                "- {} / {}: {} is below the goal of {}\n",
                escape_markdown_text(variant),
                escape_markdown_text(&c.category),
                fmt_score(c.actual),
                fmt_score(c.goal)
            ));
        }
        if let Some(b) = verdict.bundle.as_ref().filter(|b| !b.within_budget) {
            md.push_str(&format!(
                "- bundle: {} exceeds the {} budget\n",
                fmt_kb(b.actual_kb),
                fmt_kb(b.max_kb)
            ));
        }
        md.push_str("\n</details>\n");
    }

    push_links(&mut md, report_links);
    push_footer(&mut md);
    md
}

/// Comment body for runs that could not be evaluated at all.
///
/// Kept visibly distinct from a failed verdict: no goal was judged.
pub fn render_error_summary(error: &ScoreGateError, report_links: &ReportLinks) -> String {
    let mut md = String::new();

    md.push_str(COMMENT_MARKER);
    md.push('\n');
    md.push_str(TITLE);
    md.push_str("\n\n");
    md.push_str("**Status:** :warning: Evaluation error\n\n");
    md.push_str("The audit results could not be evaluated, so no goal was checked.\n\n");

    md.push_str("| Error | Detail |\n");
    md.push_str("|-------|--------|\n");
    md.push_str(&format!(
        "| {} | {} |\n",
        error.kind().as_str(),
        escape_markdown_table_cell(&error.to_string())
    ));

    push_links(&mut md, report_links);
    push_footer(&mut md);
    md
}

fn push_variant_table(md: &mut String, variant: &VariantVerdict) {
    let icon = if variant.passed { "✅" } else { "❌" };
    let runs = if variant.runs == 1 { "run" } else { "runs" };
    md.push_str(&format!(
        "### {} {} ({} {})\n\n",
        escape_markdown_text(&variant.variant),
        icon,
        variant.runs,
        runs
    ));
    md.push_str("| Category | Goal | Actual | Runs | Status |\n");
    md.push_str("|----------|------|--------|------|--------|\n");
    for c in &variant.categories {
        let samples = c
            .samples
            .iter()
            .map(|s| fmt_score(*s))
            .collect::<Vec<_>>()
            .join(", ");
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            escape_markdown_table_cell(&c.category),
            fmt_score(c.goal),
            fmt_score(c.actual),
            samples,
            if c.passed { "✅" } else { "❌" }
        ));
    }
}

fn push_links(md: &mut String, links: &ReportLinks) {
    if links.is_empty() {
        return;
    }
    md.push_str("\n### Full reports\n\n");
    for (label, url) in links {
        md.push_str(&format!(
            "- [{}]({})\n",
            escape_markdown_text(label),
            url.trim().replace(' ', "%20").replace(')', "%29")
        ));
    }
}

fn push_footer(md: &mut String) {
    md.push('\n');
    md.push_str("---\n");
    md.push_str(&format!(
        "Generated by scoregate v{}\n",
        env!("CARGO_PKG_VERSION")
    ));
}

fn escape_markdown_table_cell(input: &str) -> String {
    escape_markdown_text(input).replace('|', "\\|")
}

fn escape_markdown_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '\r' | '\n' => out.push(' '),
            '\\' | '`' | '*' | '_' | '[' | ']' | '#' | '<' | '>' => {
                out.push('\\');
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
    out
}
