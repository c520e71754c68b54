use super::{fmt_kb, fmt_score};
use crate::errors::ScoreGateError;
use crate::evaluate::Verdict;
use std::path::Path;

const SUITE: &str = "scoregate";

/// One testsuite per variant with a testcase per category, plus a
/// `bundle` suite when a size budget was checked.
pub fn render_junit(verdict: &Verdict) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    xml.push('\n');

    let counts = verdict.counts();
    xml.push_str(&format!(
        r#"<testsuites name="{}" tests="{}" failures="{}">"#,
        SUITE, counts.total, counts.failed
    ));
    xml.push('\n');

    for variant in &verdict.variants {
        let failures = variant.categories.iter().filter(|c| !c.passed).count();
        xml.push_str(&format!(
            r#"  <testsuite name="{}.{}" tests="{}" failures="{}">"#,
            SUITE,
            escape(&variant.variant),
            variant.categories.len(),
            failures
        ));
        xml.push('\n');
        for c in &variant.categories {
            xml.push_str(&format!(r#"    <testcase name="{}">"#, escape(&c.category)));
            if !c.passed {
                let message = format!(
                    "score {} is below the goal of {}",
                    fmt_score(c.actual),
                    fmt_score(c.goal)
                );
                xml.push_str(&format!(r#"<failure message="{}"/>"#, escape(&message)));
            }
            xml.push_str("</testcase>\n");
        }
        xml.push_str("  </testsuite>\n");
    }

    if let Some(bundle) = &verdict.bundle {
        let failed = usize::from(!bundle.within_budget);
        xml.push_str(&format!(
            r#"  <testsuite name="{}.bundle" tests="1" failures="{}">"#,
            SUITE, failed
        ));
        xml.push('\n');
        xml.push_str(&format!(
            r#"    <testcase name="bundle-size" classname="{}">"#,
            escape(&bundle.artifact.display().to_string())
        ));
        if !bundle.within_budget {
            let message = format!(
                "{} exceeds the {} budget",
                fmt_kb(bundle.actual_kb),
                fmt_kb(bundle.max_kb)
            );
            xml.push_str(&format!(r#"<failure message="{}"/>"#, escape(&message)));
        }
        xml.push_str("</testcase>\n");
        xml.push_str("  </testsuite>\n");
    }

    xml.push_str("</testsuites>\n");
    xml
}

/// A single errored testcase, so CI still shows why nothing was judged.
pub fn render_junit_error(error: &ScoreGateError) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    xml.push('\n');
    xml.push_str(&format!(
        r#"<testsuites name="{SUITE}" tests="1" errors="1">"#
    ));
    xml.push('\n');
    xml.push_str(&format!(
        r#"  <testsuite name="{SUITE}" tests="1" errors="1">"#
    ));
    xml.push('\n');
    xml.push_str(&format!(
        r#"    <testcase name="evaluation"><error message="{}" type="{}"/></testcase>"#,
        escape(&error.to_string()),
        escape(error.kind().as_str())
    ));
    xml.push('\n');
    xml.push_str("  </testsuite>\n");
    xml.push_str("</testsuites>\n");
    xml
}

pub fn write_junit(verdict: &Verdict, out: &Path) -> anyhow::Result<()> {
    std::fs::write(out, render_junit(verdict))?;
    Ok(())
}

pub fn write_junit_error(error: &ScoreGateError, out: &Path) -> anyhow::Result<()> {
    std::fs::write(out, render_junit_error(error))?;
    Ok(())
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
