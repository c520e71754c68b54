use super::super::args::CheckArgs;
use crate::exit_codes::ReasonCode;
use scoregate_core::report::summary::{write_summary, Summary};
use scoregate_core::report::{console, junit};
use scoregate_core::{
    evaluate, load_goals, load_report_links, load_reports, render_error_summary, render_summary,
    Goals, ReportLinks, ScoreGateError, Verdict,
};
use std::path::Path;

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub(crate) fn run(args: CheckArgs) -> anyhow::Result<i32> {
    let mut goals: Option<Goals> = None;
    let outcome = (|| -> Result<(Verdict, ReportLinks), ScoreGateError> {
        let mut loaded = load_goals(&args.config)?;
        if let Some(agg) = args.aggregation {
            loaded = loaded.with_aggregation(agg.into());
        }
        let goals = goals.insert(loaded);
        tracing::info!(
            config = %args.config.display(),
            goals = goals.goals.len(),
            variants = ?goals.variants,
            aggregation = %goals.aggregation,
            "loaded goals"
        );

        let links = collect_links(&args)?;
        let reports = load_reports(&args.reports, goals)?;
        let verdict = evaluate(goals, &reports, args.artifacts.as_deref())?;
        Ok((verdict, links))
    })();

    match outcome {
        Ok((verdict, links)) => Ok(finish_verdict(&args, goals.as_ref(), &verdict, &links)),
        Err(err) => {
            // Links are still worth showing when only the reports were bad.
            let links = collect_links(&args).unwrap_or_default();
            Ok(finish_error(&args, goals.as_ref(), &err, &links))
        }
    }
}

fn collect_links(args: &CheckArgs) -> Result<ReportLinks, ScoreGateError> {
    let mut links = match &args.links {
        Some(path) => load_report_links(path)?,
        None => ReportLinks::new(),
    };
    links.extend(args.link.iter().cloned());
    Ok(links)
}

fn finish_verdict(
    args: &CheckArgs,
    goals: Option<&Goals>,
    verdict: &Verdict,
    links: &ReportLinks,
) -> i32 {
    let reason = ReasonCode::from_verdict(verdict.categories_passed(), verdict.bundle_passed());
    console::print_summary(verdict);

    let mut summary = match reason {
        ReasonCode::Success => Summary::success(VERSION),
        _ => {
            let counts = verdict.counts();
            Summary::failure(
                reason.exit_code(),
                reason.as_str(),
                &format!("{} of {} checks failed", counts.failed, counts.total),
                reason.next_step().unwrap_or_default(),
                VERSION,
            )
        }
    };
    if let Some(g) = goals {
        summary = summary.with_goals(&g.digest, verdict.aggregation.as_str());
    }
    summary = summary.with_verdict(verdict);
    write_best_effort("summary.json", &args.summary, |p| write_summary(&summary, p));

    if let Some(path) = &args.junit {
        write_best_effort("JUnit report", path, |p| junit::write_junit(verdict, p));
    }
    emit_comment(args, &render_summary(verdict, links));

    reason.exit_code()
}

fn finish_error(
    args: &CheckArgs,
    goals: Option<&Goals>,
    err: &ScoreGateError,
    links: &ReportLinks,
) -> i32 {
    let reason = ReasonCode::from_error_kind(err.kind());
    tracing::error!(reason = reason.as_str(), "{err}");
    console::print_error(err);

    let mut summary = Summary::failure(
        reason.exit_code(),
        reason.as_str(),
        &err.to_string(),
        reason.next_step().unwrap_or_default(),
        VERSION,
    );
    if let Some(g) = goals {
        summary = summary.with_goals(&g.digest, g.aggregation.as_str());
    }
    write_best_effort("summary.json", &args.summary, |p| write_summary(&summary, p));

    if let Some(path) = &args.junit {
        write_best_effort("JUnit report", path, |p| junit::write_junit_error(err, p));
    }
    emit_comment(args, &render_error_summary(err, links));

    reason.exit_code()
}

fn emit_comment(args: &CheckArgs, md: &str) {
    match &args.pr_comment {
        Some(path) => {
            let written = write_best_effort("PR comment", path, |p| {
                std::fs::write(p, md)?;
                Ok(())
            });
            if written {
                eprintln!("Wrote PR comment to {}", path.display());
            }
        }
        None => print!("{md}"),
    }
}

/// Output files never change the verdict; failures are logged and skipped.
fn write_best_effort<F>(what: &str, path: &Path, write: F) -> bool
where
    F: FnOnce(&Path) -> anyhow::Result<()>,
{
    let res = (|| -> anyhow::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        write(path)
    })();
    match res {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(path = %path.display(), "failed to write {what}: {e}");
            false
        }
    }
}
