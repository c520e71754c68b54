use scoregate_core::{
    check_bundle_size, evaluate, load_goals, load_reports, parse_goals, render_summary, Aggregation,
    ErrorKind, ReportLinks,
};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const GOALS: &str = r#"version: 1
variants: [anonymous, authenticated]
goals:
  performance:
    min_score: 90
    bundle:
      max_kb: 200
      pattern: "main.*.js"
  accessibility: 95
"#;

fn lighthouse(perf: f64, a11y: f64) -> String {
    serde_json::json!({
        "lighthouseVersion": "12.0.0",
        "categories": {
            "performance": { "id": "performance", "score": perf },
            "accessibility": { "id": "accessibility", "score": a11y },
            "seo": { "id": "seo", "score": 0.5 }
        }
    })
    .to_string()
}

fn write(dir: &Path, name: &str, body: &str) {
    fs::write(dir.join(name), body).unwrap();
}

fn artifact(dir: &Path, rel: &str, kb: usize) {
    let path = dir.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, vec![b'x'; kb * 1024]).unwrap();
}

struct Fixture {
    _root: tempfile::TempDir,
    goals: std::path::PathBuf,
    reports: std::path::PathBuf,
    artifacts: std::path::PathBuf,
}

fn fixture(bundle_kb: usize) -> Fixture {
    let root = tempdir().unwrap();
    let goals = root.path().join("scoregate.yaml");
    fs::write(&goals, GOALS).unwrap();

    let reports = root.path().join("reports");
    fs::create_dir_all(&reports).unwrap();
    write(&reports, "lhr-anonymous-1.json", &lighthouse(0.88, 0.96));
    write(&reports, "lhr-anonymous-2.json", &lighthouse(0.93, 0.94));
    write(&reports, "lhr-authenticated-1.json", &lighthouse(0.91, 0.97));
    write(&reports, "manifest.json", "[]");
    write(&reports, "notes.txt", "not a report");

    let artifacts = root.path().join("dist");
    artifact(&artifacts, &format!("static/js/main.{}.js", "a1b2"), bundle_kb);
    artifact(&artifacts, "static/js/vendor.c3d4.js", 900);

    Fixture {
        _root: root,
        goals,
        reports,
        artifacts,
    }
}

#[test]
fn full_pipeline_passes() {
    let f = fixture(150);
    let goals = load_goals(&f.goals).unwrap();
    let reports = load_reports(&f.reports, &goals).unwrap();
    assert_eq!(reports["anonymous"].len(), 2);
    assert_eq!(reports["authenticated"].len(), 1);

    let verdict = evaluate(&goals, &reports, Some(&f.artifacts)).unwrap();
    assert!(verdict.passed, "{verdict:#?}");
    assert_eq!(verdict.variants[0].categories[0].actual, 93.0);
    assert_eq!(verdict.variants[0].categories[1].actual, 96.0);

    let bundle = verdict.bundle.as_ref().unwrap();
    assert_eq!(bundle.actual_kb, 150.0);
    assert!(bundle.within_budget);
    assert_eq!(verdict.bundle_category.as_deref(), Some("performance"));

    let md = render_summary(&verdict, &ReportLinks::new());
    assert!(md.contains(":white_check_mark: Pass"));
    assert!(md.contains("5/5 checks passed"));
}

#[test]
fn oversized_bundle_fails_even_when_scores_pass() {
    let f = fixture(210);
    let goals = load_goals(&f.goals).unwrap();
    let reports = load_reports(&f.reports, &goals).unwrap();
    let verdict = evaluate(&goals, &reports, Some(&f.artifacts)).unwrap();

    assert!(verdict.categories_passed());
    assert!(!verdict.bundle_passed());
    assert!(!verdict.passed);
    let bundle = verdict.bundle.unwrap();
    assert_eq!(bundle.actual_kb, 210.0);
    assert_eq!(bundle.overage_kb(), 10.0);
}

#[test]
fn evaluation_is_idempotent() {
    let f = fixture(150);
    let goals = load_goals(&f.goals).unwrap();
    let reports = load_reports(&f.reports, &goals).unwrap();
    let first = evaluate(&goals, &reports, Some(&f.artifacts)).unwrap();
    let second = evaluate(&goals, &reports, Some(&f.artifacts)).unwrap();
    assert_eq!(first, second);

    let again = load_reports(&f.reports, &goals).unwrap();
    assert_eq!(reports, again);
}

#[test]
fn report_missing_a_goal_category_is_a_load_error() {
    let f = fixture(150);
    write(
        &f.reports,
        "lhr-authenticated-2.json",
        r#"{"categories": {"performance": {"score": 0.99}}}"#,
    );
    let goals = load_goals(&f.goals).unwrap();
    let err = load_reports(&f.reports, &goals).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ReportLoad);
    assert!(err.to_string().contains("accessibility"), "{err}");
    assert!(err
        .path()
        .is_some_and(|p| p.ends_with("lhr-authenticated-2.json")));
}

#[test]
fn null_lighthouse_score_is_a_load_error() {
    let f = fixture(150);
    write(
        &f.reports,
        "lhr-anonymous-3.json",
        r#"{"categories": {"performance": {"score": null}, "accessibility": {"score": 1}}}"#,
    );
    let goals = load_goals(&f.goals).unwrap();
    let err = load_reports(&f.reports, &goals).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ReportLoad);
}

#[test]
fn flat_reports_are_accepted_and_extra_categories_ignored() {
    let root = tempdir().unwrap();
    write(
        root.path(),
        "run_anonymous_1.json",
        r#"{"performance": 91, "accessibility": 99, "pwa": 10}"#,
    );
    let goals = parse_goals(
        "version: 1\nvariants: [anonymous]\ngoals:\n  performance: 90\n  accessibility: 95\n",
    )
    .unwrap();
    let reports = load_reports(root.path(), &goals).unwrap();
    let r = &reports["anonymous"][0];
    assert_eq!(r.execution_id, "run_anonymous_1");
    assert!(r.score("pwa").is_none());

    let verdict = evaluate(&goals, &reports, None).unwrap();
    assert!(verdict.passed);
}

#[test]
fn runs_are_ordered_naturally_for_first_strategy() {
    let root = tempdir().unwrap();
    write(root.path(), "anonymous-10.json", r#"{"performance": 70}"#);
    write(root.path(), "anonymous-2.json", r#"{"performance": 95}"#);
    let goals = parse_goals("version: 1\nvariants: [anonymous]\ngoals:\n  performance: 90\n")
        .unwrap()
        .with_aggregation(Aggregation::First);
    let reports = load_reports(root.path(), &goals).unwrap();
    let ids: Vec<_> = reports["anonymous"]
        .iter()
        .map(|r| r.execution_id.as_str())
        .collect();
    assert_eq!(ids, ["anonymous-2", "anonymous-10"]);

    let verdict = evaluate(&goals, &reports, None).unwrap();
    assert_eq!(verdict.variants[0].categories[0].actual, 95.0);
    assert!(verdict.passed);
}

#[test]
fn missing_artifact_is_reported() {
    let f = fixture(150);
    let err = check_bundle_size(&f.artifacts, 200.0, "app.*.js").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ArtifactNotFound);

    let err = check_bundle_size(&f.artifacts.join("nope"), 200.0, "main.*.js").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ArtifactNotFound);
}

#[test]
fn missing_reports_dir_is_a_load_error() {
    let f = fixture(150);
    let goals = load_goals(&f.goals).unwrap();
    let err = load_reports(&f.reports.join("missing"), &goals).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ReportLoad);
}
