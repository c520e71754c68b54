pub mod console;
pub mod junit;
pub mod links;
pub mod markdown;
pub mod summary;

/// Up to two decimals, truncated so a score below its goal never prints as
/// the goal. Whole numbers (the Lighthouse case) carry no decimals.
pub(crate) fn fmt_score(score: f64) -> String {
    // The epsilon absorbs binary noise such as 89.96 * 100 = 8995.999...
    let cents = (score * 100.0 + 1e-9).floor();
    if cents % 100.0 == 0.0 {
        return format!("{:.0}", cents / 100.0);
    }
    let s = format!("{:.2}", cents / 100.0);
    s.trim_end_matches('0').to_string()
}

pub(crate) fn fmt_kb(kb: f64) -> String {
    format!("{:.1} KB", kb)
}
