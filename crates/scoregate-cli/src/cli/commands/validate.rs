use crate::cli::args::ValidateArgs;
use crate::exit_codes::{ReasonCode, SUCCESS};
use scoregate_core::load_goals;
use serde_json::json;

/// Load the goals file and print it in normalised form (shorthand expanded,
/// defaults filled in) as JSON on stdout.
pub fn run(args: ValidateArgs) -> anyhow::Result<i32> {
    let goals = match load_goals(&args.config) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("❌ {e}");
            return Ok(ReasonCode::from_error_kind(e.kind()).exit_code());
        }
    };

    let out = json!({
        "config": args.config,
        "digest": goals.digest,
        "goals": goals,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    eprintln!(
        "✅ {} is valid ({} goals, {} variants)",
        args.config.display(),
        goals.goals.len(),
        goals.variants.len()
    );
    Ok(SUCCESS)
}
