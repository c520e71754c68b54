use crate::cli::args::InitArgs;
use crate::exit_codes::{CONFIG_ERROR, SUCCESS};
use scoregate_core::goals::SAMPLE_GOALS;

pub fn run(args: InitArgs) -> anyhow::Result<i32> {
    if args.config.exists() && !args.force {
        eprintln!(
            "❌ {} already exists (use --force to overwrite)",
            args.config.display()
        );
        return Ok(CONFIG_ERROR);
    }

    if let Some(parent) = args.config.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&args.config, SAMPLE_GOALS)
        .map_err(|e| anyhow::anyhow!("failed to write {}: {}", args.config.display(), e))?;

    println!("   Created {}", args.config.display());
    println!(
        "✅  Edit the goals, then run 'scoregate check --config {} --reports <dir>'.",
        args.config.display()
    );
    Ok(SUCCESS)
}
