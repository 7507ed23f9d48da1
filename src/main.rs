use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::error;
use skucheck::{
    check_archive, fetch_archive, move_and_prune, strip_sku_suffixes, write_report, Cli,
    Commands, FileConfig, NormalizeStats, Overrides, RenameStats, ReportFormat, RuleSet,
    RunConfig, ValidationSummary, Validator,
};
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::CheckArchive {
            archive,
            url,
            rules,
            output,
            format,
        }) => {
            let output = output.unwrap_or_else(|| PathBuf::from(format.default_file_name()));
            run_archive(archive.as_deref(), url.as_deref(), &rules, &output, format)?;
        }
        None => {
            let file_config = FileConfig::discover(cli.config.as_deref())?;
            let config = RunConfig::resolve(
                file_config,
                Overrides {
                    image_root: cli.root,
                    rule_file: cli.rules,
                    report_format: cli.format,
                    report_only: cli.report_only,
                    skip_normalize: cli.skip_normalize,
                },
            );
            run_standalone(&config)?;
        }
    }

    Ok(())
}

fn init_logging() {
    let env = Env::default().filter_or("RUST_LOG", "info");
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp_secs()
        .format_target(false)
        .try_init();
}

fn run_standalone(config: &RunConfig) -> Result<()> {
    let rules = match RuleSet::load(&config.rule_file) {
        Ok(rules) => rules,
        Err(e) => {
            error!("Rule loading failed: {:#}", anyhow::Error::new(e));
            std::process::exit(1);
        }
    };
    println!(
        "Loaded {} rule segments from: {}",
        rules.len(),
        config.rule_file.display()
    );

    if !config.image_root.is_dir() {
        anyhow::bail!(
            "Image root does not exist: {}",
            config.image_root.display()
        );
    }

    if config.normalize {
        let moved = move_and_prune(&config.image_root)?;
        let renamed = strip_sku_suffixes(&config.image_root)?;
        print_normalize_summary(&moved, &renamed);
    }

    let summary = Validator::new(rules)
        .mark_invalid(config.mark_invalid)
        .validate_root(&config.image_root)?;
    print_validation_summary(&summary);

    let report = write_report(&summary.records, &config.report_path, config.report_format)?;
    print_report_location(report.as_deref());
    Ok(())
}

fn run_archive(
    archive: Option<&Path>,
    url: Option<&str>,
    rules: &Path,
    output: &Path,
    format: ReportFormat,
) -> Result<()> {
    let rules = RuleSet::load(rules)
        .inspect_err(|e| error!("Rule loading failed: {}", e))?;

    let data = match (archive, url) {
        (Some(path), None) => {
            println!("Checking archive: {}", path.display());
            std::fs::read(path)
                .with_context(|| format!("Failed to read archive {}", path.display()))?
        }
        (None, Some(url)) => {
            println!("Fetching archive: {}", url);
            fetch_archive(url)?
        }
        (Some(_), Some(_)) => anyhow::bail!("Specify either an archive path or --url, not both"),
        (None, None) => anyhow::bail!("No archive provided. Pass a zip path or use --url"),
    };

    let outcome = check_archive(&data, rules, output, format)?;
    print_validation_summary(&outcome.summary);

    print_report_location(outcome.report.as_deref());
    Ok(())
}

fn print_report_location(report: Option<&Path>) {
    match report {
        Some(path) => println!("Issues found, report written to: {}", path.display()),
        None => println!("No issues found"),
    }
}

fn print_normalize_summary(moved: &NormalizeStats, renamed: &RenameStats) {
    println!("Normalization complete!");
    println!("  - Images moved: {}", moved.files_moved);
    println!("  - Empty folders removed: {}", moved.folders_removed);
    println!("  - Folder suffixes trimmed: {}", renamed.renamed);

    let failures = moved.move_failures + moved.removal_failures + renamed.failures;
    if failures > 0 {
        println!("  \u{26a0} {} filesystem operations failed (see log)", failures);
    }
}

fn print_validation_summary(summary: &ValidationSummary) {
    println!("Validation complete!");
    println!("  - Folders checked: {}", summary.folders_checked);
    println!("  - Invalid folders: {}", summary.invalid_folders);
    println!("  - Issues recorded: {}", summary.records.len());

    if summary.renamed_folders > 0 {
        println!("  - Folders marked INVALID_: {}", summary.renamed_folders);
    }
    if summary.rename_failures > 0 {
        println!(
            "  \u{26a0} {} invalid folders could not be renamed",
            summary.rename_failures
        );
    }
}
