use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use follow_audit::config::{get_config, Config};
use follow_audit::display::{DisplayManager, OutputFormat};
use follow_audit::input::{discover_exports, read_export, InputLimits};
use follow_audit::logging::init_logging;
use follow_audit::scanner::HrefScanner;
use follow_audit::validation::ExportValidator;
use follow_audit::{ExportKind, FollowAnalyzer};
use std::path::PathBuf;
use std::process;
use tracing::info;

#[derive(Parser)]
#[command(name = "follow-audit")]
#[command(about = "Find the accounts you follow that don't follow you back, from your data export")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare the exports and list accounts that don't follow back
    Analyze {
        #[command(flatten)]
        inputs: InputArgs,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Also save the result as a text file
        #[arg(long)]
        save: bool,
        /// Directory for saved results (defaults to the configured output directory)
        #[arg(long, value_name = "DIR", requires = "save")]
        output_dir: Option<PathBuf>,
        /// Analyze even if the exports don't look like platform exports
        #[arg(long)]
        skip_validation: bool,
    },
    /// Check that the exports are readable and look like platform exports
    Validate {
        #[command(flatten)]
        inputs: InputArgs,
    },
    /// Print the effective configuration, or write it to a file
    Config {
        /// Write the configuration as TOML to this path
        #[arg(long, value_name = "PATH")]
        write: Option<PathBuf>,
    },
}

#[derive(Args)]
struct InputArgs {
    /// Followers export file (repeat for exports split into several files)
    #[arg(
        long = "followers",
        value_name = "FILE",
        required_unless_present = "export_dir",
        conflicts_with = "export_dir"
    )]
    followers: Vec<PathBuf>,
    /// Following export file
    #[arg(
        long,
        value_name = "FILE",
        required_unless_present = "export_dir",
        conflicts_with = "export_dir"
    )]
    following: Option<PathBuf>,
    /// Unpacked data export directory to search for both files
    #[arg(long, value_name = "DIR")]
    export_dir: Option<PathBuf>,
}

/// Export contents read into memory.
struct LoadedExports {
    followers: Vec<Vec<u8>>,
    following: Vec<u8>,
}

fn main() {
    let cli = Cli::parse();
    let config = get_config();
    let _guard = init_logging(config);

    let json = matches!(
        cli.command,
        Commands::Analyze { format: OutputFormat::Json, .. }
    );

    if let Err(e) = run(cli, config) {
        handle_error(e, json);
    }
}

fn run(cli: Cli, config: &Config) -> Result<()> {
    match cli.command {
        Commands::Analyze {
            inputs,
            format,
            save,
            output_dir,
            skip_validation,
        } => {
            let exports = load_exports(&inputs, config)?;
            if !skip_validation {
                validate_exports(&exports, config)?;
            }

            let parts: Vec<&[u8]> = exports.followers.iter().map(Vec::as_slice).collect();
            let report = FollowAnalyzer::from_config(config).analyze_parts(&parts, &exports.following);
            info!(
                not_following_back = report.not_following_back.len(),
                "Analysis complete"
            );

            let display = DisplayManager::new(&config.output);
            display.display(&report, format)?;

            if save {
                let dir = output_dir.unwrap_or_else(|| config.paths.output_directory.clone());
                let path = display.write_result_file(&dir, &report)?;
                eprintln!("Saved result to {}", path.display());
            }
            Ok(())
        }
        Commands::Validate { inputs } => {
            let exports = load_exports(&inputs, config)?;
            validate_exports(&exports, config)?;
            println!(
                "✓ {} followers file(s) and the following file look valid",
                exports.followers.len()
            );
            Ok(())
        }
        Commands::Config { write } => match write {
            Some(path) => {
                config.save_to_file(&path)?;
                println!("Configuration written to {}", path.display());
                Ok(())
            }
            None => {
                let rendered =
                    toml::to_string_pretty(config).context("Failed to serialize configuration")?;
                print!("{}", rendered);
                Ok(())
            }
        },
    }
}

fn load_exports(inputs: &InputArgs, config: &Config) -> Result<LoadedExports> {
    let (followers_paths, following_path) = match &inputs.export_dir {
        Some(dir) => {
            let found = discover_exports(dir)?;
            (found.followers, found.following)
        }
        None => {
            let following = inputs
                .following
                .clone()
                .context("--following is required without --export-dir")?;
            (inputs.followers.clone(), following)
        }
    };

    let limits = InputLimits::from(&config.limits);
    let followers = followers_paths
        .iter()
        .map(|path| read_export(path, ExportKind::Followers, &limits))
        .collect::<Result<Vec<_>, _>>()?;
    let following = read_export(&following_path, ExportKind::Following, &limits)?;

    Ok(LoadedExports { followers, following })
}

fn validate_exports(exports: &LoadedExports, config: &Config) -> Result<()> {
    let validator = ExportValidator::new(HrefScanner::new(config.limits.max_scan_depth));
    for part in &exports.followers {
        validator.validate_followers(part)?;
    }
    validator.validate_following(&exports.following)?;
    Ok(())
}

fn handle_error(e: anyhow::Error, json: bool) -> ! {
    if json {
        println!("{}", serde_json::json!({ "error": format!("{:#}", e) }));
    } else {
        eprintln!("Error: {:#}", e);
    }
    process::exit(1);
}
