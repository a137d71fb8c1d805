mod browse_cmd;
mod config;
mod data_cmd;
mod seed_cmd;
mod validate_cmd;

use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser, Subcommand};

use coursehub_core::profile::{CuLoadPreference, StudentProfile, WaiverConfig};
use coursehub_data::ReferenceTables;

use config::{AppConfig, OutputFormat};

#[derive(Parser)]
#[command(name = "coursehub", about = "MBA degree-plan validator")]
struct Cli {
    /// Dataset directory (overrides COURSEHUB_DATA_DIR env var)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output format (overrides COURSEHUB_FORMAT env var)
    #[arg(long, value_enum, global = true)]
    format: Option<OutputFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a coursehub config file
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Validate a plan file
    Validate {
        /// Path to the plan TOML file
        plan: PathBuf,
        /// Exit with an error when the plan is invalid
        #[arg(long)]
        strict: bool,
    },
    /// Generate a starting plan file from a student profile
    Seed {
        /// Declared major code (repeatable)
        #[arg(long = "major")]
        majors: Vec<String>,
        /// Core waiver as CODE:TYPE[:COURSE] (repeatable)
        #[arg(long = "waiver", value_parser = seed_cmd::parse_waiver_arg)]
        waivers: Vec<WaiverConfig>,
        /// Course load preference: light, normal, or heavy
        #[arg(long, default_value_t = CuLoadPreference::Normal)]
        load: CuLoadPreference,
        /// Write the plan file here instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// List core requirements
    Cores,
    /// List majors
    Majors,
    /// Show a catalog course and what it counts toward
    Course {
        /// Course ID, e.g. FNCE6110
        id: String,
    },
    /// Dataset maintenance
    Data {
        #[command(subcommand)]
        command: DataCommands,
    },
    /// Print shell completions
    Completions {
        /// Target shell
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
pub enum DataCommands {
    /// Check that every requirement course resolves in the catalog
    Check,
}

/// Execute the `coursehub init` command: write the config file.
fn cmd_init(data_dir: Option<&Path>, format: Option<OutputFormat>, force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let cfg = config::ConfigFile {
        data: config::DataSection {
            dir: data_dir.map(Path::to_path_buf),
        },
        output: config::OutputSection {
            format: format.unwrap_or_default(),
        },
    };

    config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    match &cfg.data.dir {
        Some(dir) => println!("  data.dir = {}", dir.display()),
        None => println!("  data.dir = (embedded datasets)"),
    }
    println!("  output.format = {}", cfg.output.format);
    println!();
    println!("Next: run `coursehub seed --output plan.toml` to start a plan.");

    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let load = || -> anyhow::Result<(ReferenceTables, OutputFormat)> {
        let resolved = AppConfig::resolve(cli.data_dir.as_deref(), cli.format)?;
        tracing::debug!(data_dir = ?resolved.data_dir, format = %resolved.format, "resolved config");
        Ok((resolved.load_reference()?, resolved.format))
    };

    match cli.command {
        Commands::Init { force } => {
            cmd_init(cli.data_dir.as_deref(), cli.format, force)?;
        }
        Commands::Validate { plan, strict } => {
            let (reference, format) = load()?;
            validate_cmd::run_validate(&reference, &plan, format, strict)?;
        }
        Commands::Seed {
            majors,
            waivers,
            load: cu_load_preference,
            output,
        } => {
            let (reference, _) = load()?;
            let profile = StudentProfile {
                majors,
                cu_load_preference,
                waivers,
            };
            seed_cmd::run_seed(&reference, profile, output.as_deref())?;
        }
        Commands::Cores => {
            let (reference, format) = load()?;
            browse_cmd::run_cores(&reference, format)?;
        }
        Commands::Majors => {
            let (reference, format) = load()?;
            browse_cmd::run_majors(&reference, format)?;
        }
        Commands::Course { id } => {
            let (reference, format) = load()?;
            browse_cmd::run_course(&reference, &id, format)?;
        }
        Commands::Data {
            command: DataCommands::Check,
        } => {
            let (reference, format) = load()?;
            data_cmd::run_check(&reference, format)?;
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "coursehub", &mut std::io::stdout());
        }
    }

    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_seed_arguments() {
        let cli = Cli::try_parse_from([
            "coursehub",
            "seed",
            "--major",
            "FNCE",
            "--major",
            "MKTG",
            "--waiver",
            "STAT_CORE:placement",
            "--load",
            "heavy",
        ])
        .unwrap();
        match cli.command {
            Commands::Seed {
                majors,
                waivers,
                load,
                output,
            } => {
                assert_eq!(majors, vec!["FNCE", "MKTG"]);
                assert_eq!(waivers.len(), 1);
                assert_eq!(waivers[0].core_code, "STAT_CORE");
                assert_eq!(load, CuLoadPreference::Heavy);
                assert!(output.is_none());
            }
            _ => panic!("expected seed command"),
        }
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli = Cli::try_parse_from([
            "coursehub",
            "validate",
            "plan.toml",
            "--format",
            "json",
            "--data-dir",
            "/tmp/data",
        ])
        .unwrap();
        assert_eq!(cli.format, Some(OutputFormat::Json));
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/data")));
        assert!(matches!(cli.command, Commands::Validate { strict: false, .. }));
    }

    #[test]
    fn rejects_malformed_waiver() {
        let result = Cli::try_parse_from(["coursehub", "seed", "--waiver", "STAT_CORE"]);
        assert!(result.is_err());
    }
}
