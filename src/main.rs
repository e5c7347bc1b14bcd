// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use hlgen::backends::CommandEngine;
use hlgen::config::{load_project_settings, Settings};
use hlgen::engine::EngineFactory;
use hlgen::enumerator::{Configuration, Enumeration, Enumerator, KeyPolicy};
use hlgen::errors::FailureStrategy;
use hlgen::project::{
    add_configuration, create_project, halide_directory, remove_configuration, render_table,
    Table,
};
use hlgen::sources::{bindings_from_env, discover_generators, MakefileSource};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hlgen")]
#[command(version)]
#[command(about = "Enumerate, edit and build generator configurations of a project")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Settings file (default: hlgen.yaml, hlgen.yml or hlgen.toml in the project directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Project directory
    #[arg(short = 'C', long, global = true, default_value = ".")]
    project_dir: PathBuf,

    /// Default target for configurations without `target=` (overrides HL_TARGET)
    #[arg(short, long, global = true)]
    target: Option<String>,

    /// Skip malformed bindings instead of aborting
    #[arg(long, global = true)]
    lenient: bool,

    /// Read CFG__ bindings from the environment instead of the Makefile
    #[arg(long, global = true)]
    from_env: bool,

    /// Verbose output (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a project directory with a Makefile and a generator stub
    New {
        /// Project name, also the name of its first generator
        name: String,

        /// Halide distribution for the Makefile (default: $HALIDE_DISTRIB_PATH or /opt/halide)
        #[arg(long)]
        halide_dir: Option<String>,
    },

    /// List generators and their configurations
    List,

    /// Show what a build would run for each configuration
    Plan {
        #[arg(short, long, value_enum, default_value_t = PlanFormat::Table)]
        format: PlanFormat,
    },

    /// Build every configuration
    Build {
        /// Report what would be built without running anything
        #[arg(long)]
        dry_run: bool,

        /// Maximum number of concurrent builds
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Keep building after a failure
        #[arg(long)]
        continue_on_error: bool,
    },

    /// Add a configuration to the Makefile
    Add {
        generator: String,

        /// Configuration name; the default configuration when omitted
        #[arg(short, long)]
        suffix: Option<String>,

        /// Explicit target for this configuration
        #[arg(long = "build-target")]
        build_target: Option<String>,

        /// Generator parameters
        params: Vec<String>,
    },

    /// Remove a configuration from the Makefile
    Remove {
        generator: String,

        /// Configuration name; the default configuration when omitted
        #[arg(short, long)]
        suffix: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PlanFormat {
    Table,
    Json,
}

#[derive(Serialize)]
struct PlanEntry<'a> {
    #[serde(flatten)]
    configuration: &'a Configuration,
    command: Vec<String>,
}

fn setup_logging(verbose: u8) -> Result<()> {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set subscriber")
}

fn load_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = load_project_settings(cli.config.as_deref(), &cli.project_dir)
        .context("Failed to load settings")?
        .with_env_overrides(std::env::vars());
    if let Some(target) = &cli.target {
        settings.default_target = Some(target.clone());
    }
    if cli.lenient {
        settings.policy = KeyPolicy::Lenient;
    }
    Ok(settings)
}

fn makefile_path(cli: &Cli, settings: &Settings) -> PathBuf {
    cli.project_dir.join(&settings.makefile)
}

fn enumerate(cli: &Cli, settings: &Settings) -> Result<Enumeration> {
    let bindings = if cli.from_env {
        bindings_from_env()
    } else {
        let path = makefile_path(cli, settings);
        MakefileSource::load(&path)
            .with_context(|| format!("Is {:?} a project directory?", cli.project_dir))?
            .bindings()
            .clone()
    };

    let known = match &settings.generator_dir {
        Some(dir) => Some(
            discover_generators(cli.project_dir.join(dir))
                .context("Failed to discover generators")?,
        ),
        None => None,
    };

    let enumeration = Enumerator::new(settings.enumerate_options(known))
        .enumerate(&bindings)
        .context("Failed to enumerate configurations")?;

    for rejected in &enumeration.rejected {
        eprintln!("skipped: {}", rejected.error);
    }
    Ok(enumeration)
}

fn print_plan(
    enumeration: &Enumeration,
    settings: &Settings,
    project_dir: &Path,
    format: PlanFormat,
) -> Result<()> {
    let engine = CommandEngine::from_template(settings.build.command_template())?
        .in_dir(project_dir);
    let entries: Vec<PlanEntry> = enumeration
        .configurations()
        .map(|configuration| {
            let mut command = vec![engine.program().to_string()];
            command.extend(engine.arguments(configuration));
            PlanEntry {
                configuration,
                command,
            }
        })
        .collect();

    match format {
        PlanFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        PlanFormat::Table => {
            let mut table = Table::new();
            table.add_row(["ARTIFACT", "TARGET", "COMMAND"]);
            for entry in &entries {
                table.add_row([
                    entry.configuration.artifact.clone(),
                    entry.configuration.target.clone(),
                    entry.command.join(" "),
                ]);
            }
            print!("{}", table);
        }
    }
    Ok(())
}

async fn build(
    enumeration: &Enumeration,
    mut settings: Settings,
    project_dir: &Path,
    dry_run: bool,
    jobs: Option<usize>,
    continue_on_error: bool,
) -> Result<()> {
    if jobs.is_some() {
        settings.build.max_concurrency = jobs;
    }
    if continue_on_error {
        settings.build.failure_strategy = FailureStrategy::ContinueOnError;
    }

    let engine = EngineFactory::from_settings(&settings, project_dir, dry_run)?;
    let report = EngineFactory::executor(&settings)
        .execute(enumeration, engine, settings.build.failure_strategy)
        .await
        .context("Build failed")?;

    for outcome in &report.succeeded {
        if dry_run {
            println!("{}", outcome.output);
        } else {
            println!("built {} in {:.2?}", outcome.artifact, outcome.duration);
        }
    }
    for failure in &report.failed {
        eprintln!("failed {}: {}", failure.artifact, failure.error);
    }

    if !report.is_success() {
        bail!(
            "{} of {} configuration(s) failed",
            report.failed.len(),
            enumeration.configuration_count()
        );
    }
    Ok(())
}

fn binding_value(build_target: Option<&str>, params: &[String]) -> String {
    build_target
        .map(|target| format!("target={}", target))
        .into_iter()
        .chain(params.iter().cloned())
        .collect::<Vec<_>>()
        .join(" ")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    if let Commands::New { name, halide_dir } = &cli.command {
        let halide_dir = halide_dir.clone().unwrap_or_else(halide_directory);
        let dir = create_project(&cli.project_dir, name, &halide_dir)
            .with_context(|| format!("Failed to create project '{}'", name))?;
        println!("created {}", dir.display());
        return Ok(());
    }

    let settings = load_settings(&cli)?;

    match &cli.command {
        Commands::New { .. } => {}

        Commands::List => {
            let enumeration = enumerate(&cli, &settings)?;
            print!("{}", render_table(&enumeration));
        }

        Commands::Plan { format } => {
            let enumeration = enumerate(&cli, &settings)?;
            print_plan(&enumeration, &settings, &cli.project_dir, *format)?;
        }

        Commands::Build {
            dry_run,
            jobs,
            continue_on_error,
        } => {
            let enumeration = enumerate(&cli, &settings)?;
            build(
                &enumeration,
                settings.clone(),
                &cli.project_dir,
                *dry_run,
                *jobs,
                *continue_on_error,
            )
            .await?;
        }

        Commands::Add {
            generator,
            suffix,
            build_target,
            params,
        } => {
            let path = makefile_path(&cli, &settings);
            let value = binding_value(build_target.as_deref(), params);
            let edit = add_configuration(&path, generator, suffix.as_deref(), &value)
                .with_context(|| format!("Failed to add configuration to {}", path.display()))?;
            if edit.changed {
                println!("added at {}:{}", path.display(), edit.line);
            } else {
                println!("already present at {}:{}", path.display(), edit.line);
            }
        }

        Commands::Remove { generator, suffix } => {
            let path = makefile_path(&cli, &settings);
            let edit = remove_configuration(&path, generator, suffix.as_deref()).with_context(
                || format!("Failed to remove configuration from {}", path.display()),
            )?;
            println!("removed from {}:{}", path.display(), edit.line);
        }
    }

    Ok(())
}
