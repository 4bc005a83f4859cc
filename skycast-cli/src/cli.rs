use std::io;
use std::process::ExitCode;

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use inquire::{CustomType, InquireError, Text, validator::Validation};
use skycast_core::{Config, DashboardError, Pipeline, source_from_config};

use crate::render::{Silent, TerminalPresenter};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "Weather and air quality dashboard")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the dashboard for one city.
    Show {
        /// City name; defaults to the configured city.
        city: Option<String>,

        /// Print the raw bundle as JSON instead of panels.
        #[arg(long)]
        json: bool,
    },

    /// Load the default city, then keep prompting for cities to look up.
    Interactive,

    /// Set the default city and request timeout.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        let mut config = Config::load()?;

        match self.command {
            Command::Configure => {
                configure(&mut config)?;
                Ok(ExitCode::SUCCESS)
            }
            Command::Show { city, json } => {
                let city = config.effective_city(city.as_deref());
                let pipeline = Pipeline::new(source_from_config(&config)?);
                show(&pipeline, &city, json).await
            }
            Command::Interactive => {
                let pipeline = Pipeline::new(source_from_config(&config)?);
                interactive(&pipeline, &config).await?;
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

async fn show(pipeline: &Pipeline, city: &str, json: bool) -> anyhow::Result<ExitCode> {
    if json {
        return match pipeline.load_city(city, &mut Silent).await {
            Ok(bundle) => {
                let text = serde_json::to_string_pretty(&bundle)
                    .context("Failed to serialize dashboard bundle")?;
                println!("{text}");
                Ok(ExitCode::SUCCESS)
            }
            Err(err) => {
                eprintln!("error: {}", err.user_message());
                Ok(ExitCode::FAILURE)
            }
        };
    }

    let mut presenter = TerminalPresenter::new(io::stdout(), io::stderr());
    match pipeline.load_city(city, &mut presenter).await {
        Ok(_) => Ok(ExitCode::SUCCESS),
        Err(_) => Ok(ExitCode::FAILURE),
    }
}

async fn interactive(pipeline: &Pipeline, config: &Config) -> anyhow::Result<()> {
    let mut presenter = TerminalPresenter::new(io::stdout(), io::stderr());
    let mut city = config.effective_city(None);

    loop {
        match pipeline.load_city(&city, &mut presenter).await {
            Ok(_) | Err(DashboardError::Cancelled) => {}
            // Already on the error surface; keep the session going.
            Err(err) => tracing::debug!(error = %err, "lookup failed"),
        }
        println!();

        let answer = Text::new("City:")
            .with_help_message("Esc to quit")
            .with_validator(|input: &str| {
                if input.trim().is_empty() {
                    Ok(Validation::Invalid("Please enter a city name".into()))
                } else {
                    Ok(Validation::Valid)
                }
            })
            .prompt_skippable();

        match answer {
            Ok(Some(next)) => city = next.trim().to_string(),
            Ok(None) | Err(InquireError::OperationInterrupted) => return Ok(()),
            Err(e) => return Err(e).context("Failed to read city"),
        }
    }
}

fn configure(config: &mut Config) -> anyhow::Result<()> {
    let current = config.effective_city(None);
    let city = Text::new("Default city:")
        .with_default(&current)
        .with_help_message("Loaded when no city is given")
        .prompt()
        .context("Failed to read default city")?;
    config.set_default_city(&city);

    let timeout = CustomType::<u64>::new("Request timeout in seconds:")
        .with_default(config.timeout_secs.unwrap_or(0))
        .with_help_message("0 waits indefinitely")
        .with_error_message("Please enter a whole number of seconds")
        .prompt()
        .context("Failed to read request timeout")?;
    config.timeout_secs = (timeout > 0).then_some(timeout);

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}
