use anyhow::Context;
use clap::{Parser, Subcommand};
use country_core::{Config, Lookup, render};
use inquire::{CustomType, Password, PasswordDisplayMode};
use serde::Serialize;

use crate::browse;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "countries", version, about = "Country lookup with current weather")]
pub struct Cli {
    /// Log provider requests and absorbed failures to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the weather API key and HTTP timeout.
    Configure,

    /// Print up to five country names matching a partial name.
    Suggest {
        /// At least two characters of a country name.
        partial: String,
    },

    /// List countries matching a name.
    Search {
        name: String,

        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Show details and current weather for one country.
    Show {
        name: String,

        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Search interactively with live suggestions.
    Browse,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure()?,
            Command::Suggest { partial } => {
                for name in lookup_from_config()?.suggest(&partial).await {
                    println!("{name}");
                }
            }
            Command::Search { name, json } => {
                let found = lookup_from_config()?.search(&name).await?;
                if json {
                    print_json(&found)?;
                } else {
                    println!("{}", render::ResultList(&found));
                }
            }
            Command::Show { name, json } => {
                let detail = lookup_from_config()?.detail(&name).await?;
                if json {
                    print_json(&detail)?;
                } else {
                    println!("{}", render::DetailView(&detail));
                }
            }
            Command::Browse => {
                let lookup = lookup_from_config()?;
                let handle = tokio::runtime::Handle::current();
                tokio::task::spawn_blocking(move || browse::run(handle, lookup))
                    .await
                    .context("Interactive session panicked")??;
            }
        }

        Ok(())
    }
}

fn lookup_from_config() -> anyhow::Result<Lookup> {
    let config = Config::load()?;
    Lookup::from_config(&config)
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("Leave empty to keep the current key")
        .prompt()?;

    if !api_key.trim().is_empty() {
        config.set_weather_api_key(api_key.trim().to_string());
    }

    config.http.timeout_secs = CustomType::<u64>::new("HTTP timeout (seconds):")
        .with_default(config.http.timeout_secs)
        .with_error_message("Please enter a whole number of seconds")
        .prompt()?;

    config.validate()?;
    let path = config.save()?;

    println!("Saved configuration to {}", path.display());
    if !config.is_weather_configured() {
        println!("No weather API key set; details will show without weather.");
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{out}");
    Ok(())
}
