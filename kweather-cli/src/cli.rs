use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Text};
use kweather_core::{Config, REGIONS, ToolPayload, WeatherService, kst_now};

use crate::format::format_report;

const EXIT_WORD: &str = "exit";

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "kweather", version, about = "Korean grid forecast CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the data.go.kr service key in the config file.
    Configure {
        /// Service key; prompted for when omitted.
        #[arg(long)]
        api_key: Option<String>,
    },

    /// Show the forecast for a supported region.
    Show {
        /// Region name, e.g. "서울" or "은평구".
        location: String,

        /// Korean local time to query as, "YYYY-MM-DD HH:MM"; defaults to now.
        #[arg(long)]
        at: Option<String>,

        /// Print the raw JSON payload instead of a summary.
        #[arg(long)]
        json: bool,
    },

    /// List supported regions and their grid coordinates.
    Regions,

    /// Run the `get_weather` tool with JSON arguments and print its payload.
    Tool {
        /// e.g. '{"location": "부산"}'
        arguments: String,
    },

    /// Ask for regions one after another until "exit".
    Interactive,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure { api_key } => configure(api_key),
            Command::Show { location, at, json } => {
                let now = match at {
                    Some(at) => parse_local_time(&at)?,
                    None => kst_now(),
                };
                let service = service()?;
                let result = service.get_weather_at(&location, now).await;

                if json {
                    println!("{}", ToolPayload::from(result).to_json());
                } else {
                    match result {
                        Ok(report) => print!("{}", format_report(&report)),
                        Err(err) => println!("{err}"),
                    }
                }
                Ok(())
            }
            Command::Regions => {
                for region in REGIONS {
                    println!("{}\tnx={}\tny={}", region.name, region.grid_x, region.grid_y);
                }
                Ok(())
            }
            Command::Tool { arguments } => {
                println!("{}", service()?.call_tool(&arguments).await);
                Ok(())
            }
            Command::Interactive => interactive().await,
        }
    }
}

fn service() -> Result<WeatherService> {
    let config = Config::resolve()?;
    WeatherService::from_config(&config)
}

fn configure(api_key: Option<String>) -> Result<()> {
    let api_key = match api_key {
        Some(key) => key,
        None => Password::new("data.go.kr service key:")
            .with_display_mode(PasswordDisplayMode::Masked)
            .without_confirmation()
            .prompt()
            .context("Failed to read service key")?,
    };

    let mut config = Config::load()?;
    config.set_api_key(api_key);
    let path = config.save()?;

    println!("Saved configuration to {}", path.display());
    Ok(())
}

async fn interactive() -> Result<()> {
    let service = service()?;
    let names: Vec<&str> = REGIONS.iter().map(|r| r.name).collect();

    println!("지역 이름을 입력하세요 (종료하려면 '{EXIT_WORD}' 입력)");
    println!("사용 가능한 지역: {}", names.join(", "));

    loop {
        let input = Text::new("지역:").prompt().context("Failed to read input")?;
        if input.trim().eq_ignore_ascii_case(EXIT_WORD) {
            println!("대화를 종료합니다.");
            return Ok(());
        }

        match service.get_weather(input.trim()).await {
            Ok(report) => print!("{}", format_report(&report)),
            Err(err) => println!("{err}"),
        }
    }
}

fn parse_local_time(value: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M")
        .with_context(|| format!("Invalid time '{value}', expected \"YYYY-MM-DD HH:MM\""))
}
