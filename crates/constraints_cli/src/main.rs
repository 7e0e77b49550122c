mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "fce")]
#[command(version, about = "Field Constraints Engine CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a JSON record against the constraints of a type
    Validate {
        /// Path to the rules file (JSON, YAML or TOML)
        rules: Option<String>,

        /// Load constraints from this URL (after the rules file, if any)
        #[arg(short, long, env = "FCE_RULES_URL")]
        url: Option<String>,

        /// Type name the record is validated as
        #[arg(short = 't', long = "type")]
        type_name: String,

        /// Path to the JSON record to validate
        #[arg(short, long)]
        input: String,

        /// Output format: text, json
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Path to an engine configuration file
        #[arg(short, long)]
        config: Option<String>,
    },

    /// Check a rules file without validating data
    Check {
        /// Path to the rules file (JSON, YAML or TOML)
        rules: String,

        /// Output format: text, json
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Path to an engine configuration file
        #[arg(short, long)]
        config: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true)
                .compact(),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    // Execute command
    match cli.command {
        Commands::Validate {
            rules,
            url,
            type_name,
            input,
            format,
            config,
        } => {
            let args = commands::validate::ValidateArgs {
                rules: rules.as_deref(),
                url: url.as_deref(),
                type_name: &type_name,
                input: &input,
                format: &format,
                config: config.as_deref(),
            };
            commands::validate::execute(args).await
        }

        Commands::Check {
            rules,
            format,
            config,
        } => commands::check::execute(&rules, &format, config.as_deref()),
    }
}
