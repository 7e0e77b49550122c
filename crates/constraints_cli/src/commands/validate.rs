use anyhow::{Context, Result, anyhow, bail};
use constraints_parser::parse_file;
use constraints_validator::FieldValidator;
use std::path::Path;
use tracing::info;

use crate::commands::load_config;
use crate::output;

/// Arguments of the `validate` command.
pub struct ValidateArgs<'a> {
    pub rules: Option<&'a str>,
    pub url: Option<&'a str>,
    pub type_name: &'a str,
    pub input: &'a str,
    pub format: &'a str,
    pub config: Option<&'a str>,
}

pub async fn execute(args: ValidateArgs<'_>) -> Result<()> {
    info!("Validating {} as type {}", args.input, args.type_name);

    let config = load_config(args.config)?;
    let validator = FieldValidator::from_config(&config);
    let text = args.format != "json";

    // Rules file first, then the remote source on top of it
    let url = args.url.or(config.rules_url.as_deref());
    if args.rules.is_none() && url.is_none() {
        bail!("No constraints given: pass a rules file, --url or set FCE_RULES_URL");
    }

    if let Some(rules_path) = args.rules {
        let constraints = parse_file(Path::new(rules_path))
            .with_context(|| format!("Failed to parse rules file: {}", rules_path))?;
        if text {
            output::print_info(&format!(
                "Rules loaded: {} types, {} constraints",
                constraints.len(),
                constraints.constraint_count()
            ));
        }
        validator.add_constraints(constraints);
    }

    if let Some(url) = url {
        if text {
            output::print_info(&format!("Fetching constraints from {}", url));
        }
        validator
            .load_from_url(url)
            .await
            .with_context(|| format!("Failed to load constraints from {}", url))?;
    }

    // Read the record
    let content = std::fs::read_to_string(args.input)
        .with_context(|| format!("Failed to read input file: {}", args.input))?;
    let value: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse input file as JSON: {}", args.input))?;
    let record = value
        .as_object()
        .ok_or_else(|| anyhow!("Input must be a JSON object: {}", args.input))?;

    if text && !validator.with_constraints(|map| map.contains_type(args.type_name)) {
        output::print_warning(&format!(
            "No validation rules for type '{}', every field passes",
            args.type_name
        ));
    }

    let report = validator
        .validate_record(args.type_name, record)
        .context("Validation failed")?;

    // Print the validation report
    output::print_record_report(&report, args.format)?;

    if !report.valid {
        std::process::exit(1);
    }

    Ok(())
}
