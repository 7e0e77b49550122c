use anyhow::{Context, Result};
use constraints_parser::parse_file;
use constraints_validator::RegistryBuilder;
use serde_json::json;
use std::path::Path;
use tracing::info;

use crate::commands::load_config;
use crate::output;

pub fn execute(rules_path: &str, format: &str, config_path: Option<&str>) -> Result<()> {
    info!("Checking rules file: {}", rules_path);

    let config = load_config(config_path)?;
    let registry = RegistryBuilder::from_config(&config).build();

    // Parse the rules file
    let path = Path::new(rules_path);
    let constraints = parse_file(path)
        .with_context(|| format!("Failed to parse rules file: {}", rules_path))?;

    // Validator names nothing is registered under are skipped at validation time
    let mut unknown = Vec::new();
    for (type_name, fields) in constraints.iter() {
        for (field, field_constraints) in fields {
            for name in field_constraints.names() {
                if !registry.contains(name) {
                    unknown.push(format!("{}.{}: {}", type_name, field, name));
                }
            }
        }
    }

    if format == "json" {
        let types: serde_json::Map<String, serde_json::Value> = constraints
            .iter()
            .map(|(type_name, fields)| {
                let fields: serde_json::Map<String, serde_json::Value> = fields
                    .iter()
                    .map(|(field, c)| (field.clone(), json!(c.names().collect::<Vec<_>>())))
                    .collect();
                (type_name.clone(), serde_json::Value::Object(fields))
            })
            .collect();

        let summary = json!({
            "valid": true,
            "types": types,
            "unknown_validators": unknown,
            "summary": {
                "type_count": constraints.len(),
                "constraint_count": constraints.constraint_count(),
            }
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    output::print_info(&format!(
        "Rules loaded: {} types, {} constraints",
        constraints.len(),
        constraints.constraint_count()
    ));

    // Rules parsed successfully means the file is well formed
    output::print_success("Rules file is valid");

    // Print rules summary
    println!("\nRules Summary:");
    println!("  Types:       {}", constraints.len());
    println!(
        "  Fields:      {}",
        constraints.iter().map(|(_, fields)| fields.len()).sum::<usize>()
    );
    println!("  Constraints: {}", constraints.constraint_count());

    for (type_name, fields) in constraints.iter() {
        println!("\n{}:", type_name);
        if fields.is_empty() {
            println!("  (no fields)");
        }
        for (field, field_constraints) in fields {
            let names = field_constraints.names().collect::<Vec<_>>();
            if names.is_empty() {
                println!("  {:<20} (none)", field);
            } else {
                println!("  {:<20} {}", field, names.join(", "));
            }
        }
    }

    if !unknown.is_empty() {
        println!();
        for entry in &unknown {
            output::print_warning(&format!("Unknown validator {}", entry));
        }
    }

    Ok(())
}
