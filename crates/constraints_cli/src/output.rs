use anyhow::Result;
use colored::*;
use constraints_validator::RecordReport;
use serde_json::json;

pub fn print_record_report(report: &RecordReport, format: &str) -> Result<()> {
    match format {
        "json" => print_json_report(report),
        _ => {
            print_text_report(report);
            Ok(())
        }
    }
}

fn print_text_report(report: &RecordReport) {
    println!("\n{}", "═".repeat(60));
    println!("{}", format!("  VALIDATION REPORT: {}", report.type_name).bold());
    println!("{}", "═".repeat(60));

    if report.valid {
        println!(
            "\n{} {}",
            "✓".green().bold(),
            "Validation PASSED".green().bold()
        );
    } else {
        println!(
            "\n{} {}",
            "✗".red().bold(),
            "Validation FAILED".red().bold()
        );
    }

    if !report.fields.is_empty() {
        println!("\n{}", "Fields:".bold());
        for (field, result) in &report.fields {
            if result.valid {
                println!("  {} {}", "✓".green(), field);
            } else {
                println!("  {} {}", "✗".red(), field.red());
                for violation in result.violations() {
                    println!(
                        "      {} {}",
                        format!("[{}]", violation.validator).dimmed(),
                        violation.render().red()
                    );
                }
            }
        }
    }

    println!("\n{}", "Summary:".bold());
    println!("  Fields checked: {}", report.fields.len());
    println!("  Violations:     {}", report.violation_count());
    println!("{}", "═".repeat(60));
}

fn print_json_report(report: &RecordReport) -> Result<()> {
    let violations: Vec<_> = report
        .violations()
        .map(|v| {
            json!({
                "field": v.field,
                "validator": v.validator,
                "message": v.render(),
                "value": v.value,
            })
        })
        .collect();

    let output = json!({
        "type": report.type_name,
        "valid": report.valid,
        "fields": report.fields,
        "violations": violations,
        "summary": {
            "field_count": report.fields.len(),
            "violation_count": report.violation_count(),
        }
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message.green());
}

pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message.yellow());
}

pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}
