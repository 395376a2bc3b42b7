//! Scan command - list placeholders without filling

use crate::output::{print_json, print_text};
use anyhow::{Result, bail};
use colored::Colorize;
use doctemplate_core::{document::open_document, template};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Serialize)]
struct ScanReport<'a> {
    template: String,
    placeholders: Vec<PlaceholderEntry<'a>>,
}

#[derive(Serialize)]
struct PlaceholderEntry<'a> {
    raw: &'a str,
    kind: &'static str,
    expression: &'a str,
    line: usize,
}

pub fn run(template: PathBuf, json: bool) -> Result<()> {
    if !template.is_file() {
        bail!("Template not found: {}", template.display());
    }

    let body = open_document(&template).read_text()?;
    let tokens = template::scan(&body);

    if json {
        let report = ScanReport {
            template: template.display().to_string(),
            placeholders: tokens
                .iter()
                .map(|token| PlaceholderEntry {
                    raw: token.raw(),
                    kind: token.kind().as_str(),
                    expression: token.expression(),
                    line: token.line(),
                })
                .collect(),
        };
        return print_json(&report);
    }

    if tokens.is_empty() {
        print_text(&format!("No placeholders in {}", template.display()))?;
        return Ok(());
    }

    print_text(&format!(
        "{} {} placeholder(s) in {}",
        "→".cyan(),
        tokens.len(),
        template.display()
    ))?;
    for token in &tokens {
        print_text(&format!(
            "  {:<8} {}  (line {})",
            token.kind().as_str(),
            token.expression(),
            token.line()
        ))?;
    }

    Ok(())
}
