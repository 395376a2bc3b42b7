//! Cache commands - inspect and remove saved values

use crate::context::Context;
use crate::output::{print_json, print_text};
use anyhow::Result;
use colored::Colorize;
use doctemplate_core::cache::ValueCache;
use std::path::PathBuf;

/// Print the values saved for `template`
pub fn show(template: PathBuf, json: bool, verbose: bool) -> Result<()> {
    let ctx = Context::new(verbose)?;
    let cache = ValueCache::for_template(&template, &ctx.config.cache.extension);
    let values = cache.load()?;

    if json {
        return print_json(&values);
    }

    if values.is_empty() {
        print_text(&format!("No saved values for {}", template.display()))?;
        return Ok(());
    }

    print_text(&format!(
        "{} Saved values in {}",
        "→".cyan(),
        cache.path().display()
    ))?;
    for (name, value) in &values {
        print_text(&format!("  {} = {}", name, value))?;
    }

    Ok(())
}

/// Remove the cache file of `template`; a missing file is not an error
pub fn clear(template: PathBuf, verbose: bool) -> Result<()> {
    let ctx = Context::new(verbose)?;
    let cache = ValueCache::for_template(&template, &ctx.config.cache.extension);

    if cache.clear()? {
        print_text(&format!("{} Removed {}", "✓".green(), cache.path().display()))?;
    } else {
        print_text(&format!("{} No saved values at {}", "!".yellow(), cache.path().display()))?;
    }

    Ok(())
}
