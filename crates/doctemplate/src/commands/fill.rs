//! Fill command - resolve placeholders and write filled documents

use crate::cli::FillArgs;
use crate::context::Context;
use anyhow::{Context as _, Result, bail};
use colored::Colorize;
use doctemplate_core::{
    Driver,
    cache::{Bindings, ValueCache, merge},
    document::{open_document, output_path},
    eval::ScriptEnvironment,
    prompt::{ConsolePrompt, PresetValues, parse_pairs},
};
use std::fs;
use std::path::Path;

/// Fill each template in order
///
/// The first failing template stops the command; templates filled before it
/// keep their output.
pub fn run(args: FillArgs, verbose: bool) -> Result<()> {
    let ctx = Context::new(verbose)?;
    let presets = parse_pairs(&args.set)?;

    for template in &args.templates {
        fill_template(&ctx, &args, &presets, template)
            .with_context(|| format!("Failed to fill {}", template.display()))?;
    }

    Ok(())
}

fn fill_template(ctx: &Context, args: &FillArgs, presets: &Bindings, template: &Path) -> Result<()> {
    if !template.is_file() {
        bail!("Template not found: {}", template.display());
    }

    let output = output_path(template, &ctx.config.output, args.output_dir.as_deref())?;
    let cache = ValueCache::for_template(template, &ctx.config.cache.extension);
    let cached = if args.no_cache {
        if cache.exists() {
            tracing::warn!(path = %cache.path().display(), "ignoring saved values");
        }
        Bindings::new()
    } else {
        cache.load()?
    };

    let document = open_document(template);
    let body = document.read_text()?;

    println!("{} Filling {}", "→".cyan(), template.display());
    if ctx.verbose && !cached.is_empty() {
        println!("  {} saved value(s) from {}", cached.len(), cache.path().display());
    }

    let source = PresetValues::new(presets.clone(), ConsolePrompt::stdio());
    let filled = Driver::new(ScriptEnvironment::new(&ctx.locale), source)
        .with_encoding(document.encoding())
        .run(&body, &cached)?;

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    document.write_text(&output, &filled.text)?;

    if args.save {
        // A template whose values cannot be saved leaves no output behind
        if let Err(e) = save_values(&cache, &cached, filled.entered.as_bindings(), args.no_cache) {
            if let Err(remove_err) = fs::remove_file(&output) {
                tracing::warn!(path = %output.display(), error = %remove_err, "failed to remove output");
            }
            return Err(e);
        }
    }

    println!("{} Wrote {}", "✓".green(), output.display());
    Ok(())
}

fn save_values(cache: &ValueCache, cached: &Bindings, entered: &Bindings, no_cache: bool) -> Result<()> {
    if entered.is_empty() {
        println!("  no new values to save");
        return Ok(());
    }

    if no_cache && cache.exists() {
        tracing::warn!(path = %cache.path().display(), "overwriting saved values");
    }

    cache.save(&merge(cached, entered))?;
    println!(
        "{} Saved {} value(s) to {}",
        "✓".green(),
        entered.len(),
        cache.path().display()
    );
    Ok(())
}
