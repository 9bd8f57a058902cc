use anyhow::{Context, Result};
use billmap_ingest::read_sample;
use billmap_map::SuggestionEngine;
use billmap_model::InternalSchema;
use tracing::info_span;

use billmap_cli::pipeline::{StoreTarget, ingest_file, resolve_file};
use billmap_cli::report::{fields_table, mapping_table, print_outcome, suggestions_table};
use billmap_cli::settings::EngineSettings;

use crate::cli::{IngestArgs, ResolveArgs, StoreArgs, SuggestArgs};

pub fn run_fields() -> Result<()> {
    println!("{}", fields_table(InternalSchema::focus()));
    Ok(())
}

pub fn run_suggest(args: &SuggestArgs, settings: &EngineSettings) -> Result<()> {
    let sample = read_sample(&args.csv, args.sample).context("read CSV sample")?;
    let schema = InternalSchema::focus();
    let engine = SuggestionEngine::new(settings.tables(), schema).with_config(settings.config);
    let columns = info_span!("suggest", file = %args.csv.display()).in_scope(|| {
        engine.suggest(&sample.headers, &sample.rows, &schema.field_names())
    });
    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&columns).context("serialize suggestions")?
        );
    } else {
        println!("{}", suggestions_table(&columns));
    }
    Ok(())
}

pub fn run_ingest(args: &IngestArgs, settings: &EngineSettings) -> Result<()> {
    let report = ingest_file(
        &args.csv,
        &store_target(&args.store),
        args.upload_id.as_deref(),
        args.sample,
        args.output.as_deref(),
        settings,
    )?;

    if args.json {
        let outcome = &report.outcome;
        let json = serde_json::json!({
            "upload_id": report.upload_id,
            "mapping": outcome.mapping,
            "suggestions": outcome.suggestions,
            "confirmed_fields": outcome.confirmed_fields,
            "rows_written": report.rows_written,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&json).context("serialize outcome")?
        );
    } else {
        println!("Upload: {}", report.upload_id);
        print_outcome(&report.outcome);
    }
    Ok(())
}

pub fn run_resolve(args: &ResolveArgs, settings: &EngineSettings) -> Result<()> {
    let mapping = resolve_file(&args.csv, &store_target(&args.store), settings)?;
    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&mapping).context("serialize mapping")?
        );
    } else {
        println!("{}", mapping_table(&mapping));
        println!(
            "Resolved {} of {} fields",
            mapping.resolved_count(),
            mapping.len()
        );
    }
    Ok(())
}

fn store_target(args: &StoreArgs) -> StoreTarget<'_> {
    StoreTarget {
        tenant: &args.tenant,
        provider: &args.provider,
        root: &args.store,
    }
}
