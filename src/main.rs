use anyhow::Result;
use tracing::info;

use histsketch::store::HistoryStore;
use histsketch::{cli, config, logging, output, pipeline, util};

fn main() -> Result<()> {
    let cli_opts = cli::parse();
    logging::init_logging(cli_opts.log_json);

    let loaded = config::load_config(cli_opts.config_path.as_deref())?;
    let cfg = loaded.config;
    let explicit = cli_opts.browser.map(util::engine_from_cli);

    info!(
        "starting run_id={} input={} output={} engine={}",
        cfg.run_id,
        cli_opts.input.display(),
        cli_opts.output.display(),
        explicit.map_or("auto", |e| e.name())
    );

    let store = HistoryStore::open_read_only(&cli_opts.input)?;

    let source_sha256 = if cli_opts.hash_source {
        let hash = util::sha256_file(&cli_opts.input)?;
        info!("source sha256={hash}");
        Some(hash)
    } else {
        None
    };

    let engine = pipeline::resolve_engine(&store, explicit)?;

    let mut extraction =
        pipeline::prepare(&store, &cfg, engine, cli_opts.browser_name.as_deref())?;
    let mut sink = output::build_sink(util::format_from_cli(cli_opts.format), &cli_opts.output)?;
    let conversion = pipeline::convert(&mut extraction, sink.as_mut())?;
    drop(extraction);
    drop(store);

    if let Some(summary_path) = cli_opts.summary.as_deref() {
        let summary = pipeline::RunSummary {
            run_id: cfg.run_id.clone(),
            engine: conversion.engine,
            data_type: conversion.data_type.clone(),
            source_path: cli_opts.input.clone(),
            source_sha256,
            rows_read: conversion.stats.rows_read,
            records_written: conversion.stats.records,
            invalid_timestamps_skipped: conversion.stats.invalid_timestamps,
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            config_hash: loaded.config_hash.clone(),
        };
        pipeline::write_summary(summary_path, &summary)?;
        info!("run summary saved to {}", summary_path.display());
    }

    info!(
        "wrote {} records to {} ({} skipped for invalid timestamps)",
        conversion.stats.records,
        cli_opts.output.display(),
        conversion.stats.invalid_timestamps
    );
    Ok(())
}
