//! CLI subcommand handlers.

use crate::Commands;
use anyhow::Context;
use chivofast_core::{ChivofastConfig, DeliveryStore, filter_usable, ingest, summarize};
use chivofast_ml::{DeliveryQuery, EstimatorSession};
use std::path::Path;

/// Handle a CLI subcommand.
pub fn handle_command(command: Commands, config: &ChivofastConfig) -> anyhow::Result<()> {
    match command {
        Commands::Ingest { file } => handle_ingest(&file, config),
        Commands::Show { limit } => handle_show(limit, config),
        Commands::Export { file } => handle_export(&file, config),
        Commands::Kpis => handle_kpis(config),
        Commands::Predict {
            zone,
            order_type,
            weather,
            traffic,
            json,
        } => handle_predict(
            DeliveryQuery {
                zone,
                order_type,
                weather,
                traffic,
            },
            json,
            config,
        ),
        Commands::Purge { yes } => handle_purge(yes, config),
    }
}

fn open_store(config: &ChivofastConfig) -> anyhow::Result<DeliveryStore> {
    DeliveryStore::open(&config.database.path)
        .with_context(|| format!("opening store at {}", config.database.path.display()))
}

fn handle_ingest(file: &Path, config: &ChivofastConfig) -> anyhow::Result<()> {
    let rows = ingest::read_csv_file(file)?;
    let total = rows.len();
    let usable = filter_usable(rows);
    let dropped = total - usable.len();

    let mut store = open_store(config)?;
    let inserted = store.append(&usable)?;
    println!(
        "Ingested {inserted} records from {} ({dropped} rows dropped for missing fields)",
        file.display()
    );
    Ok(())
}

fn handle_show(limit: usize, config: &ChivofastConfig) -> anyhow::Result<()> {
    let store = open_store(config)?;
    let records = store.fetch_all(Some(limit))?;
    if records.is_empty() {
        println!("No records stored.");
        return Ok(());
    }
    println!("zone | order_type | weather | traffic | delivery_time");
    for record in &records {
        println!(
            "{} | {} | {} | {} | {:.1}",
            record.zone, record.order_type, record.weather, record.traffic, record.delivery_time
        );
    }
    println!("({} of {} records)", records.len(), store.count()?);
    Ok(())
}

fn handle_export(file: &Path, config: &ChivofastConfig) -> anyhow::Result<()> {
    let store = open_store(config)?;
    let records = store.fetch_all(None)?;
    std::fs::write(file, ingest::to_csv(&records))
        .with_context(|| format!("writing {}", file.display()))?;
    println!("Exported {} records to {}", records.len(), file.display());
    Ok(())
}

fn handle_kpis(config: &ChivofastConfig) -> anyhow::Result<()> {
    let store = open_store(config)?;
    let records = store.fetch_all(None)?;
    let report = summarize(&records);

    println!("Total records: {}", report.total_records);
    if let Some(dt) = &report.delivery_time {
        println!(
            "Delivery time (min): mean {:.2}, min {:.1}, max {:.1}",
            dt.mean, dt.min, dt.max
        );
    }
    for (label, counts) in [
        ("Zones", &report.zone_counts),
        ("Order types", &report.order_type_counts),
        ("Weather", &report.weather_counts),
        ("Traffic", &report.traffic_counts),
    ] {
        if counts.is_empty() {
            continue;
        }
        println!("{label}:");
        for (value, count) in counts {
            println!("  {value}: {count}");
        }
    }
    Ok(())
}

fn handle_predict(query: DeliveryQuery, json: bool, config: &ChivofastConfig) -> anyhow::Result<()> {
    let store = open_store(config)?;
    let records = store.fetch_all(None)?;

    let session = EstimatorSession::with_factors(&config.factors);
    let trained = session.train(&records)?;
    let estimate = session.predict(&trained, &query)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&estimate)?);
        return Ok(());
    }
    println!(
        "Estimated delivery time: {:.2} minutes (model MAE {:.2} min on held-out data)",
        estimate.adjusted_minutes, trained.metrics.mae
    );
    println!(
        "Conditions: zone={}, order_type={}, weather={} (x{}), traffic={} (x{})",
        estimate.query.zone,
        estimate.query.order_type,
        estimate.query.weather,
        estimate.weather_multiplier,
        estimate.query.traffic,
        estimate.traffic_multiplier
    );
    Ok(())
}

fn handle_purge(yes: bool, config: &ChivofastConfig) -> anyhow::Result<()> {
    if !yes {
        anyhow::bail!("refusing to delete all records without --yes");
    }
    let store = open_store(config)?;
    let removed = store.purge()?;
    println!("Deleted {removed} records.");
    Ok(())
}
