//! Process command - run the pipeline over a payload file or a CSV directory.

use std::fs;
use std::path::{Path, PathBuf};

use colored::Colorize;
use garimpo::{Garimpo, GarimpoConfig, Payload, RawRecord};

pub fn run(
    input: Option<PathBuf>,
    csv_dir: Option<PathBuf>,
    output: Option<PathBuf>,
    max_rows: usize,
    iqr_factor: f64,
    pretty: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let payload = match (input, csv_dir) {
        (Some(file), None) => load_json_payload(&file)?,
        (None, Some(dir)) => load_csv_payload(&dir)?,
        _ => return Err("provide either a payload FILE or --csv-dir".into()),
    };

    println!(
        "{} {} rows across {} entities",
        "Processing".cyan().bold(),
        payload.total_rows().to_string().white().bold(),
        payload.entities.len()
    );

    let garimpo = Garimpo::with_config(GarimpoConfig {
        max_total_rows: max_rows,
        iqr_factor,
    });
    let result = garimpo.process(&payload)?;

    for (entity, batch) in &result.data {
        println!("  {:14} {} records", entity, batch.len().to_string().white());
    }
    let orphan_total: usize = result.orphans.values().map(|b| b.len()).sum();
    if orphan_total > 0 {
        println!(
            "{} {} orphaned records:",
            "Found".yellow().bold(),
            orphan_total.to_string().yellow()
        );
        for (violation, batch) in &result.orphans {
            println!("  {:16} {}", violation, batch.len().to_string().yellow());
        }
    } else {
        println!("{}", "No orphaned records".green());
    }

    let json = if pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };

    match output {
        Some(path) => {
            fs::write(&path, json)?;
            println!(
                "{} {}",
                "Saved to".green().bold(),
                path.display().to_string().white()
            );
        }
        None => println!("{}", json),
    }

    Ok(())
}

fn load_json_payload(file: &Path) -> Result<Payload, Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }
    let json = fs::read_to_string(file)?;
    Ok(Payload::from_json(&json)?)
}

/// Build a payload from a directory of per-entity CSV files. The entity is
/// inferred from the file name; files matching no entity are skipped.
fn load_csv_payload(dir: &Path) -> Result<Payload, Box<dyn std::error::Error>> {
    if !dir.is_dir() {
        return Err(format!("Not a directory: {}", dir.display()).into());
    }

    let mut payload = Payload::new();
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| p.extension().map(|ext| ext == "csv").unwrap_or(false))
        .collect();
    entries.sort();

    for path in entries {
        let file_name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        let entity = match entity_from_file_name(&file_name) {
            Some(entity) => entity,
            None => {
                eprintln!("{} {}", "Skipping".yellow(), path.display());
                continue;
            }
        };
        let records = read_csv_records(&path)?;
        println!(
            "  {:14} {} rows from {}",
            entity,
            records.len().to_string().white(),
            path.display()
        );
        payload.insert(entity, records);
    }

    Ok(payload)
}

/// File-name branching: both the English and the Portuguese dataset names
/// occur in the wild.
fn entity_from_file_name(name: &str) -> Option<&'static str> {
    // Items before orders: "order_items" contains "order".
    if name.contains("item") || name.contains("itens") {
        Some("order_items")
    } else if name.contains("order") || name.contains("pedido") {
        Some("orders")
    } else if name.contains("product") || name.contains("produto") {
        Some("products")
    } else if name.contains("seller") || name.contains("vendedor") {
        Some("sellers")
    } else {
        None
    }
}

fn read_csv_records(path: &Path) -> Result<Vec<RawRecord>, Box<dyn std::error::Error>> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let headers: Vec<String> = reader.headers()?.iter().map(|s| s.to_string()).collect();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let mut record = RawRecord::new();
        for (index, header) in headers.iter().enumerate() {
            let cell = row.get(index).unwrap_or("");
            let value = if cell.is_empty() {
                serde_json::Value::Null
            } else {
                serde_json::Value::String(cell.to_string())
            };
            record.insert(header.clone(), value);
        }
        records.push(record);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_entity_from_file_name() {
        assert_eq!(entity_from_file_name("olist_orders_dataset"), Some("orders"));
        assert_eq!(
            entity_from_file_name("olist_order_items_dataset"),
            Some("order_items")
        );
        assert_eq!(entity_from_file_name("itens_pedido"), Some("order_items"));
        assert_eq!(entity_from_file_name("produtos"), Some("products"));
        assert_eq!(entity_from_file_name("sellers"), Some("sellers"));
        assert_eq!(entity_from_file_name("geolocation"), None);
    }

    #[test]
    fn test_read_csv_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.csv");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "order_id,order_status").unwrap();
        writeln!(file, "o1,delivered").unwrap();
        writeln!(file, "o2,").unwrap();

        let records = read_csv_records(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["order_id"], "o1");
        assert_eq!(records[1]["order_status"], serde_json::Value::Null);
    }
}
