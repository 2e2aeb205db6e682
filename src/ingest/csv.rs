use crate::core::params::SizingParams;
use anyhow::Context;
use csv::StringRecord;
use std::io::BufReader;
use tracing::{debug, warn};

const REQUIRED_COLUMNS: usize = 5;
const ALL_COLUMNS: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub name: String,
    pub params: SizingParams,
}

#[derive(Debug, Default, PartialEq)]
pub struct IngestStats {
    pub parsed: u64,
    pub skipped: u64,
    /// 1-based file lines of skipped rows, header included.
    pub skipped_lines: Vec<u64>,
}

/// Reads `name,num_nodes,props_per_node,rels_per_node,props_per_rel` rows,
/// optionally followed by `node_prop_size,rel_prop_size,node_overhead,
/// rel_overhead,query_overhead_mb`. Blank optional cells keep their defaults.
pub fn ingest_scenarios<R: std::io::Read>(
    reader: R,
) -> anyhow::Result<(Vec<Scenario>, IngestStats)> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(BufReader::new(reader));
    let mut scenarios = vec![];
    let mut stats = IngestStats::default();

    for maybe_record in csv_reader.records() {
        let record = match maybe_record {
            Ok(record) => record,
            Err(err) if err.is_io_error() => {
                return Err(err).context("failed to read scenario file");
            }
            Err(err) => {
                let line = err.position().map(|p| p.line());
                warn!(?line, %err, "skipping malformed row");
                stats.skipped += 1;
                stats.skipped_lines.extend(line);
                continue;
            }
        };
        match parse_scenario(&record) {
            Some(scenario) => {
                debug!(name = %scenario.name, "parsed scenario");
                scenarios.push(scenario);
                stats.parsed += 1;
            }
            None => {
                let line = record.position().map(|p| p.line());
                warn!(?line, "skipping invalid scenario");
                stats.skipped += 1;
                stats.skipped_lines.extend(line);
            }
        }
    }

    anyhow::Ok((scenarios, stats))
}

fn parse_scenario(record: &StringRecord) -> Option<Scenario> {
    if record.len() < REQUIRED_COLUMNS || record.len() > ALL_COLUMNS {
        return None;
    }

    let mut params = SizingParams::new(
        record[1].parse::<u64>().ok()?,
        record[2].parse::<f64>().ok()?,
        record[3].parse::<f64>().ok()?,
        record[4].parse::<f64>().ok()?,
    );
    let optional = [
        &mut params.node_prop_size,
        &mut params.rel_prop_size,
        &mut params.node_overhead,
        &mut params.rel_overhead,
        &mut params.query_overhead_mb,
    ];
    for (field, cell) in optional.into_iter().zip(record.iter().skip(REQUIRED_COLUMNS)) {
        if !cell.is_empty() {
            *field = cell.parse::<f64>().ok()?;
        }
    }

    if let Err(err) = params.validate() {
        warn!(name = &record[0], %err, "invalid sizing parameters");
        return None;
    }

    Some(Scenario {
        name: record[0].to_string(),
        params,
    })
}
