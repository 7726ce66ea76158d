//! CSV and JSON export of simulation results.
//!
//! CSV is one row per result under a fixed header. JSON is the serde form of
//! [`SimulationResult`], pretty printed.

use crate::engine::SimulationResult;
use crate::error::{Result, SimError};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// CSV column order.
pub const CSV_HEADER: [&str; 19] = [
    "run_id",
    "ts",
    "seed",
    "model",
    "scenario",
    "pslang",
    "tokens_in",
    "tokens_out",
    "latency_ms",
    "rounds",
    "tool_calls",
    "cost_usd",
    "delta_tokens",
    "delta_latency",
    "delta_rounds",
    "delta_cost",
    "osm_score",
    "osm_band",
    "attest_digest",
];

/// Formats one result as a CSV record in [`CSV_HEADER`] order.
pub fn csv_record(result: &SimulationResult) -> Vec<String> {
    let m = &result.metrics;
    let d = &result.deltas_vs_no_ps;
    vec![
        result.run_id.to_string(),
        result.timestamp.to_string(),
        result.seed.to_string(),
        result.model.name().to_string(),
        result.scenario.name().to_string(),
        result.pslang.to_string(),
        m.tokens_in.to_string(),
        m.tokens_out.to_string(),
        m.latency_ms.to_string(),
        m.rounds.to_string(),
        m.tool_calls.to_string(),
        format!("{:.6}", m.cost_usd),
        format!("{:.4}", d.tokens),
        format!("{:.4}", d.latency),
        format!("{:.4}", d.rounds),
        format!("{:.4}", d.cost),
        format!("{:.4}", result.osm.score_public),
        result.osm.band.name().to_string(),
        result.attest.digest.clone(),
    ]
}

/// Writes a header and one row per result.
pub fn write_csv<W: Write>(writer: W, results: &[SimulationResult]) -> Result<W> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(CSV_HEADER)?;
    for result in results {
        wtr.write_record(csv_record(result))?;
    }
    wtr.flush()?;
    wtr.into_inner().map_err(|e| SimError::Io(e.into_error()))
}

/// CSV export as a string.
pub fn to_csv_string(results: &[SimulationResult]) -> Result<String> {
    let bytes = write_csv(Vec::new(), results)?;
    Ok(String::from_utf8(bytes)?)
}

/// Pretty JSON of a single result.
pub fn to_json(result: &SimulationResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

/// Writes results to `path`, as CSV if the extension is `.csv`, else JSON.
pub fn write_to_file(path: &Path, results: &[SimulationResult]) -> Result<()> {
    let is_csv = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);

    let mut file = File::create(path)?;
    if is_csv {
        write_csv(&mut file, results)?;
    } else {
        let json = serde_json::to_string_pretty(results)?;
        file.write_all(json.as_bytes())?;
    }
    Ok(())
}
