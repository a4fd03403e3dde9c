use crate::cli::source::{CarrierOptions, LoadedCarrier};
use crate::codec::{Capacity, Codec};
use crate::error::Result;
use crate::selector::Strategy;
use serde::Serialize;
use std::path::Path;

/// Options for the capacity command
#[derive(Debug, Clone, Default)]
pub struct CapacityOptions {
    pub strategy: Strategy,
    pub carrier: CarrierOptions,
    pub json: bool,
}

/// Capacity of one carrier file under one strategy
#[derive(Debug, Clone, Serialize)]
pub struct CapacityReport {
    pub file: String,
    pub kind: &'static str,
    pub strategy: String,
    #[serde(flatten)]
    pub capacity: Capacity,
}

/// Compute the capacity report for a carrier file
pub fn carrier_capacity(path: &Path, options: &CapacityOptions) -> Result<CapacityReport> {
    let carrier = LoadedCarrier::load(path, &options.carrier)?;
    let capacity = carrier.capacity(&Codec::new(options.strategy))?;

    Ok(CapacityReport {
        file: path.display().to_string(),
        kind: carrier.kind(),
        strategy: options.strategy.to_string(),
        capacity,
    })
}

/// Display the capacity of a carrier file, as text or JSON
pub fn show_capacity(path: &Path, options: &CapacityOptions) -> Result<String> {
    let report = carrier_capacity(path, options)?;

    if options.json {
        let mut output = serde_json::to_string_pretty(&report)?;
        output.push('\n');
        return Ok(output);
    }

    let mut output = String::new();
    output.push_str("LSB Carrier Capacity\n");
    output.push_str("====================\n\n");
    output.push_str(&format!("File: {}\n", report.file));
    output.push_str(&format!("Carrier: {}\n", report.kind));
    output.push_str(&format!("Strategy: {}\n", report.strategy));
    output.push_str(&format!("Units: {}\n", report.capacity.units));
    output.push_str(&format!("Selected positions: {}\n", report.capacity.positions));
    output.push_str(&format!(
        "Max message: {} bytes\n",
        report.capacity.max_message_bytes
    ));
    if report.capacity.positions < 8 {
        output.push_str("\nCarrier cannot hold even an empty message with this strategy.\n");
    }

    Ok(output)
}
