#![cfg_attr(not(target_os = "macos"), allow(dead_code))]

use serde::Deserialize;

use super::{HardwareIdentity, non_empty};

#[derive(Debug, Deserialize)]
struct ProfilerOutput {
    #[serde(rename = "SPHardwareDataType", default)]
    hardware: Vec<HardwareEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct HardwareEntry {
    machine_model: Option<String>,
    machine_name: Option<String>,
    cpu_type: Option<String>,
    chip_type: Option<String>,
    physical_memory: Option<String>,
    serial_number: Option<String>,
}

/// Parse `system_profiler SPHardwareDataType -json`.
///
/// Apple silicon reports `chip_type` instead of `cpu_type`.
pub fn parse_hardware_json(json: &str) -> Option<HardwareIdentity> {
    let output: ProfilerOutput = match serde_json::from_str(json) {
        Ok(output) => output,
        Err(err) => {
            tracing::debug!(error = %err, "unreadable system_profiler output");
            return None;
        }
    };
    let entry = output.hardware.into_iter().next()?;
    let pick = |value: Option<String>| value.as_deref().and_then(non_empty);

    Some(HardwareIdentity {
        model: pick(entry.machine_model).or_else(|| pick(entry.machine_name)),
        processor: pick(entry.cpu_type).or_else(|| pick(entry.chip_type)),
        memory: pick(entry.physical_memory),
        serial: pick(entry.serial_number),
    })
}
