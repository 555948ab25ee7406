use std::process::Command;

use super::pmset::parse_pmset_batt;
use super::profiler::parse_hardware_json;
use super::{HardwareIdentity, PlatformExtensions};
use crate::system::snapshot::BatteryStatus;

pub struct Platform;

fn command_stdout(program: &str, args: &[&str]) -> Option<String> {
    let output = match Command::new(program).args(args).output() {
        Ok(output) => output,
        Err(err) => {
            tracing::debug!(program, error = %err, "failed to spawn");
            return None;
        }
    };
    if !output.status.success() {
        tracing::debug!(program, status = %output.status, "command failed");
        return None;
    }
    String::from_utf8(output.stdout).ok()
}

impl PlatformExtensions for Platform {
    fn battery() -> Option<BatteryStatus> {
        command_stdout("pmset", &["-g", "batt"]).and_then(|out| parse_pmset_batt(&out))
    }

    fn hardware_identity() -> Option<HardwareIdentity> {
        command_stdout("system_profiler", &["SPHardwareDataType", "-json"])
            .and_then(|out| parse_hardware_json(&out))
    }
}
