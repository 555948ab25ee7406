#![cfg_attr(not(target_os = "macos"), allow(dead_code))]

use crate::system::snapshot::BatteryStatus;

/// Parse `pmset -g batt` output.
///
/// ```text
/// Now drawing from 'Battery Power'
///  -InternalBattery-0 (id=4653155)	85%; discharging; 3:45 remaining present: true
/// ```
pub fn parse_pmset_batt(output: &str) -> Option<BatteryStatus> {
    let mut lines = output.lines();
    let source = lines.next()?;
    let plugged = source.contains("'AC Power'");

    let battery_line = lines.find(|line| line.contains("InternalBattery"))?;
    let (_, details) = battery_line.split_once('\t').or_else(|| battery_line.split_once(')'))?;

    let mut fields = details.split(';').map(str::trim);
    let percent: f32 = fields.next()?.strip_suffix('%')?.trim().parse().ok()?;

    // Time left is only meaningful while running on battery.
    let secs_left = if plugged {
        None
    } else {
        fields.find_map(parse_remaining)
    };

    Some(BatteryStatus::new(percent, plugged, secs_left))
}

fn parse_remaining(field: &str) -> Option<u64> {
    let clock = field.split_whitespace().next()?;
    if !field.contains("remaining") {
        return None;
    }
    let (hours, minutes) = clock.split_once(':')?;
    let hours: u64 = hours.parse().ok()?;
    let minutes: u64 = minutes.parse().ok()?;
    Some(hours * 3600 + minutes * 60)
}
