#![cfg_attr(not(target_os = "linux"), allow(dead_code))]

use std::fs;
use std::path::Path;

use crate::system::snapshot::BatteryStatus;

pub const POWER_SUPPLY_ROOT: &str = "/sys/class/power_supply";

/// Raw attribute values of one `/sys/class/power_supply/<name>` entry.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SupplyReadings {
    pub kind: String,
    pub capacity: Option<u32>,
    pub status: String,
    pub energy_now: Option<u64>,
    pub power_now: Option<u64>,
    pub charge_now: Option<u64>,
    pub current_now: Option<u64>,
}

/// First battery under `root`, if any.
pub fn read_battery(root: &Path) -> Option<BatteryStatus> {
    let mut entries: Vec<_> = fs::read_dir(root).ok()?.flatten().map(|e| e.path()).collect();
    entries.sort();

    entries
        .iter()
        .map(|dir| read_supply(dir))
        .find(|readings| readings.kind.eq_ignore_ascii_case("Battery"))
        .and_then(|readings| battery_from_readings(&readings))
}

fn read_supply(dir: &Path) -> SupplyReadings {
    let attr = |name: &str| {
        fs::read_to_string(dir.join(name))
            .map(|s| s.trim().to_string())
            .unwrap_or_default()
    };
    let number = |name: &str| attr(name).parse().ok();

    SupplyReadings {
        kind: attr("type"),
        capacity: number("capacity").map(|v: u64| v.min(u32::MAX as u64) as u32),
        status: attr("status"),
        energy_now: number("energy_now"),
        power_now: number("power_now"),
        charge_now: number("charge_now"),
        current_now: number("current_now"),
    }
}

pub fn battery_from_readings(readings: &SupplyReadings) -> Option<BatteryStatus> {
    let percent = readings.capacity? as f32;
    let discharging = readings.status.eq_ignore_ascii_case("Discharging");

    // energy/power (µWh, µW) or charge/current (µAh, µA) both give hours.
    let secs_left = if discharging {
        match (readings.energy_now, readings.power_now) {
            (Some(energy), Some(power)) if power > 0 => Some(energy * 3600 / power),
            _ => match (readings.charge_now, readings.current_now) {
                (Some(charge), Some(current)) if current > 0 => Some(charge * 3600 / current),
                _ => None,
            },
        }
    } else {
        None
    };

    Some(BatteryStatus::new(percent, !discharging, secs_left))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn readings(status: &str) -> SupplyReadings {
        SupplyReadings {
            kind: "Battery".into(),
            capacity: Some(72),
            status: status.into(),
            ..Default::default()
        }
    }

    #[test]
    fn discharging_uses_energy_over_power() {
        let mut r = readings("Discharging");
        r.energy_now = Some(30_000_000);
        r.power_now = Some(10_000_000);
        let status = battery_from_readings(&r).unwrap();
        assert_eq!(status.percent, 72.0);
        assert!(!status.charging);
        assert_eq!(status.secs_left, Some(3 * 3600));
    }

    #[test]
    fn discharging_falls_back_to_charge_over_current() {
        let mut r = readings("Discharging");
        r.power_now = Some(0);
        r.charge_now = Some(2_000_000);
        r.current_now = Some(4_000_000);
        let status = battery_from_readings(&r).unwrap();
        assert_eq!(status.secs_left, Some(1800));
    }

    #[test]
    fn full_or_charging_counts_as_plugged() {
        for status in ["Charging", "Full", "Not charging"] {
            let battery = battery_from_readings(&readings(status)).unwrap();
            assert!(battery.charging, "{status}");
            assert_eq!(battery.secs_left, None);
        }
    }

    #[test]
    fn missing_capacity_is_no_battery() {
        let mut r = readings("Discharging");
        r.capacity = None;
        assert!(battery_from_readings(&r).is_none());
    }

    #[test]
    fn reads_battery_from_sysfs_layout() {
        let root = std::env::temp_dir().join(format!("hwmon_power_supply_{}", std::process::id()));
        let _ = fs::remove_dir_all(&root);
        let ac = root.join("AC");
        let bat = root.join("BAT0");
        fs::create_dir_all(&ac).unwrap();
        fs::create_dir_all(&bat).unwrap();
        fs::write(ac.join("type"), "Mains\n").unwrap();
        fs::write(bat.join("type"), "Battery\n").unwrap();
        fs::write(bat.join("capacity"), "55\n").unwrap();
        fs::write(bat.join("status"), "Charging\n").unwrap();

        let status = read_battery(&root).unwrap();
        assert_eq!(status.percent, 55.0);
        assert!(status.charging);

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn missing_root_is_no_battery() {
        assert!(read_battery(Path::new("/nonexistent/power_supply")).is_none());
    }
}
