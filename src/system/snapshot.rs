use std::path::PathBuf;

use chrono::{DateTime, Local};
use serde::Serialize;

const UNKNOWN: &str = "Unknown";

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct BatteryStatus {
    pub percent: f32,
    pub charging: bool,
    pub secs_left: Option<u64>,
}

impl BatteryStatus {
    pub fn new(percent: f32, charging: bool, secs_left: Option<u64>) -> Self {
        Self {
            percent: clamp_percent(percent),
            charging,
            secs_left,
        }
    }
}

/// One immutable snapshot of system metrics.
///
/// Built through [`SampleBuilder`] so percentages are always clamped into
/// `[0, 100]`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Sample {
    timestamp: DateTime<Local>,
    cpu_percent: f32,
    cpu_per_core: Vec<f32>,
    cpu_frequency_mhz: Option<u64>,
    cpu_cores: usize,
    memory_used_bytes: u64,
    memory_total_bytes: u64,
    memory_available_bytes: u64,
    disk_mount: PathBuf,
    disk_used_bytes: u64,
    disk_total_bytes: u64,
    battery: Option<BatteryStatus>,
}

impl Sample {
    pub fn builder() -> SampleBuilder {
        SampleBuilder::default()
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    pub fn cpu_percent(&self) -> f32 {
        self.cpu_percent
    }

    pub fn cpu_per_core(&self) -> &[f32] {
        &self.cpu_per_core
    }

    pub fn cpu_frequency_mhz(&self) -> Option<u64> {
        self.cpu_frequency_mhz
    }

    pub fn cpu_cores(&self) -> usize {
        self.cpu_cores
    }

    pub fn memory_used_bytes(&self) -> u64 {
        self.memory_used_bytes
    }

    pub fn memory_total_bytes(&self) -> u64 {
        self.memory_total_bytes
    }

    pub fn memory_available_bytes(&self) -> u64 {
        self.memory_available_bytes
    }

    pub fn memory_percent(&self) -> f64 {
        ratio_percent(self.memory_used_bytes, self.memory_total_bytes)
    }

    pub fn disk_mount(&self) -> &std::path::Path {
        &self.disk_mount
    }

    pub fn disk_used_bytes(&self) -> u64 {
        self.disk_used_bytes
    }

    pub fn disk_total_bytes(&self) -> u64 {
        self.disk_total_bytes
    }

    pub fn disk_free_bytes(&self) -> u64 {
        self.disk_total_bytes.saturating_sub(self.disk_used_bytes)
    }

    pub fn disk_percent(&self) -> f64 {
        ratio_percent(self.disk_used_bytes, self.disk_total_bytes)
    }

    pub fn battery(&self) -> Option<&BatteryStatus> {
        self.battery.as_ref()
    }

    pub fn battery_percent(&self) -> Option<f32> {
        self.battery.map(|b| b.percent)
    }

    pub fn battery_charging(&self) -> Option<bool> {
        self.battery.map(|b| b.charging)
    }
}

#[derive(Debug, Default)]
pub struct SampleBuilder {
    timestamp: Option<DateTime<Local>>,
    cpu_percent: f32,
    cpu_per_core: Vec<f32>,
    cpu_frequency_mhz: Option<u64>,
    cpu_cores: Option<usize>,
    memory_used_bytes: u64,
    memory_total_bytes: u64,
    memory_available_bytes: Option<u64>,
    disk_mount: Option<PathBuf>,
    disk_used_bytes: u64,
    disk_total_bytes: u64,
    battery: Option<BatteryStatus>,
}

impl SampleBuilder {
    pub fn timestamp(mut self, timestamp: DateTime<Local>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn cpu(mut self, percent: f32, per_core: Vec<f32>) -> Self {
        self.cpu_percent = percent;
        self.cpu_per_core = per_core;
        self
    }

    pub fn cpu_frequency_mhz(mut self, mhz: Option<u64>) -> Self {
        self.cpu_frequency_mhz = mhz;
        self
    }

    pub fn cpu_cores(mut self, cores: usize) -> Self {
        self.cpu_cores = Some(cores);
        self
    }

    pub fn memory(mut self, used: u64, total: u64, available: u64) -> Self {
        self.memory_used_bytes = used;
        self.memory_total_bytes = total;
        self.memory_available_bytes = Some(available);
        self
    }

    pub fn disk(mut self, mount: impl Into<PathBuf>, used: u64, total: u64) -> Self {
        self.disk_mount = Some(mount.into());
        self.disk_used_bytes = used;
        self.disk_total_bytes = total;
        self
    }

    pub fn battery(mut self, battery: Option<BatteryStatus>) -> Self {
        self.battery = battery;
        self
    }

    pub fn build(self) -> Sample {
        let cpu_per_core: Vec<f32> = self.cpu_per_core.into_iter().map(clamp_percent).collect();
        let cpu_cores = self.cpu_cores.unwrap_or(cpu_per_core.len());
        let memory_available_bytes = self
            .memory_available_bytes
            .unwrap_or(self.memory_total_bytes.saturating_sub(self.memory_used_bytes));

        Sample {
            timestamp: self.timestamp.unwrap_or_else(Local::now),
            cpu_percent: clamp_percent(self.cpu_percent),
            cpu_per_core,
            cpu_frequency_mhz: self.cpu_frequency_mhz.filter(|&mhz| mhz > 0),
            cpu_cores,
            memory_used_bytes: self.memory_used_bytes,
            memory_total_bytes: self.memory_total_bytes,
            memory_available_bytes,
            disk_mount: self.disk_mount.unwrap_or_else(|| PathBuf::from("/")),
            disk_used_bytes: self.disk_used_bytes,
            disk_total_bytes: self.disk_total_bytes,
            battery: self.battery.map(|b| BatteryStatus::new(b.percent, b.charging, b.secs_left)),
        }
    }
}

/// Static identity of the machine, gathered once per run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HardwareInfo {
    pub model: String,
    pub processor: String,
    pub memory: String,
    pub serial: String,
}

impl Default for HardwareInfo {
    fn default() -> Self {
        HardwareInfo {
            model: UNKNOWN.to_string(),
            processor: UNKNOWN.to_string(),
            memory: UNKNOWN.to_string(),
            serial: UNKNOWN.to_string(),
        }
    }
}

pub fn clamp_percent(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

fn ratio_percent(used: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        (used as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn builder_fills_defaults() {
        let sample = Sample::builder()
            .cpu(12.5, vec![10.0, 15.0])
            .memory(4, 16, 12)
            .disk("/", 50, 200)
            .build();
        assert_eq!(sample.cpu_cores(), 2);
        assert_eq!(sample.disk_mount(), std::path::Path::new("/"));
        assert!((sample.memory_percent() - 25.0).abs() < f64::EPSILON);
        assert!((sample.disk_percent() - 25.0).abs() < f64::EPSILON);
        assert_eq!(sample.disk_free_bytes(), 150);
        assert_eq!(sample.battery_percent(), None);
        assert_eq!(sample.battery_charging(), None);
    }

    #[test]
    fn zero_totals_give_zero_ratios() {
        let sample = Sample::builder().build();
        assert_eq!(sample.memory_percent(), 0.0);
        assert_eq!(sample.disk_percent(), 0.0);
    }

    #[test]
    fn zero_frequency_is_unknown() {
        let sample = Sample::builder().cpu_frequency_mhz(Some(0)).build();
        assert_eq!(sample.cpu_frequency_mhz(), None);
    }

    #[test]
    fn battery_accessors_flatten_status() {
        let sample = Sample::builder()
            .battery(Some(BatteryStatus::new(140.0, true, None)))
            .build();
        assert_eq!(sample.battery_percent(), Some(100.0));
        assert_eq!(sample.battery_charging(), Some(true));
    }

    #[test]
    fn nan_percent_is_zero() {
        assert_eq!(clamp_percent(f32::NAN), 0.0);
    }

    proptest! {
        #[test]
        fn percentages_always_within_bounds(cpu in any::<f32>(), core in any::<f32>(), bat in any::<f32>()) {
            let sample = Sample::builder()
                .cpu(cpu, vec![core])
                .battery(Some(BatteryStatus::new(bat, false, None)))
                .build();
            prop_assert!((0.0..=100.0).contains(&sample.cpu_percent()));
            prop_assert!((0.0..=100.0).contains(&sample.cpu_per_core()[0]));
            let battery = sample.battery_percent().unwrap_or_default();
            prop_assert!((0.0..=100.0).contains(&battery));
        }
    }
}
