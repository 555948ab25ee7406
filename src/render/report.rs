use serde::Serialize;

use crate::format::{bytes_to_gb, format_time_left, round2};
use crate::system::snapshot::Sample;

const NO_BATTERY: &str = "battery information unavailable";

/// Full one-shot hardware report, printed as pretty JSON.
#[derive(Debug, Serialize)]
pub struct DetailedReport {
    pub cpu: CpuReport,
    pub memory: MemoryReport,
    pub disk: DiskReport,
    pub battery: BatteryReport,
}

#[derive(Debug, Serialize)]
pub struct CpuReport {
    pub usage_per_core: Vec<f32>,
    pub average_usage: f64,
    pub frequency: Frequency,
    pub cores: usize,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Frequency {
    Mhz(u64),
    Unknown(&'static str),
}

#[derive(Debug, Serialize)]
pub struct MemoryReport {
    pub total_gb: f64,
    pub used_gb: f64,
    pub available_gb: f64,
    pub usage_percent: f64,
}

#[derive(Debug, Serialize)]
pub struct DiskReport {
    pub mount: String,
    pub total_gb: f64,
    pub used_gb: f64,
    pub free_gb: f64,
    pub usage_percent: f64,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum BatteryReport {
    Present {
        percent: f32,
        charging: bool,
        time_left: String,
    },
    Missing {
        error: &'static str,
    },
}

impl DetailedReport {
    pub fn from_sample(sample: &Sample) -> Self {
        let per_core = sample.cpu_per_core();
        let average_usage = if per_core.is_empty() {
            sample.cpu_percent() as f64
        } else {
            per_core.iter().map(|&v| v as f64).sum::<f64>() / per_core.len() as f64
        };

        let battery = match sample.battery() {
            Some(b) => BatteryReport::Present {
                percent: b.percent,
                charging: b.charging,
                time_left: format_time_left(b.secs_left),
            },
            None => BatteryReport::Missing { error: NO_BATTERY },
        };

        DetailedReport {
            cpu: CpuReport {
                usage_per_core: per_core.to_vec(),
                average_usage: round2(average_usage),
                frequency: sample
                    .cpu_frequency_mhz()
                    .map_or(Frequency::Unknown("Unknown"), Frequency::Mhz),
                cores: sample.cpu_cores(),
            },
            memory: MemoryReport {
                total_gb: round2(bytes_to_gb(sample.memory_total_bytes())),
                used_gb: round2(bytes_to_gb(sample.memory_used_bytes())),
                available_gb: round2(bytes_to_gb(sample.memory_available_bytes())),
                usage_percent: round2(sample.memory_percent()),
            },
            disk: DiskReport {
                mount: sample.disk_mount().display().to_string(),
                total_gb: round2(bytes_to_gb(sample.disk_total_bytes())),
                used_gb: round2(bytes_to_gb(sample.disk_used_bytes())),
                free_gb: round2(bytes_to_gb(sample.disk_free_bytes())),
                usage_percent: round2(sample.disk_percent()),
            },
            battery,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::tests::fixture_sample;
    use crate::system::snapshot::BatteryStatus;
    use insta::assert_snapshot;

    #[test]
    fn report_json() {
        let sample = fixture_sample(Some(BatteryStatus::new(85.0, false, Some(13_500))));
        let report = DetailedReport::from_sample(&sample);
        let json = serde_json::to_string_pretty(&report).unwrap();
        assert_snapshot!(json, @r#"
        {
          "cpu": {
            "usage_per_core": [
              10.0,
              15.0
            ],
            "average_usage": 12.5,
            "frequency": 3200,
            "cores": 2
          },
          "memory": {
            "total_gb": 16.0,
            "used_gb": 8.0,
            "available_gb": 7.5,
            "usage_percent": 50.0
          },
          "disk": {
            "mount": "/",
            "total_gb": 500.0,
            "used_gb": 100.0,
            "free_gb": 400.0,
            "usage_percent": 20.0
          },
          "battery": {
            "percent": 85.0,
            "charging": false,
            "time_left": "3h 45m"
          }
        }
        "#);
    }

    #[test]
    fn unknown_frequency_and_missing_battery() {
        let sample = Sample::builder().cpu(30.0, Vec::new()).build();
        let report = DetailedReport::from_sample(&sample);
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["cpu"]["frequency"], "Unknown");
        assert_eq!(value["cpu"]["average_usage"], 30.0);
        assert_eq!(value["battery"]["error"], NO_BATTERY);
    }
}
