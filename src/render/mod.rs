pub mod json;
pub mod report;
pub mod text;

pub use json::JsonRenderer;
pub use report::DetailedReport;
pub use text::TextRenderer;

use crate::system::snapshot::HardwareInfo;

const RULE_WIDTH: usize = 50;

pub fn banner(info: &HardwareInfo) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    format!(
        "🔍 Hardware Monitor\n{rule}\n💻 Model: {}\n🧠 Processor: {}\n💾 Memory: {}\n{rule}",
        info.model, info.processor, info.memory
    )
}

#[cfg(test)]
pub(crate) mod tests {
    use chrono::{Local, TimeZone};

    use super::*;
    use crate::system::snapshot::{BatteryStatus, Sample};

    const GIB: u64 = 1024 * 1024 * 1024;

    pub(crate) fn fixture_sample(battery: Option<BatteryStatus>) -> Sample {
        let timestamp = Local
            .with_ymd_and_hms(2025, 6, 12, 9, 30, 0)
            .earliest()
            .unwrap();
        Sample::builder()
            .timestamp(timestamp)
            .cpu(12.34, vec![10.0, 15.0])
            .cpu_frequency_mhz(Some(3200))
            .memory(8 * GIB, 16 * GIB, 15 * GIB / 2)
            .disk("/", 100 * GIB, 500 * GIB)
            .battery(battery)
            .build()
    }

    #[test]
    fn banner_lists_identity() {
        let info = HardwareInfo {
            model: "MacBookPro17,1".into(),
            processor: "Apple M1".into(),
            memory: "8 GB".into(),
            serial: "C02TEST".into(),
        };
        let banner = banner(&info);
        let lines: Vec<&str> = banner.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[1], "=".repeat(50));
        assert_eq!(lines[2], "💻 Model: MacBookPro17,1");
        assert_eq!(lines[3], "🧠 Processor: Apple M1");
        assert!(!banner.contains("C02TEST"));
    }
}
