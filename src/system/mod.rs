pub mod collector;
pub mod platform;
pub mod snapshot;

pub use collector::Collector;
pub use snapshot::{BatteryStatus, HardwareInfo, Sample};
