use super::snapshot::BatteryStatus;

mod pmset;
mod power_supply;
mod profiler;

/// Identity fields a platform could discover; `None` means "ask sysinfo or
/// report Unknown".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HardwareIdentity {
    pub model: Option<String>,
    pub processor: Option<String>,
    pub memory: Option<String>,
    pub serial: Option<String>,
}

pub trait PlatformExtensions {
    fn battery() -> Option<BatteryStatus>;
    fn hardware_identity() -> Option<HardwareIdentity>;
}

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "macos")]
mod macos;
#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
mod unsupported;
#[cfg(target_os = "windows")]
mod windows;

#[cfg(target_os = "linux")]
use linux as platform_impl;
#[cfg(target_os = "macos")]
use macos as platform_impl;
#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
use unsupported as platform_impl;
#[cfg(target_os = "windows")]
use windows as platform_impl;

pub fn battery() -> Option<BatteryStatus> {
    platform_impl::Platform::battery()
}

pub fn hardware_identity() -> Option<HardwareIdentity> {
    platform_impl::Platform::hardware_identity()
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrappers_do_not_panic() {
        let _ = battery();
        let _ = hardware_identity();
    }

    #[test]
    fn non_empty_trims() {
        assert_eq!(non_empty("  Apple M1 \n"), Some("Apple M1".to_string()));
        assert_eq!(non_empty(" \t"), None);
    }
}
