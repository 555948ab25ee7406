use super::{HardwareIdentity, PlatformExtensions};
use crate::system::snapshot::BatteryStatus;

use windows_sys::Win32::System::Power::{GetSystemPowerStatus, SYSTEM_POWER_STATUS};

const NO_SYSTEM_BATTERY: u8 = 128;
const UNKNOWN_PERCENT: u8 = 255;
const UNKNOWN_LIFETIME: u32 = u32::MAX;

pub struct Platform;

impl PlatformExtensions for Platform {
    fn battery() -> Option<BatteryStatus> {
        let mut status = unsafe { std::mem::zeroed::<SYSTEM_POWER_STATUS>() };
        let ok = unsafe { GetSystemPowerStatus(&mut status) };
        if ok == 0 {
            return None;
        }
        if status.BatteryFlag & NO_SYSTEM_BATTERY != 0
            || status.BatteryLifePercent == UNKNOWN_PERCENT
        {
            return None;
        }

        let plugged = status.ACLineStatus == 1;
        let secs_left = (!plugged && status.BatteryLifeTime != UNKNOWN_LIFETIME)
            .then_some(status.BatteryLifeTime as u64);

        Some(BatteryStatus::new(
            status.BatteryLifePercent as f32,
            plugged,
            secs_left,
        ))
    }

    fn hardware_identity() -> Option<HardwareIdentity> {
        // No cheap identity source without WMI.
        None
    }
}
