use super::{HardwareIdentity, PlatformExtensions};
use crate::system::snapshot::BatteryStatus;

pub struct Platform;

impl PlatformExtensions for Platform {
    fn battery() -> Option<BatteryStatus> {
        None
    }

    fn hardware_identity() -> Option<HardwareIdentity> {
        None
    }
}
