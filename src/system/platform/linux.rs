use std::fs;
use std::path::Path;

use super::power_supply::{POWER_SUPPLY_ROOT, read_battery};
use super::{HardwareIdentity, PlatformExtensions, non_empty};
use crate::system::snapshot::BatteryStatus;

const DMI_ROOT: &str = "/sys/class/dmi/id";

pub struct Platform;

impl PlatformExtensions for Platform {
    fn battery() -> Option<BatteryStatus> {
        read_battery(Path::new(POWER_SUPPLY_ROOT))
    }

    fn hardware_identity() -> Option<HardwareIdentity> {
        // product_serial is usually root-only; a missing value is fine.
        let dmi = |name: &str| {
            fs::read_to_string(Path::new(DMI_ROOT).join(name))
                .ok()
                .as_deref()
                .and_then(non_empty)
        };

        let model = match (dmi("sys_vendor"), dmi("product_name")) {
            (Some(vendor), Some(product)) if !product.starts_with(&vendor) => {
                Some(format!("{vendor} {product}"))
            }
            (_, Some(product)) => Some(product),
            (vendor, None) => vendor,
        };

        Some(HardwareIdentity {
            model,
            processor: None,
            memory: None,
            serial: dmi("product_serial"),
        })
    }
}
