use std::path::{Path, PathBuf};

use sysinfo::{Disks, System};

use super::platform;
use super::snapshot::{HardwareInfo, Sample};
use crate::format::format_gb;
use crate::sampler::{MetricsProvider, ProviderError};

/// `sysinfo`-backed metrics provider.
pub struct Collector {
    sys: System,
    disk_mount: PathBuf,
}

impl Default for Collector {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Collector {
    pub fn new(disk_mount: impl Into<PathBuf>) -> Self {
        let mut sys = System::new();
        sys.refresh_memory();
        sys.refresh_cpu_all();
        Collector {
            sys,
            disk_mount: disk_mount.into(),
        }
    }

    pub fn disk_mount(&self) -> &Path {
        &self.disk_mount
    }

    pub fn refresh(&mut self) -> Result<Sample, ProviderError> {
        let _refresh_span = tracing::debug_span!("collector.refresh").entered();

        if !sysinfo::IS_SUPPORTED_SYSTEM {
            return Err(ProviderError::Fatal(format!(
                "{} is not supported by sysinfo",
                std::env::consts::OS
            )));
        }

        self.sys.refresh_memory();
        self.sys.refresh_cpu_all();
        self.build_sample()
    }

    fn build_sample(&self) -> Result<Sample, ProviderError> {
        let total_memory = self.sys.total_memory();
        if total_memory == 0 {
            return Err(ProviderError::Transient(
                "memory statistics unavailable".to_string(),
            ));
        }

        let cpus = self.sys.cpus();
        let per_core: Vec<f32> = cpus.iter().map(|cpu| cpu.cpu_usage()).collect();
        let frequency = cpus.first().map(|cpu| cpu.frequency());

        let disks = Disks::new_with_refreshed_list();
        let mounts = disks
            .list()
            .iter()
            .map(|disk| (disk.mount_point(), disk.total_space(), disk.available_space()));
        let (mount, total, available) = select_disk(mounts, &self.disk_mount).ok_or_else(|| {
            ProviderError::Transient(format!(
                "no disk mounted at {}",
                self.disk_mount.display()
            ))
        })?;

        Ok(Sample::builder()
            .cpu(self.sys.global_cpu_usage(), per_core)
            .cpu_frequency_mhz(frequency)
            .cpu_cores(cpus.len())
            .memory(
                self.sys.used_memory(),
                total_memory,
                self.sys.available_memory(),
            )
            .disk(mount, total.saturating_sub(available), total)
            .battery(platform::battery())
            .build())
    }

    /// Machine identity, filled in from sysinfo wherever the platform layer
    /// has nothing to say.
    pub fn hardware_info(&self) -> HardwareInfo {
        let identity = platform::hardware_identity().unwrap_or_default();
        let defaults = HardwareInfo::default();

        let processor = identity.processor.or_else(|| {
            self.sys
                .cpus()
                .first()
                .map(|cpu| cpu.brand().trim().to_string())
                .filter(|brand| !brand.is_empty())
        });
        let memory = identity.memory.or_else(|| {
            let total = self.sys.total_memory();
            (total > 0).then(|| format_gb(total))
        });

        HardwareInfo {
            model: identity.model.unwrap_or(defaults.model),
            processor: processor.unwrap_or(defaults.processor),
            memory: memory.unwrap_or(defaults.memory),
            serial: identity.serial.unwrap_or(defaults.serial),
        }
    }
}

impl MetricsProvider for Collector {
    fn sample(&mut self) -> Result<Sample, ProviderError> {
        self.refresh()
    }
}

/// Pick the mount whose path is the longest prefix of `target`.
fn select_disk<'a, I>(mounts: I, target: &Path) -> Option<(PathBuf, u64, u64)>
where
    I: IntoIterator<Item = (&'a Path, u64, u64)>,
{
    mounts
        .into_iter()
        .filter(|(mount, _, _)| target.starts_with(mount))
        .max_by_key(|(mount, _, _)| mount.components().count())
        .map(|(mount, total, available)| (mount.to_path_buf(), total, available))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_disk_prefers_longest_mount() {
        let mounts = vec![
            (Path::new("/"), 100, 40),
            (Path::new("/home"), 500, 100),
            (Path::new("/home/user/data"), 900, 800),
        ];
        let (mount, total, available) =
            select_disk(mounts.clone(), Path::new("/home/user")).unwrap();
        assert_eq!(mount, PathBuf::from("/home"));
        assert_eq!((total, available), (500, 100));

        let (mount, _, _) = select_disk(mounts, Path::new("/")).unwrap();
        assert_eq!(mount, PathBuf::from("/"));
    }

    #[test]
    fn select_disk_ignores_partial_component_matches() {
        let mounts = vec![(Path::new("/ho"), 1, 1)];
        assert!(select_disk(mounts, Path::new("/home")).is_none());
    }

    #[test]
    fn collector_smoke() {
        let mut collector = Collector::default();
        match collector.refresh() {
            Ok(sample) => {
                assert!(sample.memory_total_bytes() > 0);
                assert!((0.0..=100.0).contains(&sample.cpu_percent()));
            }
            Err(err) => assert!(!err.is_fatal() || !sysinfo::IS_SUPPORTED_SYSTEM),
        }
        let info = collector.hardware_info();
        assert!(!info.model.is_empty());
    }
}
