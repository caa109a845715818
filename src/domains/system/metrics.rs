//! Host metrics for the status tool.

use async_trait::async_trait;
use serde::Serialize;
use sysinfo::{Disks, ProcessesToUpdate, System};
use thiserror::Error;
use tracing::debug;

/// Errors raised while sampling host metrics.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("system metrics are not supported on this platform")]
    Unsupported,

    #[error("metrics collection failed: {0}")]
    Collection(String),
}

/// Host utilization snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemMetrics {
    pub cpu_percent: f32,
    pub memory_percent: f64,
    pub disk_usage_percent: f64,
    pub process_count: usize,
    /// Open TCP/UDP sockets; `None` where the count is not available.
    pub network_connections: Option<usize>,
}

/// Source of host metrics.
#[async_trait]
pub trait MetricsSource: Send + Sync {
    /// Sample the host. May wait briefly between CPU readings.
    async fn collect(&self) -> Result<SystemMetrics, MetricsError>;

    /// System boot time as seconds since the Unix epoch.
    fn boot_time(&self) -> u64;
}

/// Metrics for the machine the server runs on.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostMetrics;

#[async_trait]
impl MetricsSource for HostMetrics {
    async fn collect(&self) -> Result<SystemMetrics, MetricsError> {
        if !sysinfo::IS_SUPPORTED_SYSTEM {
            return Err(MetricsError::Unsupported);
        }

        let mut sys = System::new();
        // CPU usage is a delta between two refreshes.
        sys.refresh_cpu_usage();
        tokio::time::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL).await;

        let metrics = run_blocking(move || sample(sys)).await?;
        debug!(?metrics, "Collected host metrics");
        Ok(metrics)
    }

    fn boot_time(&self) -> u64 {
        System::boot_time()
    }
}

/// Second CPU reading plus the process, disk and socket scans.
fn sample(mut sys: System) -> Result<SystemMetrics, MetricsError> {
    sys.refresh_cpu_usage();
    sys.refresh_memory();
    sys.refresh_processes(ProcessesToUpdate::All, true);

    let disks = Disks::new_with_refreshed_list();
    let root = disks
        .list()
        .iter()
        .find(|d| d.mount_point() == std::path::Path::new("/"))
        .or_else(|| disks.list().first())
        .ok_or_else(|| MetricsError::Collection("no disks found".to_string()))?;
    let disk_used = root.total_space().saturating_sub(root.available_space());

    Ok(SystemMetrics {
        cpu_percent: sys.global_cpu_usage(),
        memory_percent: percent(sys.used_memory(), sys.total_memory()),
        disk_usage_percent: percent(disk_used, root.total_space()),
        process_count: sys.processes().len(),
        network_connections: count_connections(),
    })
}

/// Run a sampling step on the blocking pool. A panic or cancelled task
/// becomes a collection error.
async fn run_blocking<T, F>(f: F) -> Result<T, MetricsError>
where
    F: FnOnce() -> Result<T, MetricsError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| MetricsError::Collection(format!("sampling task failed: {e}")))?
}

/// `part / whole` as a percentage rounded to one decimal, 0 when `whole` is 0.
fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    (part as f64 / whole as f64 * 1000.0).round() / 10.0
}

#[cfg(target_os = "linux")]
fn count_connections() -> Option<usize> {
    let counts: Vec<usize> = ["tcp", "tcp6", "udp", "udp6"]
        .iter()
        .filter_map(|proto| std::fs::read_to_string(format!("/proc/net/{proto}")).ok())
        .map(|table| table.lines().skip(1).filter(|l| !l.trim().is_empty()).count())
        .collect();
    if counts.is_empty() {
        None
    } else {
        Some(counts.iter().sum())
    }
}

#[cfg(not(target_os = "linux"))]
fn count_connections() -> Option<usize> {
    None
}
