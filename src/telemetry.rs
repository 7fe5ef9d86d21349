//! Operation telemetry
//!
//! Every add and remove ends with one [`TelemetryEvent`]. The spool writes
//! events as JSON files into a directory for a collector to pick up; with no
//! directory configured they only go to the log.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use tracing::{debug, warn};

use crate::domain::Version;

/// Outcome record of one operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TelemetryEvent {
    /// `bundleadd` or `bundleremove`
    pub operation: String,
    pub bundles: Vec<String>,
    /// Unknown when the current version could not be read
    pub current_version: Option<Version>,
    pub result: i32,
    pub bytes: u64,
    /// Failed operations are reported as critical
    pub critical: bool,
}

impl TelemetryEvent {
    pub fn new(operation: &str, bundles: &[String]) -> Self {
        Self {
            operation: operation.to_string(),
            bundles: bundles.to_vec(),
            current_version: None,
            result: 0,
            bytes: 0,
            critical: false,
        }
    }
}

pub trait TelemetrySink {
    fn record(&self, event: &TelemetryEvent);
}

/// Spools events to a directory
#[derive(Debug, Clone, Default)]
pub struct TelemetrySpool {
    dir: Option<PathBuf>,
}

impl TelemetrySpool {
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self { dir }
    }

    fn write(&self, dir: &std::path::Path, event: &TelemetryEvent) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_nanos());
        let path = dir.join(format!(
            "{}.{}.{}.json",
            event.operation,
            stamp,
            std::process::id()
        ));
        let body = serde_json::to_vec_pretty(event).map_err(std::io::Error::other)?;
        std::fs::write(&path, body)?;
        Ok(path)
    }
}

impl TelemetrySink for TelemetrySpool {
    fn record(&self, event: &TelemetryEvent) {
        debug!(
            operation = %event.operation,
            bundles = %event.bundles.join(","),
            result = event.result,
            bytes = event.bytes,
            critical = event.critical,
            "telemetry"
        );
        let Some(dir) = &self.dir else {
            return;
        };
        if let Err(e) = self.write(dir, event) {
            warn!("Could not spool telemetry to {}: {}", dir.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::create_temp_dir;

    #[test]
    fn test_spool_writes_json_record() {
        let temp = create_temp_dir();
        let spool = TelemetrySpool::new(Some(temp.path().join("telemetry")));
        let mut event = TelemetryEvent::new("bundleadd", &["vim".to_string()]);
        event.current_version = Some(10);
        event.result = 4;
        event.critical = true;
        spool.record(&event);

        let files: Vec<_> = std::fs::read_dir(temp.path().join("telemetry"))
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        assert_eq!(files.len(), 1);
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&files[0]).unwrap()).unwrap();
        assert_eq!(value["operation"], "bundleadd");
        assert_eq!(value["bundles"][0], "vim");
        assert_eq!(value["current_version"], 10);
        assert_eq!(value["result"], 4);
        assert_eq!(value["critical"], true);
    }

    #[test]
    fn test_spool_without_dir_only_logs() {
        TelemetrySpool::default().record(&TelemetryEvent::new("bundleremove", &[]));
    }
}
