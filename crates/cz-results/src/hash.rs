//! Run identifiers.

use cz_project::ControllerConfig;
use sha2::{Digest, Sha256};

/// Hex digest length kept in run ids.
const RUN_ID_LEN: usize = 16;

/// Derive a run id from the configuration and the run's start timestamp.
///
/// Two runs of the same configuration get distinct ids; the prefix of the
/// digest is kept so ids stay readable in directory listings.
pub fn compute_run_id(config: &ControllerConfig, started_at: &str) -> String {
    let mut hasher = Sha256::new();

    let config_json = serde_json::to_string(config).unwrap_or_default();
    hasher.update(config_json.as_bytes());
    hasher.update(started_at.as_bytes());

    let digest = format!("{:x}", hasher.finalize());
    digest[..RUN_ID_LEN].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_stability() {
        let config = ControllerConfig::reference();
        let a = compute_run_id(&config, "2026-02-25T12:00:00Z");
        let b = compute_run_id(&config, "2026-02-25T12:00:00Z");
        assert_eq!(a, b);
        assert_eq!(a.len(), RUN_ID_LEN);
    }

    #[test]
    fn hash_differs_for_different_inputs() {
        let config = ControllerConfig::reference();
        let mut other = ControllerConfig::reference();
        other.zones[0].setpoint_c = -20.0;

        let t = "2026-02-25T12:00:00Z";
        assert_ne!(compute_run_id(&config, t), compute_run_id(&other, t));
        assert_ne!(
            compute_run_id(&config, t),
            compute_run_id(&config, "2026-02-25T12:00:01Z")
        );
    }
}
