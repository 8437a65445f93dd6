//! Runtime configuration for the scheduler and reminder planning.
//!
//! All structs deserialise from JSON with serde and fall back to the
//! defaults the original deployment shipped with, so an empty config file
//! is always valid.

use serde::{Deserialize, Serialize};

/// Bounds for the background job execution pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Ceiling on concurrently executing jobs across all keys.
    pub max_workers: usize,
    /// Ceiling on concurrently executing instances of a single job key.
    pub max_instances_per_job: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_workers: 20,
            max_instances_per_job: 3,
        }
    }
}

/// Tuning for reminder planning and the upcoming-task window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReminderConfig {
    /// Width of the upcoming-task window in days, inclusive of the far end.
    pub upcoming_horizon_days: u64,
    /// Interval between overdue sweep firings, in seconds.
    pub overdue_sweep_interval_secs: u64,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            upcoming_horizon_days: 7,
            overdue_sweep_interval_secs: 86_400,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ReminderConfig, SchedulerConfig};

    #[test]
    fn scheduler_config_defaults_match_deployment_values() {
        let config = SchedulerConfig::default();
        assert_eq!(config.max_workers, 20);
        assert_eq!(config.max_instances_per_job, 3);
    }

    #[test]
    fn empty_json_object_deserialises_to_defaults() {
        let config: ReminderConfig =
            serde_json::from_str("{}").expect("empty object should deserialise");
        assert_eq!(config, ReminderConfig::default());
    }

    #[test]
    fn partial_json_overrides_only_named_fields() {
        let config: SchedulerConfig = serde_json::from_str(r#"{"max_workers": 4}"#)
            .expect("partial object should deserialise");
        assert_eq!(config.max_workers, 4);
        assert_eq!(config.max_instances_per_job, 3);
    }
}
