use serde::{Deserialize, Serialize};

/// Fixed knobs for a run: how many resources a whole run provisions (split
/// evenly across agents, remainder discarded), how many messages go into
/// each created resource, and the numeric range resource-name suffixes are
/// drawn from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    pub total_quota: usize,
    pub messages_per_resource: usize,
    pub suffix_min: u32,
    pub suffix_max: u32,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            total_quota: 70,
            messages_per_resource: 5,
            suffix_min: 5000,
            suffix_max: 50000,
        }
    }
}

impl RunConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            total_quota: env_usize("CONVOY_TOTAL_QUOTA", defaults.total_quota),
            messages_per_resource: env_usize(
                "CONVOY_MESSAGES_PER_RESOURCE",
                defaults.messages_per_resource,
            ),
            suffix_min: defaults.suffix_min,
            suffix_max: defaults.suffix_max,
        }
    }

    /// Per-agent share of the total quota. Integer division; the remainder
    /// is discarded, never redistributed.
    pub fn quota_per_agent(&self, agents: usize) -> usize {
        self.total_quota / agents
    }
}

fn env_usize(key: &str, default: usize) -> usize {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
