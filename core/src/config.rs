use std::time::Duration;

use serde::Deserialize;

use crate::error::SwitchStep;

pub const DEFAULT_STEP_TIMEOUT: Duration = Duration::from_secs(30);
/// Account sync walks the transaction history and gets a longer budget.
pub const DEFAULT_SYNC_TIMEOUT: Duration = Duration::from_secs(120);

/// Per-call timeouts for the switch steps, in seconds when deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SwitchTimeouts {
    #[serde(rename = "step_secs", deserialize_with = "secs")]
    pub step: Duration,
    #[serde(rename = "sync_secs", deserialize_with = "secs")]
    pub sync: Duration,
}

impl Default for SwitchTimeouts {
    fn default() -> Self {
        Self {
            step: DEFAULT_STEP_TIMEOUT,
            sync: DEFAULT_SYNC_TIMEOUT,
        }
    }
}

impl SwitchTimeouts {
    /// Same timeout for every step.
    pub fn uniform(timeout: Duration) -> Self {
        Self {
            step: timeout,
            sync: timeout,
        }
    }

    pub fn for_step(&self, step: SwitchStep) -> Duration {
        match step {
            SwitchStep::SyncAccount => self.sync,
            _ => self.step,
        }
    }
}

fn secs<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    let secs = u64::deserialize(deserializer)?;
    if secs == 0 {
        return Err(serde::de::Error::custom("timeout must be at least 1 second"));
    }
    Ok(Duration::from_secs(secs))
}
