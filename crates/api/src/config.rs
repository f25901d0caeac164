use std::time::Duration;

use anyhow::{bail, Context as _};

use crate::scheduling::{DEFAULT_MATCH_MINUTES, DEFAULT_MAX_SLOTS};

const DEFAULT_GENERATION_TIMEOUT_SECS: u64 = 30;

/// Tunables for schedule generation, read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulingConfig {
    pub default_match_minutes: u32,
    pub generation_timeout: Duration,
    pub max_slots: usize,
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            default_match_minutes: DEFAULT_MATCH_MINUTES,
            generation_timeout: Duration::from_secs(DEFAULT_GENERATION_TIMEOUT_SECS),
            max_slots: DEFAULT_MAX_SLOTS,
        }
    }
}

impl SchedulingConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();

        let default_match_minutes = match lookup("SCHEDULE_DEFAULT_MATCH_MINUTES") {
            Some(v) => v
                .trim()
                .parse::<u32>()
                .context("SCHEDULE_DEFAULT_MATCH_MINUTES must be a positive integer")?,
            None => defaults.default_match_minutes,
        };
        if default_match_minutes == 0 {
            bail!("SCHEDULE_DEFAULT_MATCH_MINUTES must be greater than zero");
        }

        let generation_timeout = match lookup("SCHEDULE_GENERATION_TIMEOUT_SECS") {
            Some(v) => Duration::from_secs(
                v.trim()
                    .parse::<u64>()
                    .context("SCHEDULE_GENERATION_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            None => defaults.generation_timeout,
        };

        let max_slots = match lookup("SCHEDULE_MAX_SLOTS") {
            Some(v) => v
                .trim()
                .parse::<usize>()
                .context("SCHEDULE_MAX_SLOTS must be a positive integer")?,
            None => defaults.max_slots,
        };

        Ok(Self {
            default_match_minutes,
            generation_timeout,
            max_slots,
        })
    }
}
