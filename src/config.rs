//! Engine settings

use std::time::Duration;

use chrono::Datelike;

use crate::constants::{DEFAULT_CANDIDATE_LIMIT, DEFAULT_COMBO_LIMIT, DEFAULT_QUERY_TIMEOUT_SECS};

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Store calls slower than this are treated as failed
    pub query_timeout: Duration,
    /// Upgrade candidates kept per component type
    pub candidate_limit: usize,
    /// Combined CPU+GPU upgrades returned
    pub combo_limit: usize,
    /// Year used to compute component ages
    pub current_year: i32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            query_timeout: Duration::from_secs(DEFAULT_QUERY_TIMEOUT_SECS),
            candidate_limit: DEFAULT_CANDIDATE_LIMIT,
            combo_limit: DEFAULT_COMBO_LIMIT,
            current_year: chrono::Local::now().year(),
        }
    }
}

impl EngineConfig {
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.query_timeout = Duration::from_secs(secs);
        self
    }

    pub fn with_year(mut self, year: Option<i32>) -> Self {
        if let Some(year) = year {
            self.current_year = year;
        }
        self
    }
}
