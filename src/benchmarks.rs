//! Benchmark normalization and performance tiers

use std::fmt;

use serde::Serialize;

use crate::constants::{CPU_MAX_SCORE, CPU_TIER_BOUNDS, GPU_MAX_SCORE, GPU_TIER_BOUNDS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Tier {
    Budget,
    MidRange,
    HighEnd,
    Enthusiast,
}

impl Tier {
    /// Position of the tier in the per-tier lookup tables
    pub fn index(&self) -> usize {
        match self {
            Tier::Budget => 0,
            Tier::MidRange => 1,
            Tier::HighEnd => 2,
            Tier::Enthusiast => 3,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Tier::Budget => "Budget",
            Tier::MidRange => "Mid-Range",
            Tier::HighEnd => "High-End",
            Tier::Enthusiast => "Enthusiast",
        })
    }
}

/// Convert a raw benchmark score to a percentage of `max_scale`
pub fn normalize(score: u32, max_scale: f64) -> f64 {
    if max_scale <= 0.0 {
        return 0.0;
    }
    f64::from(score) / max_scale * 100.0
}

pub fn normalize_cpu(score: u32) -> f64 {
    normalize(score, CPU_MAX_SCORE)
}

pub fn normalize_gpu(score: u32) -> f64 {
    normalize(score, GPU_MAX_SCORE)
}

fn tier_for(score: u32, bounds: &[u32; 5]) -> Tier {
    if score >= bounds[3] {
        Tier::Enthusiast
    } else if score >= bounds[2] {
        Tier::HighEnd
    } else if score >= bounds[1] {
        Tier::MidRange
    } else {
        Tier::Budget
    }
}

pub fn cpu_tier(score: u32) -> Tier {
    tier_for(score, &CPU_TIER_BOUNDS)
}

pub fn gpu_tier(score: u32) -> Tier {
    tier_for(score, &GPU_TIER_BOUNDS)
}
