//! Scales, thresholds and lookup tables shared by the analyzers

use crate::models::{ComponentKind, Resolution, StorageType};

/// Benchmark score treated as 100% for CPUs
pub const CPU_MAX_SCORE: f64 = 60_000.0;
/// Benchmark score treated as 100% for GPUs
pub const GPU_MAX_SCORE: f64 = 40_000.0;

/// Tier boundaries: Budget / Mid-Range / High-End / Enthusiast
pub const CPU_TIER_BOUNDS: [u32; 5] = [0, 15_000, 30_000, 45_000, 60_000];
pub const GPU_TIER_BOUNDS: [u32; 5] = [0, 10_000, 20_000, 30_000, 40_000];

/// Normalized difference below which a build counts as balanced
pub const BOTTLENECK_THRESHOLD: f64 = 10.0;
/// Above this a bottleneck is described as significant
pub const SIGNIFICANT_BOTTLENECK: u32 = 25;

pub const MIN_WEIGHT: f64 = 0.5;
pub const MAX_WEIGHT: f64 = 1.5;

/// (cpu delta, gpu delta) applied to game weights per resolution
pub fn resolution_weight_delta(resolution: Resolution) -> (f64, f64) {
    match resolution {
        Resolution::P1080 => (0.1, -0.1),
        Resolution::P1440 => (0.0, 0.0),
        Resolution::P4k => (-0.2, 0.2),
    }
}

// Build score
pub const BUILD_SCORE_START: f64 = 100.0;
pub const BUILD_SCORE_EMPTY: u32 = 50;
pub const BOTTLENECK_DEDUCTION_FACTOR: f64 = 0.5;
pub const MAX_BOTTLENECK_DEDUCTION: f64 = 15.0;
pub const RAM_DEDUCTION: f64 = 5.0;
pub const AGE_HIGH_DEDUCTION: f64 = 10.0;
pub const AGE_MEDIUM_DEDUCTION: f64 = 5.0;

/// Expected useful life of a component in years
pub fn lifespan_years(kind: ComponentKind) -> u32 {
    match kind {
        ComponentKind::Cpu => 5,
        ComponentKind::Gpu => 4,
        ComponentKind::Ram => 7,
        ComponentKind::Storage => 5,
        ComponentKind::Psu => 8,
    }
}

pub const URGENCY_HIGH_RATIO: f64 = 0.8;
pub const URGENCY_MEDIUM_RATIO: f64 = 0.5;

pub fn storage_score(storage: StorageType) -> u32 {
    match storage {
        StorageType::Nvme => 100,
        StorageType::SataSsd => 60,
        StorageType::Hdd => 20,
    }
}

// Power draw estimates in watts, indexed by tier
pub const CPU_TIER_WATTS: [u32; 4] = [65, 95, 125, 170];
pub const GPU_TIER_WATTS: [u32; 4] = [75, 170, 250, 350];
pub const SYSTEM_OVERHEAD_WATTS: u32 = 100;
pub const PSU_SAFE_LOAD_RATIO: f64 = 0.8;
pub const PSU_WATTAGE_STEP: u32 = 50;

// Priority formula
pub const PRIORITY_BOTTLENECK_WEIGHT: f64 = 0.4;
pub const PRIORITY_AGE_WEIGHT: f64 = 0.2;
pub const PRIORITY_VALUE_WEIGHT: f64 = 0.4;
pub const AGE_SCORE_HIGH: f64 = 100.0;
pub const AGE_SCORE_MEDIUM: f64 = 50.0;
pub const AGE_SCORE_LOW: f64 = 20.0;
pub const PRIORITY_HIGH: u32 = 70;
pub const PRIORITY_MEDIUM: u32 = 40;
/// Age-only recommendations never outrank bottleneck-driven ones
pub const AGE_ONLY_PRIORITY_CAP: u32 = 50;

// Candidate search
pub const DEFAULT_CANDIDATE_LIMIT: usize = 3;
pub const DEFAULT_QUERY_TIMEOUT_SECS: u64 = 10;

// Sequential bottleneck lookahead
pub const SEQUENTIAL_SEVERITY: u32 = 30;
pub const SEQUENTIAL_SOON_RATIO: f64 = 0.5;
pub const SEQUENTIAL_LATER_RATIO: f64 = 0.3;
pub const FOLLOW_UP_SCORE_FACTOR: f64 = 1.25;

/// Fallback estimate when no priced candidate exists
pub const FALLBACK_SCORE_MULTIPLIER: u32 = 2;
pub const FALLBACK_PERFORMANCE_GAIN: f64 = 100.0;

// RAM and storage upgrades
pub const RAM_UPGRADE_STEPS: [(u32, f64); 3] = [(16, 50.0), (32, 100.0), (64, 200.0)];
pub const NVME_UPGRADE_COST: f64 = 80.0;

// Combo optimizer
pub const COMBO_MIN_BUDGET: f64 = 300.0;
pub const COMBO_MIN_IMPROVEMENT: f64 = 10.0;
pub const NEW_BOTTLENECK_SEVERITY: u32 = 40;
pub const NEW_BOTTLENECK_GAME_RATIO: f64 = 0.3;
pub const NEW_BOTTLENECK_DISCARD: f64 = 50.0;
pub const DEFAULT_COMBO_LIMIT: usize = 3;

// FPS model
pub const CPU_FPS_CEILING: f64 = 300.0;

pub fn gpu_fps_ceiling(resolution: Resolution) -> f64 {
    match resolution {
        Resolution::P1080 => 240.0,
        Resolution::P1440 => 165.0,
        Resolution::P4k => 100.0,
    }
}
