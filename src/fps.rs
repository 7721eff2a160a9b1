//! Rough frame-rate model used to express upgrades as per-game impact
//!
//! Each side caps the frame rate independently: the CPU cap scales with the
//! normalized CPU score and the GPU cap scales with the normalized GPU score
//! and the resolution. A game's weights divide each cap, so a CPU-heavy game
//! hits its CPU cap sooner. The delivered frame rate is the lower cap.

use serde::Serialize;

use crate::benchmarks::{normalize_cpu, normalize_gpu};
use crate::constants::{gpu_fps_ceiling, CPU_FPS_CEILING};
use crate::models::{GameWeights, Resolution};

pub fn estimate_fps(cpu_score: u32, gpu_score: u32, weights: GameWeights, resolution: Resolution) -> f64 {
    cpu_fps_cap(cpu_score, weights).min(gpu_fps_cap(gpu_score, weights, resolution))
}

/// Frame rate the CPU alone could sustain in a game
pub fn cpu_fps_cap(cpu_score: u32, weights: GameWeights) -> f64 {
    CPU_FPS_CEILING * normalize_cpu(cpu_score) / 100.0 / weights.cpu
}

pub fn gpu_fps_cap(gpu_score: u32, weights: GameWeights, resolution: Resolution) -> f64 {
    gpu_fps_ceiling(resolution) * normalize_gpu(gpu_score) / 100.0 / weights.gpu
}

/// Percentage change between two frame rates
///
/// Going from nothing to something counts as a full 100% gain.
pub fn fps_gain_percent(before: f64, after: f64) -> f64 {
    if before <= 0.0 {
        return if after > 0.0 { 100.0 } else { 0.0 };
    }
    (after - before) / before * 100.0
}

/// Estimated effect of an upgrade on one game
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameImpact {
    pub game_id: String,
    pub game_name: String,
    pub current_fps: u32,
    pub estimated_fps: u32,
    pub gain_percent: f64,
}

impl GameImpact {
    pub fn new(game_id: &str, game_name: &str, before: f64, after: f64) -> Self {
        Self {
            game_id: game_id.to_string(),
            game_name: game_name.to_string(),
            current_fps: before.round() as u32,
            estimated_fps: after.round() as u32,
            gain_percent: round1(fps_gain_percent(before, after)),
        }
    }
}

pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
