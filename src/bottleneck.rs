//! CPU/GPU bottleneck calculation with per-game and per-resolution weighting

use std::fmt;

use serde::Serialize;

use crate::benchmarks::{normalize_cpu, normalize_gpu};
use crate::constants::{resolution_weight_delta, BOTTLENECK_THRESHOLD};
use crate::models::{GameWeights, Resolution};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BottleneckComponent {
    Cpu,
    Gpu,
    Balanced,
}

impl BottleneckComponent {
    /// The other side of a CPU/GPU pair; balanced has no opposite
    pub fn opposite(&self) -> Option<BottleneckComponent> {
        match self {
            BottleneckComponent::Cpu => Some(BottleneckComponent::Gpu),
            BottleneckComponent::Gpu => Some(BottleneckComponent::Cpu),
            BottleneckComponent::Balanced => None,
        }
    }
}

impl fmt::Display for BottleneckComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BottleneckComponent::Cpu => "CPU",
            BottleneckComponent::Gpu => "GPU",
            BottleneckComponent::Balanced => "balanced",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Bottleneck {
    pub component: BottleneckComponent,
    /// Severity in [0, 100]; 0 when balanced
    pub percentage: u32,
}

impl Bottleneck {
    pub const BALANCED: Bottleneck = Bottleneck {
        component: BottleneckComponent::Balanced,
        percentage: 0,
    };

    pub fn is_balanced(&self) -> bool {
        self.component == BottleneckComponent::Balanced
    }

    /// True if `component` is the bottleneck with severity above `threshold`
    pub fn limits(&self, component: BottleneckComponent, threshold: u32) -> bool {
        self.component == component && self.percentage > threshold
    }
}

/// Determine which component limits performance for raw benchmark scores
pub fn calculate_bottleneck(cpu_score: u32, gpu_score: u32, weights: GameWeights) -> Bottleneck {
    bottleneck_from_normalized(normalize_cpu(cpu_score), normalize_gpu(gpu_score), weights)
}

/// Bottleneck for scores already on the 0–100 scale
pub fn bottleneck_from_normalized(
    normalized_cpu: f64,
    normalized_gpu: f64,
    weights: GameWeights,
) -> Bottleneck {
    let diff = normalized_cpu * weights.cpu - normalized_gpu * weights.gpu;

    if diff.abs() < BOTTLENECK_THRESHOLD {
        return Bottleneck::BALANCED;
    }

    // The weaker side holds the other back
    let component = if diff > 0.0 {
        BottleneckComponent::Gpu
    } else {
        BottleneckComponent::Cpu
    };

    Bottleneck {
        component,
        percentage: diff.abs().round().min(100.0) as u32,
    }
}

/// Shift game weights for the target resolution and clamp to [0.5, 1.5]
///
/// GPU load grows with pixel count while CPU load stays roughly constant,
/// so low resolutions lean on the CPU and 4k leans on the GPU.
pub fn adjust_weights_for_resolution(base: GameWeights, resolution: Resolution) -> GameWeights {
    let (cpu_delta, gpu_delta) = resolution_weight_delta(resolution);
    GameWeights::new(base.cpu + cpu_delta, base.gpu + gpu_delta)
}

/// Derive weights from the benchmark scores of a game's recommended parts
///
/// Each side's weight is its normalized demand relative to the mean demand,
/// so a game recommending a much stronger GPU than CPU leans on the GPU.
pub fn derive_weights(recommended_cpu_score: u32, recommended_gpu_score: u32) -> GameWeights {
    let cpu_demand = normalize_cpu(recommended_cpu_score);
    let gpu_demand = normalize_gpu(recommended_gpu_score);
    let mean = (cpu_demand + gpu_demand) / 2.0;

    if mean <= 0.0 {
        return GameWeights::NEUTRAL;
    }

    GameWeights::new(cpu_demand / mean, gpu_demand / mean)
}
