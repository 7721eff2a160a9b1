//! Storage and power-supply heuristics

use serde::Serialize;

use crate::benchmarks::{cpu_tier, gpu_tier, Tier};
use crate::constants::{
    storage_score, CPU_TIER_WATTS, GPU_TIER_WATTS, PSU_SAFE_LOAD_RATIO, PSU_WATTAGE_STEP,
    SYSTEM_OVERHEAD_WATTS,
};
use crate::models::StorageType;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StorageAnalysis {
    pub storage: StorageType,
    pub performance_score: u32,
    pub needs_upgrade: bool,
    pub advice: &'static str,
}

pub fn analyze_storage(storage: StorageType) -> StorageAnalysis {
    let advice = match storage {
        StorageType::Nvme => "NVMe storage gives the fastest load times available. No upgrade needed.",
        StorageType::SataSsd => {
            "SATA SSD load times are good. NVMe is faster but the difference in games is small."
        }
        StorageType::Hdd => {
            "Hard drives cause long load times and texture pop-in. An SSD is the most noticeable upgrade for the money."
        }
    };

    StorageAnalysis {
        storage,
        performance_score: storage_score(storage),
        needs_upgrade: storage == StorageType::Hdd,
        advice,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PsuAnalysis {
    pub wattage: u32,
    pub cpu_tier: Tier,
    pub gpu_tier: Tier,
    pub estimated_draw: u32,
    pub max_safe_load: u32,
    pub sufficient: bool,
    /// Negative when the estimated draw exceeds the safe load
    pub headroom_percent: i32,
    pub recommended_wattage: Option<u32>,
}

/// Estimate system draw from the CPU/GPU tiers and check it against 80% of the PSU rating
pub fn analyze_psu(psu_watts: u32, cpu_score: u32, gpu_score: u32) -> PsuAnalysis {
    let cpu_tier = cpu_tier(cpu_score);
    let gpu_tier = gpu_tier(gpu_score);
    let estimated_draw =
        CPU_TIER_WATTS[cpu_tier.index()] + GPU_TIER_WATTS[gpu_tier.index()] + SYSTEM_OVERHEAD_WATTS;

    let max_safe_load = f64::from(psu_watts) * PSU_SAFE_LOAD_RATIO;
    let sufficient = f64::from(estimated_draw) <= max_safe_load;
    let headroom_percent = if max_safe_load > 0.0 {
        ((max_safe_load - f64::from(estimated_draw)) / max_safe_load * 100.0).round() as i32
    } else {
        -100
    };

    let recommended_wattage = (!sufficient).then(|| recommended_psu_wattage(estimated_draw));

    PsuAnalysis {
        wattage: psu_watts,
        cpu_tier,
        gpu_tier,
        estimated_draw,
        max_safe_load: max_safe_load.round() as u32,
        sufficient,
        headroom_percent,
        recommended_wattage,
    }
}

/// Smallest multiple of 50W whose safe load covers `draw`
pub fn recommended_psu_wattage(draw: u32) -> u32 {
    let needed = f64::from(draw) / PSU_SAFE_LOAD_RATIO;
    let steps = (needed / f64::from(PSU_WATTAGE_STEP)).ceil() as u32;
    steps * PSU_WATTAGE_STEP
}
