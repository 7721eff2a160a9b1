//! Combined CPU+GPU upgrade search under a single budget

use serde::Serialize;
use tracing::debug;

use crate::analysis::GameAnalysis;
use crate::bottleneck::{calculate_bottleneck, BottleneckComponent};
use crate::candidates::{find_upgrade_candidates, performance_gain, UpgradeCandidate};
use crate::config::EngineConfig;
use crate::constants::{
    COMBO_MIN_BUDGET, COMBO_MIN_IMPROVEMENT, NEW_BOTTLENECK_DISCARD, NEW_BOTTLENECK_GAME_RATIO,
    NEW_BOTTLENECK_SEVERITY,
};
use crate::fps::{cpu_fps_cap, estimate_fps, fps_gain_percent, gpu_fps_cap, round1, GameImpact};
use crate::models::{ComponentKind, GameWeights, InstalledPart, Resolution};
use crate::store::{OperationResult, SharedStore};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComboPart {
    pub component_id: String,
    pub name: String,
    pub price: f64,
    /// Benchmark improvement over the installed part, in percent
    pub improvement: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComboComponents {
    pub cpu: ComboPart,
    pub gpu: ComboPart,
}

/// How the combo compares with spending on only one of its parts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SingleUpgradeComparison {
    pub component: ComponentKind,
    pub single_gain: f64,
    pub difference_gain: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComboRecommendation {
    pub components: ComboComponents,
    pub total_cost: f64,
    pub total_performance_gain: f64,
    /// Gain per dollar, scaled by 100
    pub value_score: f64,
    pub reason_for_combo: String,
    pub affected_games: Vec<String>,
    pub per_game_impact: Vec<GameImpact>,
    pub warns_about_new_bottleneck: bool,
    pub new_bottleneck_component: Option<BottleneckComponent>,
    pub compared_to_single_upgrade: Option<SingleUpgradeComparison>,
}

/// A severe imbalance the new parts would introduce
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NewBottleneck {
    pub component: BottleneckComponent,
    /// Mean severity across the affected games
    pub severity: f64,
    pub affected_games: usize,
}

/// Check a fixed pair of scores for a bottleneck above 40% in more than 30% of games
pub fn detect_new_bottleneck(cpu_score: u32, gpu_score: u32, analyses: &[GameAnalysis]) -> Option<NewBottleneck> {
    if analyses.is_empty() {
        return None;
    }

    let mut cpu = (0usize, 0u32);
    let mut gpu = (0usize, 0u32);
    for analysis in analyses {
        let result = calculate_bottleneck(cpu_score, gpu_score, analysis.weights());
        if result.percentage <= NEW_BOTTLENECK_SEVERITY {
            continue;
        }
        match result.component {
            BottleneckComponent::Cpu => {
                cpu.0 += 1;
                cpu.1 += result.percentage;
            }
            BottleneckComponent::Gpu => {
                gpu.0 += 1;
                gpu.1 += result.percentage;
            }
            BottleneckComponent::Balanced => {}
        }
    }

    let severe = cpu.0 + gpu.0;
    if (severe as f64 / analyses.len() as f64) <= NEW_BOTTLENECK_GAME_RATIO {
        return None;
    }

    let component = if cpu.0 > gpu.0 || (cpu.0 == gpu.0 && cpu.1 >= gpu.1) {
        BottleneckComponent::Cpu
    } else {
        BottleneckComponent::Gpu
    };

    Some(NewBottleneck {
        component,
        severity: f64::from(cpu.1 + gpu.1) / severe as f64,
        affected_games: severe,
    })
}

/// Weights and identity of one evaluated game
struct Workload<'a> {
    weights: GameWeights,
    analysis: Option<&'a GameAnalysis>,
}

/// Weighted gains of a CPU+GPU pair
///
/// `combo_gain` counts, per game, only the smaller of the two side gains.
/// The single-part gains are frame-rate gains from the model in `fps`.
struct PairEvaluation {
    combo_gain: f64,
    cpu_only_gain: f64,
    gpu_only_gain: f64,
    per_game: Vec<GameImpact>,
}

/// Per-game combo gain: each side's cap rise, bounded by the weaker side
fn capped_game_gain(current: (u32, u32), new: (u32, u32), weights: GameWeights, resolution: Resolution) -> f64 {
    let cpu_gain = fps_gain_percent(cpu_fps_cap(current.0, weights), cpu_fps_cap(new.0, weights));
    let gpu_gain = fps_gain_percent(
        gpu_fps_cap(current.1, weights, resolution),
        gpu_fps_cap(new.1, weights, resolution),
    );
    cpu_gain.min(gpu_gain)
}

fn evaluate_pair(
    workloads: &[Workload<'_>],
    current: (u32, u32),
    new: (u32, u32),
    resolution: Resolution,
) -> PairEvaluation {
    let (cpu, gpu) = current;
    let (new_cpu, new_gpu) = new;

    let mut total_weight = 0.0;
    let mut combo = 0.0;
    let mut cpu_only = 0.0;
    let mut gpu_only = 0.0;
    let mut per_game = Vec::new();

    for workload in workloads {
        let w = workload.weights;
        let weight = w.total();
        let before = estimate_fps(cpu, gpu, w, resolution);

        total_weight += weight;
        combo += capped_game_gain(current, new, w, resolution) * weight;
        cpu_only += fps_gain_percent(before, estimate_fps(new_cpu, gpu, w, resolution)) * weight;
        gpu_only += fps_gain_percent(before, estimate_fps(cpu, new_gpu, w, resolution)) * weight;

        if let Some(analysis) = workload.analysis {
            let after = estimate_fps(new_cpu, new_gpu, w, resolution);
            per_game.push(GameImpact::new(&analysis.game.id, &analysis.game.name, before, after));
        }
    }

    if total_weight <= 0.0 {
        total_weight = 1.0;
    }
    PairEvaluation {
        combo_gain: round1(combo / total_weight),
        cpu_only_gain: round1(cpu_only / total_weight),
        gpu_only_gain: round1(gpu_only / total_weight),
        per_game,
    }
}

/// Best-value CPU+GPU pairs that fit the budget together
///
/// Below $300 there is no meaningful pair and the result is empty. Pairs where
/// neither part improves by 10% are skipped, as are pairs that would leave a
/// new bottleneck above 50%. Ranked by gain per dollar.
pub fn generate_combo_recommendations(
    store: &SharedStore,
    config: &EngineConfig,
    cpu: &InstalledPart,
    gpu: &InstalledPart,
    analyses: &[GameAnalysis],
    budget: f64,
    resolution: Resolution,
) -> OperationResult<Vec<ComboRecommendation>> {
    let mut result = OperationResult::new(Vec::new());
    if budget < COMBO_MIN_BUDGET {
        return result;
    }

    let cpu_candidates = result.absorb(find_upgrade_candidates(store, config, ComponentKind::Cpu, cpu.score, budget));
    let gpu_candidates = result.absorb(find_upgrade_candidates(store, config, ComponentKind::Gpu, gpu.score, budget));

    let workloads: Vec<Workload<'_>> = if analyses.is_empty() {
        vec![Workload {
            weights: GameWeights::NEUTRAL,
            analysis: None,
        }]
    } else {
        analyses
            .iter()
            .map(|a| Workload {
                weights: a.weights(),
                analysis: Some(a),
            })
            .collect()
    };

    let mut combos = Vec::new();
    for cpu_candidate in &cpu_candidates {
        for gpu_candidate in &gpu_candidates {
            if let Some(combo) = evaluate_combo(
                cpu,
                gpu,
                cpu_candidate,
                gpu_candidate,
                analyses,
                &workloads,
                budget,
                resolution,
            ) {
                combos.push(combo);
            }
        }
    }

    combos.sort_by(|a, b| b.value_score.total_cmp(&a.value_score));
    combos.truncate(config.combo_limit);
    debug!(
        cpu_candidates = cpu_candidates.len(),
        gpu_candidates = gpu_candidates.len(),
        kept = combos.len(),
        "combo search"
    );

    result.data = combos;
    result
}

#[allow(clippy::too_many_arguments)]
fn evaluate_combo(
    cpu: &InstalledPart,
    gpu: &InstalledPart,
    cpu_candidate: &UpgradeCandidate,
    gpu_candidate: &UpgradeCandidate,
    analyses: &[GameAnalysis],
    workloads: &[Workload<'_>],
    budget: f64,
    resolution: Resolution,
) -> Option<ComboRecommendation> {
    let total_cost = cpu_candidate.seed_price + gpu_candidate.seed_price;
    if total_cost > budget {
        return None;
    }

    let new_cpu = cpu_candidate.component.benchmark_score;
    let new_gpu = gpu_candidate.component.benchmark_score;
    let cpu_improvement = performance_gain(cpu.score, new_cpu);
    let gpu_improvement = performance_gain(gpu.score, new_gpu);
    if cpu_improvement < COMBO_MIN_IMPROVEMENT && gpu_improvement < COMBO_MIN_IMPROVEMENT {
        return None;
    }

    let new_bottleneck = detect_new_bottleneck(new_cpu, new_gpu, analyses);
    if new_bottleneck.is_some_and(|b| b.severity > NEW_BOTTLENECK_DISCARD) {
        return None;
    }

    let eval = evaluate_pair(workloads, (cpu.score, gpu.score), (new_cpu, new_gpu), resolution);
    let value_score = if total_cost > 0.0 {
        eval.combo_gain / total_cost * 100.0
    } else {
        0.0
    };

    let (single_kind, single_gain) = if eval.cpu_only_gain >= eval.gpu_only_gain {
        (ComponentKind::Cpu, eval.cpu_only_gain)
    } else {
        (ComponentKind::Gpu, eval.gpu_only_gain)
    };
    let compared = SingleUpgradeComparison {
        component: single_kind,
        single_gain,
        difference_gain: round1(eval.combo_gain - single_gain),
    };

    let mut affected_games: Vec<String> = analyses
        .iter()
        .filter(|a| !a.bottleneck.is_balanced())
        .map(|a| a.game.name.clone())
        .collect();
    if affected_games.is_empty() {
        affected_games = eval
            .per_game
            .iter()
            .filter(|i| i.gain_percent > 0.0)
            .map(|i| i.game_name.clone())
            .collect();
    }

    let mut reason = format!(
        "Upgrading both parts together is worth about {:.0}%, held back by the smaller of the two jumps, versus {:.0}% more frames from the {} alone.",
        eval.combo_gain,
        single_gain,
        single_kind.label()
    );
    if let Some(b) = new_bottleneck {
        reason.push_str(&format!(
            " Watch out: the {} would still limit {} games by about {:.0}%.",
            b.component, b.affected_games, b.severity
        ));
    }

    Some(ComboRecommendation {
        components: ComboComponents {
            cpu: ComboPart {
                component_id: cpu_candidate.component.id.clone(),
                name: cpu_candidate.component.display_name(),
                price: cpu_candidate.seed_price,
                improvement: round1(cpu_improvement),
            },
            gpu: ComboPart {
                component_id: gpu_candidate.component.id.clone(),
                name: gpu_candidate.component.display_name(),
                price: gpu_candidate.seed_price,
                improvement: round1(gpu_improvement),
            },
        },
        total_cost,
        total_performance_gain: eval.combo_gain,
        value_score: round1(value_score),
        reason_for_combo: reason,
        affected_games,
        per_game_impact: eval.per_game,
        warns_about_new_bottleneck: new_bottleneck.is_some(),
        new_bottleneck_component: new_bottleneck.map(|b| b.component),
        compared_to_single_upgrade: Some(compared),
    })
}
