//! Prioritized upgrade recommendations per component type
//!
//! CPU and GPU recommendations are driven by per-game bottlenecks and by
//! component age; RAM by per-game memory deficits; storage by the presence of
//! a hard drive. Each recommendation carries a 0–100 priority built from
//! bottleneck severity (40%), age urgency (20%) and value for money (40%).

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::analysis::{ComponentAge, GameAnalysis, Urgency};
use crate::bottleneck::{calculate_bottleneck, BottleneckComponent};
use crate::candidates::{find_next_tier, find_upgrade_candidates, UpgradeCandidate};
use crate::config::EngineConfig;
use crate::constants::{
    storage_score, AGE_ONLY_PRIORITY_CAP, AGE_SCORE_HIGH, AGE_SCORE_LOW, AGE_SCORE_MEDIUM,
    BOTTLENECK_THRESHOLD, FALLBACK_PERFORMANCE_GAIN, FALLBACK_SCORE_MULTIPLIER,
    FOLLOW_UP_SCORE_FACTOR, NVME_UPGRADE_COST, PRIORITY_AGE_WEIGHT, PRIORITY_BOTTLENECK_WEIGHT,
    PRIORITY_HIGH, PRIORITY_MEDIUM, PRIORITY_VALUE_WEIGHT, RAM_UPGRADE_STEPS,
    SEQUENTIAL_LATER_RATIO, SEQUENTIAL_SEVERITY, SEQUENTIAL_SOON_RATIO,
};
use crate::fps::{estimate_fps, round1, GameImpact};
use crate::models::{ComponentKind, InstalledPart, RamConfig, Resolution, StorageType};
use crate::store::{OperationResult, SharedStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PriorityLabel {
    High,
    Medium,
    Low,
}

impl fmt::Display for PriorityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PriorityLabel::High => "High",
            PriorityLabel::Medium => "Medium",
            PriorityLabel::Low => "Low",
        })
    }
}

pub fn priority_label(score: u32) -> PriorityLabel {
    if score >= PRIORITY_HIGH {
        PriorityLabel::High
    } else if score >= PRIORITY_MEDIUM {
        PriorityLabel::Medium
    } else {
        PriorityLabel::Low
    }
}

fn age_score(urgency: Urgency) -> f64 {
    match urgency {
        Urgency::High => AGE_SCORE_HIGH,
        Urgency::Medium => AGE_SCORE_MEDIUM,
        Urgency::Low => AGE_SCORE_LOW,
    }
}

/// Gain per dollar scaled to 0–100; an unknown cost earns nothing
pub fn value_score(performance_gain: f64, cost: Option<f64>) -> f64 {
    match cost {
        Some(cost) if cost > 0.0 => (performance_gain / cost * 100.0).clamp(0.0, 100.0),
        _ => 0.0,
    }
}

pub fn priority_score(
    bottleneck_percentage: f64,
    urgency: Urgency,
    performance_gain: f64,
    cost: Option<f64>,
) -> u32 {
    let bottleneck = bottleneck_percentage.clamp(0.0, 100.0);
    let priority = bottleneck * PRIORITY_BOTTLENECK_WEIGHT
        + age_score(urgency) * PRIORITY_AGE_WEIGHT
        + value_score(performance_gain, cost) * PRIORITY_VALUE_WEIGHT;
    priority.round() as u32
}

/// One priced option shown alongside a recommendation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateOption {
    pub component_id: String,
    pub name: String,
    pub benchmark_score: u32,
    pub price: f64,
    pub performance_gain: f64,
    /// Performance gain per dollar
    pub value_score: f64,
}

impl CandidateOption {
    fn from_candidate(candidate: &UpgradeCandidate, current_score: u32) -> Self {
        let gain = candidate.performance_gain(current_score);
        Self {
            component_id: candidate.component.id.clone(),
            name: candidate.component.display_name(),
            benchmark_score: candidate.component.benchmark_score,
            price: candidate.seed_price,
            performance_gain: round1(gain),
            value_score: if candidate.seed_price > 0.0 {
                gain / candidate.seed_price
            } else {
                0.0
            },
        }
    }
}

/// Index of the option with the best gain per dollar
pub fn sweet_spot_index(options: &[CandidateOption]) -> Option<usize> {
    options
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.value_score.total_cmp(&b.value_score))
        .map(|(i, _)| i)
}

/// Lookahead result: upgrading one side will expose the other
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SequentialBottleneck {
    pub next_component: BottleneckComponent,
    pub affected_games: usize,
    pub total_games: usize,
    pub timeframe: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathWarning {
    pub next_component: BottleneckComponent,
    pub affected_games: usize,
    pub timeframe: &'static str,
    pub follow_up_component: Option<String>,
    pub follow_up_cost: Option<f64>,
    pub total_two_step_cost: Option<f64>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpgradeRecommendation {
    pub component_type: ComponentKind,
    pub current_component: String,
    pub recommended_component: String,
    pub recommended_id: Option<String>,
    pub price: Option<f64>,
    pub priority_score: u32,
    pub priority_label: PriorityLabel,
    pub estimated_performance_gain: f64,
    pub reason: String,
    pub affected_games: Vec<String>,
    pub alternatives: Vec<CandidateOption>,
    /// Every priced option, best performer first
    pub value_curve: Vec<CandidateOption>,
    pub sweet_spot_index: Option<usize>,
    pub path_warning: Option<PathWarning>,
    pub per_game_impact: Vec<GameImpact>,
    /// True for the generic "browse modern parts" suggestion
    pub is_fallback: bool,
}

impl UpgradeRecommendation {
    fn new(component_type: ComponentKind, current: String, recommended: String) -> Self {
        Self {
            component_type,
            current_component: current,
            recommended_component: recommended,
            recommended_id: None,
            price: None,
            priority_score: 0,
            priority_label: PriorityLabel::Low,
            estimated_performance_gain: 0.0,
            reason: String::new(),
            affected_games: Vec::new(),
            alternatives: Vec::new(),
            value_curve: Vec::new(),
            sweet_spot_index: None,
            path_warning: None,
            per_game_impact: Vec::new(),
            is_fallback: false,
        }
    }

    fn with_priority(mut self, score: u32) -> Self {
        self.priority_score = score;
        self.priority_label = priority_label(score);
        self
    }
}

/// Everything the generator needs about the current build
#[derive(Debug, Clone)]
pub struct UpgradeRequest<'a> {
    pub cpu: &'a InstalledPart,
    pub gpu: &'a InstalledPart,
    pub ram: &'a RamConfig,
    pub storage: StorageType,
    pub analyses: &'a [GameAnalysis],
    pub budget: f64,
    pub ages: &'a [ComponentAge],
    pub resolution: Resolution,
}

impl UpgradeRequest<'_> {
    fn age_of(&self, kind: ComponentKind) -> Option<&ComponentAge> {
        self.ages.iter().find(|a| a.kind == kind)
    }

    fn urgency_of(&self, kind: ComponentKind) -> Urgency {
        self.age_of(kind).map_or(Urgency::Low, |a| a.urgency)
    }
}

pub fn generate_upgrade_recommendations(
    store: &SharedStore,
    config: &EngineConfig,
    request: &UpgradeRequest<'_>,
) -> OperationResult<Vec<UpgradeRecommendation>> {
    let mut result = OperationResult::new(Vec::new());
    let mut recommendations = Vec::new();

    for kind in [ComponentKind::Cpu, ComponentKind::Gpu] {
        let processor = recommend_processor(store, config, request, kind);
        if let Some(rec) = result.absorb(processor) {
            recommendations.push(rec);
        }
    }

    let ram = recommend_ram(request);
    if let Some(rec) = result.absorb(ram) {
        recommendations.push(rec);
    }

    let storage = recommend_storage(request);
    if let Some(rec) = result.absorb(storage) {
        recommendations.push(rec);
    }

    recommendations.sort_by(|a, b| b.priority_score.cmp(&a.priority_score));
    debug!(count = recommendations.len(), "upgrade recommendations");
    result.data = recommendations;
    result
}

fn recommend_processor(
    store: &SharedStore,
    config: &EngineConfig,
    request: &UpgradeRequest<'_>,
    kind: ComponentKind,
) -> OperationResult<Option<UpgradeRecommendation>> {
    let mut result = OperationResult::new(None);

    let (current, side) = match kind {
        ComponentKind::Cpu => (request.cpu, BottleneckComponent::Cpu),
        _ => (request.gpu, BottleneckComponent::Gpu),
    };

    let limited: Vec<&GameAnalysis> = request
        .analyses
        .iter()
        .filter(|a| a.bottleneck.limits(side, BOTTLENECK_THRESHOLD as u32))
        .collect();
    let age = request.age_of(kind);
    let aged = age.is_some_and(|a| a.past_lifespan());

    if limited.is_empty() && !aged {
        return result;
    }

    let average_bottleneck = if limited.is_empty() {
        0.0
    } else {
        limited
            .iter()
            .map(|a| f64::from(a.bottleneck.percentage))
            .sum::<f64>()
            / limited.len() as f64
    };
    let urgency = request.urgency_of(kind);
    let affected_games: Vec<String> = limited.iter().map(|a| a.game.name.clone()).collect();

    let search = find_upgrade_candidates(store, config, kind, current.score, request.budget);
    let candidates = result.absorb(search);

    let Some(primary) = candidates.first() else {
        if let Some(age) = age.filter(|a| a.past_lifespan()) {
            let mut rec = generic_modern_fallback(current, age, average_bottleneck, !limited.is_empty());
            rec.affected_games = affected_games;
            result.data = Some(rec);
        } else {
            result.warn(format!(
                "No {} upgrades found within your ${:.0} budget",
                kind.label(),
                request.budget
            ));
        }
        return result;
    };

    let gain = primary.performance_gain(current.score);
    let mut priority = priority_score(average_bottleneck, urgency, gain, Some(primary.seed_price));
    if limited.is_empty() {
        priority = priority.min(AGE_ONLY_PRIORITY_CAP);
    }

    let value_curve: Vec<CandidateOption> = candidates
        .iter()
        .map(|c| CandidateOption::from_candidate(c, current.score))
        .collect();

    let mut rec = UpgradeRecommendation::new(kind, current.name.clone(), primary.component.display_name())
        .with_priority(priority);
    rec.recommended_id = Some(primary.component.id.clone());
    rec.price = Some(primary.seed_price);
    rec.estimated_performance_gain = round1(gain);
    rec.reason = processor_reason(current, primary, gain, average_bottleneck, &limited, request, age);
    rec.affected_games = affected_games;
    rec.alternatives = value_curve.iter().skip(1).cloned().collect();
    rec.sweet_spot_index = sweet_spot_index(&value_curve);
    rec.value_curve = value_curve;
    rec.per_game_impact = single_upgrade_impact(request, kind, primary.component.benchmark_score);

    let (cpu_score, gpu_score) = (request.cpu.score, request.gpu.score);
    if let Some(sequential) = detect_sequential_bottleneck(
        kind,
        primary.component.benchmark_score,
        cpu_score,
        gpu_score,
        request.analyses,
    ) {
        let follow_up = plan_follow_up(store, config, request, &sequential, primary.seed_price);
        rec.path_warning = Some(result.absorb(follow_up));
    }

    result.data = Some(rec);
    result
}

fn processor_reason(
    current: &InstalledPart,
    primary: &UpgradeCandidate,
    gain: f64,
    average_bottleneck: f64,
    limited: &[&GameAnalysis],
    request: &UpgradeRequest<'_>,
    age: Option<&ComponentAge>,
) -> String {
    let offer = format!(
        "The {} is {:.0}% faster for ${:.0}.",
        primary.component.display_name(),
        gain,
        primary.seed_price
    );

    let mut reason = if limited.is_empty() {
        match age {
            Some(age) => format!(
                "Your {} is {} years old, past the typical {}-year lifespan. {}",
                current.name, age.age_years, age.lifespan_years, offer
            ),
            None => offer,
        }
    } else {
        format!(
            "Your {} is holding back {} of {} games by {:.0}% on average. {}",
            current.name,
            limited.len(),
            request.analyses.len(),
            average_bottleneck,
            offer
        )
    };

    if !limited.is_empty() {
        if let Some(age) = age.filter(|a| a.past_lifespan()) {
            reason.push_str(&format!(" It is also {} years old.", age.age_years));
        }
    }
    reason
}

/// Coarse suggestion for an aged part when no priced candidate exists
///
/// Assumes a current-generation part scores about twice as high and reports a
/// placeholder 100% gain.
fn generic_modern_fallback(
    current: &InstalledPart,
    age: &ComponentAge,
    average_bottleneck: f64,
    bottleneck_driven: bool,
) -> UpgradeRecommendation {
    let label = current.kind.label();
    let estimated_score = current.score.saturating_mul(FALLBACK_SCORE_MULTIPLIER);

    let mut priority = priority_score(average_bottleneck, age.urgency, FALLBACK_PERFORMANCE_GAIN, None);
    if !bottleneck_driven {
        priority = priority.min(AGE_ONLY_PRIORITY_CAP);
    }

    let mut rec = UpgradeRecommendation::new(
        current.kind,
        current.name.clone(),
        format!("Browse modern {}s", label),
    )
    .with_priority(priority);
    rec.estimated_performance_gain = FALLBACK_PERFORMANCE_GAIN;
    rec.is_fallback = true;
    rec.reason = format!(
        "Your {} is {} years old, past the typical {}-year lifespan. No priced upgrade fits the budget right now; a current {} typically scores around {} versus your {}.",
        current.name, age.age_years, age.lifespan_years, label, estimated_score, current.score
    );
    rec
}

fn single_upgrade_impact(request: &UpgradeRequest<'_>, kind: ComponentKind, new_score: u32) -> Vec<GameImpact> {
    let (cpu, gpu) = (request.cpu.score, request.gpu.score);
    let (new_cpu, new_gpu) = match kind {
        ComponentKind::Cpu => (new_score, gpu),
        _ => (cpu, new_score),
    };

    request
        .analyses
        .iter()
        .map(|a| {
            let weights = a.weights();
            let before = estimate_fps(cpu, gpu, weights, request.resolution);
            let after = estimate_fps(new_cpu, new_gpu, weights, request.resolution);
            GameImpact::new(&a.game.id, &a.game.name, before, after)
        })
        .collect()
}

/// Simulate upgrading one side and check whether the other side becomes the problem
///
/// Counts games where the opposite component goes from fine to bottlenecked
/// above 30%. Half the games or more means it will bite soon; 30% or more means
/// within about a year.
pub fn detect_sequential_bottleneck(
    upgraded: ComponentKind,
    new_score: u32,
    cpu_score: u32,
    gpu_score: u32,
    analyses: &[GameAnalysis],
) -> Option<SequentialBottleneck> {
    let (next_component, new_cpu, new_gpu) = match upgraded {
        ComponentKind::Cpu => (BottleneckComponent::Gpu, new_score, gpu_score),
        ComponentKind::Gpu => (BottleneckComponent::Cpu, cpu_score, new_score),
        _ => return None,
    };
    if analyses.is_empty() {
        return None;
    }

    let affected_games = analyses
        .iter()
        .filter(|a| {
            let before = calculate_bottleneck(cpu_score, gpu_score, a.weights());
            let after = calculate_bottleneck(new_cpu, new_gpu, a.weights());
            after.limits(next_component, SEQUENTIAL_SEVERITY)
                && !before.limits(next_component, SEQUENTIAL_SEVERITY)
        })
        .count();

    let ratio = affected_games as f64 / analyses.len() as f64;
    let timeframe = if ratio >= SEQUENTIAL_SOON_RATIO {
        "~6 months"
    } else if ratio >= SEQUENTIAL_LATER_RATIO {
        "~1 year"
    } else {
        return None;
    };

    Some(SequentialBottleneck {
        next_component,
        affected_games,
        total_games: analyses.len(),
        timeframe,
    })
}

fn plan_follow_up(
    store: &SharedStore,
    config: &EngineConfig,
    request: &UpgradeRequest<'_>,
    sequential: &SequentialBottleneck,
    first_step_cost: f64,
) -> OperationResult<PathWarning> {
    let (kind, current) = match sequential.next_component {
        BottleneckComponent::Cpu => (ComponentKind::Cpu, request.cpu),
        _ => (ComponentKind::Gpu, request.gpu),
    };
    let target = (f64::from(current.score) * FOLLOW_UP_SCORE_FACTOR).round() as u32;

    let mut result = OperationResult::new(());
    let next = result.absorb(find_next_tier(store, config, kind, target));

    let mut message = format!(
        "This upgrade will likely make your {} the bottleneck in {} of {} games within {}.",
        kind.label(),
        sequential.affected_games,
        sequential.total_games,
        sequential.timeframe
    );
    if let Some(next) = &next {
        message.push_str(&format!(
            " Plan for a {} (~${:.0}) next, about ${:.0} across both steps.",
            next.component.display_name(),
            next.seed_price,
            first_step_cost + next.seed_price
        ));
    }

    result.map(|_| PathWarning {
        next_component: sequential.next_component,
        affected_games: sequential.affected_games,
        timeframe: sequential.timeframe,
        follow_up_component: next.as_ref().map(|n| n.component.display_name()),
        follow_up_cost: next.as_ref().map(|n| n.seed_price),
        total_two_step_cost: next.as_ref().map(|n| first_step_cost + n.seed_price),
        message,
    })
}

/// Next memory size that covers every selected game, if affordable
fn recommend_ram(request: &UpgradeRequest<'_>) -> OperationResult<Option<UpgradeRecommendation>> {
    let mut result = OperationResult::new(None);

    let short: Vec<&GameAnalysis> = request.analyses.iter().filter(|a| a.ram_deficit_gb > 0).collect();
    if short.is_empty() {
        return result;
    }

    let current_gb = request.ram.capacity_gb;
    let required_gb = short.iter().map(|a| a.game.ram_requirement_gb).max().unwrap_or(current_gb);
    let max_deficit = short.iter().map(|a| a.ram_deficit_gb).max().unwrap_or(0);

    let target = RAM_UPGRADE_STEPS
        .iter()
        .find(|(size, _)| *size > current_gb && *size >= required_gb)
        .or_else(|| RAM_UPGRADE_STEPS.iter().rev().find(|(size, _)| *size > current_gb));
    let Some(&(target_gb, cost)) = target else {
        return result;
    };

    if cost > request.budget {
        result.warn(format!(
            "Upgrading to {}GB of RAM (~${:.0}) exceeds your ${:.0} budget",
            target_gb, cost, request.budget
        ));
        return result;
    }

    let bottleneck = f64::from(max_deficit) / f64::from(required_gb) * 100.0;
    let gain = (f64::from(target_gb) - f64::from(current_gb)) / f64::from(current_gb) * 100.0;
    let priority = priority_score(bottleneck, request.urgency_of(ComponentKind::Ram), gain, Some(cost));

    let generation = request.ram.generation.to_uppercase();
    let mut rec = UpgradeRecommendation::new(
        ComponentKind::Ram,
        format!("{}GB {}", current_gb, generation),
        format!("{}GB {} kit", target_gb, generation),
    )
    .with_priority(priority);
    rec.price = Some(cost);
    rec.estimated_performance_gain = round1(gain);
    rec.affected_games = short.iter().map(|a| a.game.name.clone()).collect();
    rec.reason = format!(
        "{} of your games want more than {}GB of RAM (up to {}GB). Moving to {}GB removes stutter from swapping.",
        short.len(),
        current_gb,
        required_gb,
        target_gb
    );

    result.data = Some(rec);
    result
}

fn recommend_storage(request: &UpgradeRequest<'_>) -> OperationResult<Option<UpgradeRecommendation>> {
    let mut result = OperationResult::new(None);
    if request.storage != StorageType::Hdd {
        return result;
    }

    if NVME_UPGRADE_COST > request.budget {
        result.warn(format!(
            "An NVMe SSD (~${:.0}) does not fit your ${:.0} budget",
            NVME_UPGRADE_COST, request.budget
        ));
        return result;
    }

    let current = storage_score(request.storage);
    let target = storage_score(StorageType::Nvme);
    let bottleneck = f64::from(target - current);
    let gain = f64::from(target - current) / f64::from(current) * 100.0;
    let priority = priority_score(
        bottleneck,
        request.urgency_of(ComponentKind::Storage),
        gain,
        Some(NVME_UPGRADE_COST),
    );

    let mut rec = UpgradeRecommendation::new(
        ComponentKind::Storage,
        "Hard drive".to_string(),
        "1TB NVMe SSD".to_string(),
    )
    .with_priority(priority);
    rec.price = Some(NVME_UPGRADE_COST);
    rec.estimated_performance_gain = round1(gain);
    rec.affected_games = request.analyses.iter().map(|a| a.game.name.clone()).collect();
    rec.reason = "Games installed on a hard drive load several times slower and stream textures late. An NVMe SSD fixes both.".to_string();

    result.data = Some(rec);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze_game_performance;
    use crate::fixtures::{failing_store, game, installed, priced_store};

    fn analyses_for(cpu: u32, gpu: u32, games: &[crate::models::Game], ram_gb: u32) -> Vec<GameAnalysis> {
        games
            .iter()
            .map(|g| analyze_game_performance(cpu, gpu, ram_gb, g))
            .collect()
    }

    struct Fixture {
        cpu: InstalledPart,
        gpu: InstalledPart,
        ram: RamConfig,
        analyses: Vec<GameAnalysis>,
        ages: Vec<ComponentAge>,
    }

    impl Fixture {
        fn new(cpu_score: u32, gpu_score: u32, ram_gb: u32, games: &[crate::models::Game]) -> Self {
            Self {
                cpu: installed(ComponentKind::Cpu, "my-cpu", cpu_score),
                gpu: installed(ComponentKind::Gpu, "my-gpu", gpu_score),
                ram: RamConfig {
                    generation: "ddr4".to_string(),
                    capacity_gb: ram_gb,
                },
                analyses: analyses_for(cpu_score, gpu_score, games, ram_gb),
                ages: Vec::new(),
            }
        }

        fn request(&self, storage: StorageType, budget: f64) -> UpgradeRequest<'_> {
            UpgradeRequest {
                cpu: &self.cpu,
                gpu: &self.gpu,
                ram: &self.ram,
                storage,
                analyses: &self.analyses,
                budget,
                ages: &self.ages,
                resolution: Resolution::P1440,
            }
        }
    }

    #[test]
    fn test_priority_formula() {
        // 50*0.4 + 100*0.2 + min(50/200*100, 100)*0.4 = 20 + 20 + 10
        assert_eq!(priority_score(50.0, Urgency::High, 50.0, Some(200.0)), 50);
        assert_eq!(priority_score(150.0, Urgency::Low, 500.0, Some(100.0)), 84);
        assert_eq!(priority_score(0.0, Urgency::Medium, 100.0, None), 10);
    }

    #[test]
    fn test_priority_labels() {
        assert_eq!(priority_label(70), PriorityLabel::High);
        assert_eq!(priority_label(69), PriorityLabel::Medium);
        assert_eq!(priority_label(40), PriorityLabel::Medium);
        assert_eq!(priority_label(39), PriorityLabel::Low);
    }

    #[test]
    fn test_gpu_bottleneck_recommends_best_affordable_gpu() {
        let games = vec![game("a", 1.0, 1.0, 16), game("b", 1.0, 1.0, 16)];
        let fx = Fixture::new(36_000, 8_000, 16, &games);
        let store = priced_store();

        let result =
            generate_upgrade_recommendations(&store, &EngineConfig::default(), &fx.request(StorageType::Nvme, 600.0));
        assert!(result.partial_failures.is_empty());

        let rec = &result.data[0];
        assert_eq!(rec.component_type, ComponentKind::Gpu);
        assert_eq!(rec.recommended_id.as_deref(), Some("gpu-26k"));
        assert_eq!(rec.price, Some(550.0));
        assert_eq!(rec.estimated_performance_gain, 225.0);
        assert_eq!(rec.affected_games.len(), 2);
        assert_eq!(rec.alternatives.len(), 2);
        assert_eq!(rec.value_curve.len(), 3);
        assert!(rec.per_game_impact.iter().all(|i| i.estimated_fps > i.current_fps));
        // No CPU recommendation: the CPU is not limiting anything and is not old
        assert!(result.data.iter().all(|r| r.component_type != ComponentKind::Cpu));
    }

    #[test]
    fn test_sweet_spot_is_best_value() {
        let options = vec![
            CandidateOption {
                component_id: "a".into(),
                name: "A".into(),
                benchmark_score: 3,
                price: 500.0,
                performance_gain: 100.0,
                value_score: 0.2,
            },
            CandidateOption {
                component_id: "b".into(),
                name: "B".into(),
                benchmark_score: 2,
                price: 100.0,
                performance_gain: 50.0,
                value_score: 0.5,
            },
        ];
        assert_eq!(sweet_spot_index(&options), Some(1));
        assert_eq!(sweet_spot_index(&[]), None);
    }

    #[test]
    fn test_age_only_priority_is_capped() {
        let games = vec![game("a", 1.0, 1.0, 16)];
        let mut fx = Fixture::new(30_000, 20_000, 16, &games);
        fx.ages = vec![ComponentAge::new(ComponentKind::Cpu, 7)];
        let store = priced_store();

        let result =
            generate_upgrade_recommendations(&store, &EngineConfig::default(), &fx.request(StorageType::Nvme, 1_000.0));
        let rec = result
            .data
            .iter()
            .find(|r| r.component_type == ComponentKind::Cpu)
            .unwrap();
        assert!(rec.priority_score <= 50);
        assert!(rec.affected_games.is_empty());
        assert!(rec.reason.contains("7 years old"));
    }

    #[test]
    fn test_aged_part_without_candidates_falls_back() {
        let games = vec![game("a", 1.0, 1.0, 16)];
        let mut fx = Fixture::new(30_000, 20_000, 16, &games);
        fx.ages = vec![ComponentAge::new(ComponentKind::Gpu, 6)];

        let result = generate_upgrade_recommendations(
            &failing_store(),
            &EngineConfig::default(),
            &fx.request(StorageType::Nvme, 1_000.0),
        );
        let rec = &result.data[0];
        assert!(rec.is_fallback);
        assert_eq!(rec.recommended_component, "Browse modern GPUs");
        assert_eq!(rec.estimated_performance_gain, 100.0);
        assert!(rec.reason.contains("40000"));
        assert!(rec.priority_score <= 50);
        assert!(!result.partial_failures.is_empty());
    }

    #[test]
    fn test_no_candidates_in_budget_warns() {
        let games = vec![game("a", 1.0, 1.0, 16)];
        let fx = Fixture::new(36_000, 8_000, 16, &games);
        let store = priced_store();

        let result =
            generate_upgrade_recommendations(&store, &EngineConfig::default(), &fx.request(StorageType::Nvme, 50.0));
        assert!(result.data.is_empty());
        assert!(result.warnings.iter().any(|w| w.contains("No GPU upgrades")));
    }

    #[test]
    fn test_sequential_bottleneck_detection() {
        // Balanced mid-range build; a big GPU jump leaves the CPU behind everywhere
        let games = vec![game("a", 1.0, 1.0, 16), game("b", 1.0, 1.0, 16)];
        let analyses = analyses_for(24_000, 16_000, &games, 16);

        let seq = detect_sequential_bottleneck(ComponentKind::Gpu, 35_000, 24_000, 16_000, &analyses).unwrap();
        assert_eq!(seq.next_component, BottleneckComponent::Cpu);
        assert_eq!(seq.affected_games, 2);
        assert_eq!(seq.timeframe, "~6 months");

        // A small step keeps things in range
        assert!(detect_sequential_bottleneck(ComponentKind::Gpu, 18_000, 24_000, 16_000, &analyses).is_none());
        assert!(detect_sequential_bottleneck(ComponentKind::Ram, 1, 24_000, 16_000, &analyses).is_none());
    }

    #[test]
    fn test_sequential_bottleneck_one_year_window() {
        // Only the GPU-light game tips over
        let games = vec![
            game("light", 1.0, 0.7, 16),
            game("mid", 1.0, 1.0, 16),
            game("heavy", 1.0, 1.5, 16),
        ];
        let analyses = analyses_for(30_000, 16_000, &games, 16);
        let seq = detect_sequential_bottleneck(ComponentKind::Cpu, 42_000, 30_000, 16_000, &analyses).unwrap();
        assert_eq!(seq.next_component, BottleneckComponent::Gpu);
        assert_eq!(seq.affected_games, 1);
        assert_eq!(seq.timeframe, "~1 year");
    }

    #[test]
    fn test_path_warning_includes_follow_up() {
        let games = vec![game("a", 1.0, 1.0, 16), game("b", 1.0, 1.0, 16)];
        let fx = Fixture::new(12_000, 14_000, 16, &games);
        let store = priced_store();

        let result =
            generate_upgrade_recommendations(&store, &EngineConfig::default(), &fx.request(StorageType::Nvme, 500.0));
        let cpu = result
            .data
            .iter()
            .find(|r| r.component_type == ComponentKind::Cpu)
            .unwrap();
        assert_eq!(cpu.recommended_id.as_deref(), Some("cpu-48k"));

        let warning = cpu.path_warning.as_ref().unwrap();
        assert_eq!(warning.next_component, BottleneckComponent::Gpu);
        // 1.25 x 14000 = 17500 -> cheapest GPU at or above is gpu-18k
        assert_eq!(warning.follow_up_cost, Some(280.0));
        assert_eq!(warning.total_two_step_cost, Some(730.0));
    }

    #[test]
    fn test_ram_recommendation() {
        let games = vec![game("sim", 1.0, 1.0, 32), game("shooter", 1.0, 1.0, 16)];
        let fx = Fixture::new(30_000, 20_000, 16, &games);

        let result = recommend_ram(&fx.request(StorageType::Nvme, 500.0));
        let rec = result.data.unwrap();
        assert_eq!(rec.recommended_component, "32GB DDR4 kit");
        assert_eq!(rec.price, Some(100.0));
        assert_eq!(rec.affected_games, vec!["sim".to_string()]);
        // 50*0.4 + 20*0.2 + 100*0.4
        assert_eq!(rec.priority_score, 64);

        let result = recommend_ram(&fx.request(StorageType::Nvme, 60.0));
        assert!(result.data.is_none());
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_ram_not_needed() {
        let games = vec![game("a", 1.0, 1.0, 16)];
        let fx = Fixture::new(30_000, 20_000, 32, &games);
        assert!(recommend_ram(&fx.request(StorageType::Nvme, 500.0)).data.is_none());
    }

    #[test]
    fn test_storage_recommendation_only_for_hdd() {
        let games = vec![game("a", 1.0, 1.0, 16)];
        let fx = Fixture::new(30_000, 20_000, 16, &games);

        let rec = recommend_storage(&fx.request(StorageType::Hdd, 100.0)).data.unwrap();
        assert_eq!(rec.price, Some(80.0));
        assert_eq!(rec.priority_score, 76);
        assert_eq!(rec.priority_label, PriorityLabel::High);

        assert!(recommend_storage(&fx.request(StorageType::SataSsd, 100.0)).data.is_none());
        assert!(recommend_storage(&fx.request(StorageType::Hdd, 79.0)).data.is_none());
    }

    #[test]
    fn test_recommendations_sorted_by_priority() {
        let games = vec![game("a", 1.0, 1.0, 32)];
        let fx = Fixture::new(36_000, 8_000, 16, &games);
        let store = priced_store();

        let result =
            generate_upgrade_recommendations(&store, &EngineConfig::default(), &fx.request(StorageType::Hdd, 600.0));
        assert!(result.data.len() >= 3);
        assert!(result
            .data
            .windows(2)
            .all(|w| w[0].priority_score >= w[1].priority_score));
    }
}
