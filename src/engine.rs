//! End-to-end build analysis
//!
//! Fetches the user's parts and games, runs the per-game analysis, then asks
//! the recommendation generator and combo optimizer for upgrades. Store
//! failures along the way degrade the report instead of aborting it.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::analysis::{
    aggregate_game_analyses, analyze_game_performance, calculate_build_score, ComponentAge,
    GameAnalysis, OverallBottleneck,
};
use crate::bottleneck::{adjust_weights_for_resolution, derive_weights, BottleneckComponent};
use crate::config::EngineConfig;
use crate::hardware::{analyze_psu, analyze_storage, PsuAnalysis, StorageAnalysis};
use crate::matcher::ComponentMatcher;
use crate::models::{BuildData, Component, ComponentKind, Game, GameWeights, InstalledPart};
use crate::optimizer::{generate_combo_recommendations, ComboRecommendation};
use crate::recommendations::{generate_upgrade_recommendations, UpgradeRecommendation, UpgradeRequest};
use crate::store::{guarded, DataQuality, OperationResult, PartialFailure, SharedStore};

/// Everything produced by one analysis run
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub build: BuildData,
    pub cpu: InstalledPart,
    pub gpu: InstalledPart,
    pub game_analyses: Vec<GameAnalysis>,
    pub overall: OverallBottleneck,
    pub build_score: u32,
    pub ages: Vec<ComponentAge>,
    pub storage: StorageAnalysis,
    pub psu: PsuAnalysis,
    pub recommendations: Vec<UpgradeRecommendation>,
    pub combos: Vec<ComboRecommendation>,
    pub warnings: Vec<String>,
    pub partial_failures: Vec<PartialFailure>,
    pub data_quality: DataQuality,
}

pub fn analyze_build(store: &SharedStore, config: &EngineConfig, build: &BuildData) -> AnalysisReport {
    let mut result = OperationResult::new(());

    let cpu = fetch_part(store, config, &mut result, ComponentKind::Cpu, &build.cpu);
    let gpu = fetch_part(store, config, &mut result, ComponentKind::Gpu, &build.gpu);

    let games = fetch_games(store, config, &mut result, &build.games);
    let games = result.absorb(resolve_weights(store, config, games));

    let analyses: Vec<GameAnalysis> = games
        .into_iter()
        .map(|mut game| {
            let base = game.weights.unwrap_or(GameWeights::NEUTRAL);
            game.weights = Some(adjust_weights_for_resolution(base, build.resolution));
            analyze_game_performance(cpu.score, gpu.score, build.ram.capacity_gb, &game)
        })
        .collect();

    let overall = aggregate_game_analyses(&analyses);
    let ages = component_ages(config, &[&cpu, &gpu]);
    let build_score = calculate_build_score(&analyses, &ages);
    let storage = analyze_storage(build.storage);
    let psu = analyze_psu(build.psu_watts, cpu.score, gpu.score);

    let request = UpgradeRequest {
        cpu: &cpu,
        gpu: &gpu,
        ram: &build.ram,
        storage: build.storage,
        analyses: &analyses,
        budget: build.budget,
        ages: &ages,
        resolution: build.resolution,
    };
    let recommendations = result.absorb(generate_upgrade_recommendations(store, config, &request));
    let combos = result.absorb(generate_combo_recommendations(
        store,
        config,
        &cpu,
        &gpu,
        &analyses,
        build.budget,
        build.resolution,
    ));

    if recommendations.is_empty() && combos.is_empty() {
        if overall.component == BottleneckComponent::Balanced {
            result.warn("Your build is well balanced for the selected games; no upgrades are needed right now.");
        } else {
            result.warn(format!(
                "No upgrades found within your ${:.0} budget. Try raising the budget.",
                build.budget
            ));
        }
    }

    let data_quality = DataQuality::from_failures(result.partial_failures.len());
    info!(
        games = analyses.len(),
        overall = %overall.component,
        build_score,
        recommendations = recommendations.len(),
        combos = combos.len(),
        %data_quality,
        "analysis complete"
    );

    AnalysisReport {
        build: build.clone(),
        cpu,
        gpu,
        game_analyses: analyses,
        overall,
        build_score,
        ages,
        storage,
        psu,
        recommendations,
        combos,
        warnings: result.warnings,
        partial_failures: result.partial_failures,
        data_quality,
    }
}

fn fetch_part(
    store: &SharedStore,
    config: &EngineConfig,
    result: &mut OperationResult<()>,
    kind: ComponentKind,
    id: &str,
) -> InstalledPart {
    let operation = format!("{} lookup", kind.label());
    let query = Arc::clone(store);
    let owned_id = id.to_string();
    let component = guarded(result, &operation, config.query_timeout, move || {
        query.get_component(kind, &owned_id)
    });
    InstalledPart::from_lookup(kind, id, component)
}

fn fetch_games(
    store: &SharedStore,
    config: &EngineConfig,
    result: &mut OperationResult<()>,
    ids: &[String],
) -> Vec<Game> {
    if ids.is_empty() {
        return Vec::new();
    }

    let query = Arc::clone(store);
    let owned_ids = ids.to_vec();
    let Some(games) = guarded(result, "game lookup", config.query_timeout, move || {
        query.games_by_ids(&owned_ids)
    }) else {
        return Vec::new();
    };

    for id in ids {
        if !games.iter().any(|g| &g.id == id) {
            result.warn(format!("Game '{}' not found; skipped", id));
        }
    }
    games
}

/// Fill in weights for uncurated games from their recommended hardware
///
/// The recommended CPU and GPU names are matched against the catalog and
/// their benchmark scores turned into relative demand. Games that cannot be
/// matched keep neutral weights and produce a warning.
fn resolve_weights(store: &SharedStore, config: &EngineConfig, games: Vec<Game>) -> OperationResult<Vec<Game>> {
    let mut result = OperationResult::new(Vec::new());
    if games.iter().all(|g| g.weights.is_some()) {
        result.data = games;
        return result;
    }

    let matcher = match ComponentMatcher::new() {
        Ok(m) => Some(m),
        Err(e) => {
            result.warn(format!("Component matcher unavailable: {}", e));
            None
        }
    };
    let mut catalog: Option<(Vec<Component>, Vec<Component>)> = None;

    let mut resolved = Vec::with_capacity(games.len());
    for mut game in games {
        if game.weights.is_some() {
            resolved.push(game);
            continue;
        }

        let derived = match (&matcher, &game.recommended_specs) {
            (Some(matcher), Some(specs)) => {
                let (cpus, gpus) = &*catalog.get_or_insert_with(|| {
                    let query = Arc::clone(store);
                    let cpus = guarded(&mut result, "CPU catalog query", config.query_timeout, move || {
                        query.list_components(ComponentKind::Cpu)
                    });
                    let query = Arc::clone(store);
                    let gpus = guarded(&mut result, "GPU catalog query", config.query_timeout, move || {
                        query.list_components(ComponentKind::Gpu)
                    });
                    (cpus.unwrap_or_default(), gpus.unwrap_or_default())
                });

                let cpu_name = specs.rec_cpu.as_deref().or(specs.min_cpu.as_deref());
                let gpu_name = specs.rec_gpu.as_deref().or(specs.min_gpu.as_deref());
                let cpu_match = cpu_name.and_then(|name| matcher.best_match(name, cpus));
                let gpu_match = gpu_name.and_then(|name| matcher.best_match(name, gpus));

                match (cpu_match, gpu_match) {
                    (Some(c), Some(g)) => {
                        debug!(
                            game = %game.id,
                            cpu = %c.component.id,
                            gpu = %g.component.id,
                            "derived weights from recommended specs"
                        );
                        Some(derive_weights(c.component.benchmark_score, g.component.benchmark_score))
                    }
                    _ => None,
                }
            }
            _ => None,
        };

        if derived.is_none() {
            result.warn(format!(
                "No curated weights for {}; treating CPU and GPU as equally important",
                game.name
            ));
        }
        game.weights = Some(derived.unwrap_or(GameWeights::NEUTRAL));
        resolved.push(game);
    }

    result.data = resolved;
    result
}

fn component_ages(config: &EngineConfig, parts: &[&InstalledPart]) -> Vec<ComponentAge> {
    parts
        .iter()
        .filter_map(|part| {
            let year = part.release_year?;
            Some(ComponentAge::from_release_year(part.kind, year, config.current_year))
        })
        .collect()
}
