//! Budget-constrained upgrade candidate search

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::config::EngineConfig;
use crate::models::{Component, ComponentKind};
use crate::store::{guarded, OperationResult, SharedStore};

/// A component that beats the current part, with its lowest in-stock price
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpgradeCandidate {
    pub component: Component,
    pub seed_price: f64,
}

impl UpgradeCandidate {
    /// Score improvement over `current_score` in percent
    ///
    /// Anything beats a missing part, so a zero baseline counts as 100%.
    pub fn performance_gain(&self, current_score: u32) -> f64 {
        performance_gain(current_score, self.component.benchmark_score)
    }
}

pub fn performance_gain(current_score: u32, new_score: u32) -> f64 {
    if current_score == 0 {
        return 100.0;
    }
    (f64::from(new_score) - f64::from(current_score)) / f64::from(current_score) * 100.0
}

/// Find the best affordable components of `kind` that outscore `current_score`
///
/// Returns at most `config.candidate_limit` candidates, best performer first.
/// Store failures are recorded on the result and yield fewer (or no) candidates.
pub fn find_upgrade_candidates(
    store: &SharedStore,
    config: &EngineConfig,
    kind: ComponentKind,
    current_score: u32,
    budget: f64,
) -> OperationResult<Vec<UpgradeCandidate>> {
    let mut result = OperationResult::new(Vec::new());

    let operation = format!("{} candidate query", kind.label());
    let query = Arc::clone(store);
    let Some(better) = guarded(&mut result, &operation, config.query_timeout, move || {
        query.components_above(kind, current_score)
    }) else {
        return result;
    };
    if better.is_empty() {
        return result;
    }

    let ids: Vec<String> = better.iter().map(|c| c.id.clone()).collect();
    let operation = format!("{} price lookup", kind.label());
    let query = Arc::clone(store);
    let Some(prices) = guarded(&mut result, &operation, config.query_timeout, move || {
        query.lowest_prices(&ids, true)
    }) else {
        return result;
    };

    let mut affordable: Vec<UpgradeCandidate> = better
        .into_iter()
        .filter_map(|component| {
            let price = *prices.get(&component.id)?;
            (price <= budget).then_some(UpgradeCandidate {
                component,
                seed_price: price,
            })
        })
        .collect();

    affordable.sort_by(|a, b| {
        b.component
            .benchmark_score
            .cmp(&a.component.benchmark_score)
            .then_with(|| a.seed_price.total_cmp(&b.seed_price))
    });
    affordable.truncate(config.candidate_limit);

    debug!(
        kind = kind.as_str(),
        current_score,
        budget,
        found = affordable.len(),
        "upgrade candidates"
    );
    result.data = affordable;
    result
}

/// Cheapest priced component of `kind` scoring at least `target_score`
///
/// Used to cost a follow-up upgrade, so no budget applies.
pub fn find_next_tier(
    store: &SharedStore,
    config: &EngineConfig,
    kind: ComponentKind,
    target_score: u32,
) -> OperationResult<Option<UpgradeCandidate>> {
    let mut result = OperationResult::new(None);

    let operation = format!("{} follow-up query", kind.label());
    let query = Arc::clone(store);
    let Some(options) = guarded(&mut result, &operation, config.query_timeout, move || {
        query.components_above(kind, target_score.saturating_sub(1))
    }) else {
        return result;
    };
    if options.is_empty() {
        return result;
    }

    let ids: Vec<String> = options.iter().map(|c| c.id.clone()).collect();
    let operation = format!("{} follow-up price lookup", kind.label());
    let query = Arc::clone(store);
    let Some(prices) = guarded(&mut result, &operation, config.query_timeout, move || {
        query.lowest_prices(&ids, true)
    }) else {
        return result;
    };

    result.data = options
        .into_iter()
        .filter_map(|component| {
            let price = *prices.get(&component.id)?;
            Some(UpgradeCandidate {
                component,
                seed_price: price,
            })
        })
        .min_by(|a, b| a.seed_price.total_cmp(&b.seed_price));
    result
}
