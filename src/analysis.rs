//! Per-game performance analysis, aggregation and build scoring

use std::fmt;

use serde::Serialize;

use crate::bottleneck::{calculate_bottleneck, Bottleneck, BottleneckComponent};
use crate::constants::{
    lifespan_years, AGE_HIGH_DEDUCTION, AGE_MEDIUM_DEDUCTION, BOTTLENECK_DEDUCTION_FACTOR,
    BOTTLENECK_THRESHOLD, BUILD_SCORE_EMPTY, BUILD_SCORE_START, MAX_BOTTLENECK_DEDUCTION,
    RAM_DEDUCTION, SIGNIFICANT_BOTTLENECK, URGENCY_HIGH_RATIO, URGENCY_MEDIUM_RATIO,
};
use crate::models::{ComponentKind, Game, GameWeights};

/// Result of checking one game against the current build
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameAnalysis {
    /// The game, carrying the effective (resolution-adjusted) weights
    pub game: Game,
    pub bottleneck: Bottleneck,
    pub ram_sufficient: bool,
    pub ram_deficit_gb: u32,
    pub recommendation: String,
}

impl GameAnalysis {
    pub fn weights(&self) -> GameWeights {
        self.game.weights.unwrap_or(GameWeights::NEUTRAL)
    }
}

pub fn analyze_game_performance(
    cpu_score: u32,
    gpu_score: u32,
    user_ram_gb: u32,
    game: &Game,
) -> GameAnalysis {
    let weights = game.weights.unwrap_or(GameWeights::NEUTRAL);
    let bottleneck = calculate_bottleneck(cpu_score, gpu_score, weights);

    let ram_sufficient = user_ram_gb >= game.ram_requirement_gb;
    let ram_deficit_gb = game.ram_requirement_gb.saturating_sub(user_ram_gb);

    let recommendation = describe(game, &bottleneck, user_ram_gb, ram_deficit_gb);

    GameAnalysis {
        game: game.clone(),
        bottleneck,
        ram_sufficient,
        ram_deficit_gb,
        recommendation,
    }
}

fn describe(game: &Game, bottleneck: &Bottleneck, user_ram_gb: u32, ram_deficit_gb: u32) -> String {
    let severity = if bottleneck.percentage > SIGNIFICANT_BOTTLENECK {
        "significant"
    } else {
        "moderate"
    };

    let mut text = match bottleneck.component {
        BottleneckComponent::Cpu => format!(
            "Your CPU shows a {} bottleneck ({}%) in {}. Expect stutter and frame drops in busy scenes; a faster processor would help most.",
            severity, bottleneck.percentage, game.name
        ),
        BottleneckComponent::Gpu => format!(
            "Your GPU shows a {} bottleneck ({}%) in {}. Lowering graphics settings helps; a stronger graphics card would help most.",
            severity, bottleneck.percentage, game.name
        ),
        BottleneckComponent::Balanced => {
            format!("Your CPU and GPU are well balanced for {}.", game.name)
        }
    };

    if ram_deficit_gb > 0 {
        text.push_str(&format!(
            " {} recommends {}GB of RAM; you have {}GB ({}GB short).",
            game.name, game.ram_requirement_gb, user_ram_gb, ram_deficit_gb
        ));
    }

    text
}

/// Overall bottleneck trend across all analyzed games
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OverallBottleneck {
    pub component: BottleneckComponent,
    pub average_percentage: u32,
}

/// Combine per-game results into a single trend
///
/// CPU and GPU severities are averaged only over the games that show that
/// bottleneck. The side bottlenecked in more games wins, ties go to the
/// higher average, and the winner must still exceed the threshold.
pub fn aggregate_game_analyses(analyses: &[GameAnalysis]) -> OverallBottleneck {
    let mut cpu = (0usize, 0u32);
    let mut gpu = (0usize, 0u32);

    for analysis in analyses {
        match analysis.bottleneck.component {
            BottleneckComponent::Cpu => {
                cpu.0 += 1;
                cpu.1 += analysis.bottleneck.percentage;
            }
            BottleneckComponent::Gpu => {
                gpu.0 += 1;
                gpu.1 += analysis.bottleneck.percentage;
            }
            BottleneckComponent::Balanced => {}
        }
    }

    let average = |(count, total): (usize, u32)| {
        if count == 0 {
            0.0
        } else {
            f64::from(total) / count as f64
        }
    };
    let cpu_avg = average(cpu);
    let gpu_avg = average(gpu);

    let (component, avg) = match cpu.0.cmp(&gpu.0) {
        std::cmp::Ordering::Greater => (BottleneckComponent::Cpu, cpu_avg),
        std::cmp::Ordering::Less => (BottleneckComponent::Gpu, gpu_avg),
        std::cmp::Ordering::Equal if cpu_avg >= gpu_avg => (BottleneckComponent::Cpu, cpu_avg),
        std::cmp::Ordering::Equal => (BottleneckComponent::Gpu, gpu_avg),
    };

    if avg > BOTTLENECK_THRESHOLD {
        OverallBottleneck {
            component,
            average_percentage: avg.round() as u32,
        }
    } else {
        OverallBottleneck {
            component: BottleneckComponent::Balanced,
            average_percentage: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Urgency {
    High,
    Medium,
    Low,
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Urgency::High => "high",
            Urgency::Medium => "medium",
            Urgency::Low => "low",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentAge {
    pub kind: ComponentKind,
    pub age_years: u32,
    pub lifespan_years: u32,
    pub urgency: Urgency,
}

impl ComponentAge {
    pub fn new(kind: ComponentKind, age_years: u32) -> Self {
        let lifespan = lifespan_years(kind);
        let ratio = f64::from(age_years) / f64::from(lifespan);
        let urgency = if ratio >= URGENCY_HIGH_RATIO {
            Urgency::High
        } else if ratio >= URGENCY_MEDIUM_RATIO {
            Urgency::Medium
        } else {
            Urgency::Low
        };

        Self {
            kind,
            age_years,
            lifespan_years: lifespan,
            urgency,
        }
    }

    /// Age from a release year; future release years count as new
    pub fn from_release_year(kind: ComponentKind, release_year: i32, current_year: i32) -> Self {
        let age = u32::try_from(current_year.saturating_sub(release_year)).unwrap_or(0);
        Self::new(kind, age)
    }

    pub fn past_lifespan(&self) -> bool {
        self.age_years > self.lifespan_years
    }
}

/// Overall 0–100 health score for the build
///
/// An empty game list scores 50, not 100: with nothing to measure against,
/// the build is reported as middling rather than perfect.
pub fn calculate_build_score(analyses: &[GameAnalysis], ages: &[ComponentAge]) -> u32 {
    if analyses.is_empty() {
        return BUILD_SCORE_EMPTY;
    }

    let mut score = BUILD_SCORE_START;

    for analysis in analyses {
        if !analysis.bottleneck.is_balanced() {
            let deduction = f64::from(analysis.bottleneck.percentage) * BOTTLENECK_DEDUCTION_FACTOR;
            score -= deduction.min(MAX_BOTTLENECK_DEDUCTION);
        }
        if !analysis.ram_sufficient {
            score -= RAM_DEDUCTION;
        }
    }

    for age in ages {
        score -= match age.urgency {
            Urgency::High => AGE_HIGH_DEDUCTION,
            Urgency::Medium => AGE_MEDIUM_DEDUCTION,
            Urgency::Low => 0.0,
        };
    }

    score.clamp(0.0, 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::game;
    use proptest::prelude::*;

    fn analysis_with(component: BottleneckComponent, percentage: u32, ram_ok: bool) -> GameAnalysis {
        GameAnalysis {
            game: game("g", 1.0, 1.0, 16),
            bottleneck: Bottleneck {
                component,
                percentage,
            },
            ram_sufficient: ram_ok,
            ram_deficit_gb: if ram_ok { 0 } else { 8 },
            recommendation: String::new(),
        }
    }

    #[test]
    fn test_ram_deficit_scenario() {
        let result = analyze_game_performance(30_000, 20_000, 16, &game("msfs", 1.0, 1.0, 32));
        assert!(!result.ram_sufficient);
        assert_eq!(result.ram_deficit_gb, 16);
        assert!(result.recommendation.contains("16GB short"));
    }

    #[test]
    fn test_recommendation_text() {
        let result = analyze_game_performance(40_000, 8_000, 32, &game("cp", 1.0, 1.0, 16));
        assert_eq!(result.bottleneck.component, BottleneckComponent::Gpu);
        assert!(result.recommendation.contains("significant"));
        assert!(result.ram_sufficient);

        let result = analyze_game_performance(40_000, 20_000, 32, &game("cp", 1.0, 1.0, 16));
        assert!(result.recommendation.contains("moderate"));

        let result = analyze_game_performance(30_000, 20_000, 32, &game("cp", 1.0, 1.0, 16));
        assert!(result.recommendation.contains("well balanced"));
    }

    #[test]
    fn test_zero_cpu_score_is_valid() {
        let result = analyze_game_performance(0, 20_000, 16, &game("x", 1.0, 1.0, 8));
        assert_eq!(result.bottleneck.component, BottleneckComponent::Cpu);
        assert_eq!(result.bottleneck.percentage, 50);
    }

    #[test]
    fn test_aggregate_empty() {
        let overall = aggregate_game_analyses(&[]);
        assert_eq!(overall.component, BottleneckComponent::Balanced);
        assert_eq!(overall.average_percentage, 0);
    }

    #[test]
    fn test_aggregate_majority_wins() {
        let analyses = vec![
            analysis_with(BottleneckComponent::Gpu, 20, true),
            analysis_with(BottleneckComponent::Gpu, 30, true),
            analysis_with(BottleneckComponent::Cpu, 80, true),
            analysis_with(BottleneckComponent::Balanced, 0, true),
        ];
        let overall = aggregate_game_analyses(&analyses);
        assert_eq!(overall.component, BottleneckComponent::Gpu);
        // Averaged over the GPU-bound games only
        assert_eq!(overall.average_percentage, 25);
    }

    #[test]
    fn test_aggregate_tie_uses_average() {
        let analyses = vec![
            analysis_with(BottleneckComponent::Gpu, 20, true),
            analysis_with(BottleneckComponent::Cpu, 40, true),
        ];
        let overall = aggregate_game_analyses(&analyses);
        assert_eq!(overall.component, BottleneckComponent::Cpu);
        assert_eq!(overall.average_percentage, 40);
    }

    #[test]
    fn test_aggregate_weak_majority_is_balanced() {
        let analyses = vec![
            analysis_with(BottleneckComponent::Gpu, 10, true),
            analysis_with(BottleneckComponent::Gpu, 10, true),
            analysis_with(BottleneckComponent::Balanced, 0, true),
        ];
        assert_eq!(
            aggregate_game_analyses(&analyses).component,
            BottleneckComponent::Balanced
        );
    }

    #[test]
    fn test_build_score_empty_is_50() {
        assert_eq!(calculate_build_score(&[], &[]), 50);
        let old_gpu = ComponentAge::new(ComponentKind::Gpu, 10);
        assert_eq!(calculate_build_score(&[], &[old_gpu]), 50);
    }

    #[test]
    fn test_build_score_deductions() {
        let analyses = vec![
            analysis_with(BottleneckComponent::Gpu, 20, true),  // -10
            analysis_with(BottleneckComponent::Cpu, 60, false), // -15, -5
            analysis_with(BottleneckComponent::Balanced, 0, true),
        ];
        let ages = vec![
            ComponentAge::new(ComponentKind::Cpu, 4), // 0.8 -> high, -10
            ComponentAge::new(ComponentKind::Gpu, 2), // 0.5 -> medium, -5
        ];
        assert_eq!(calculate_build_score(&analyses, &ages), 55);
    }

    #[test]
    fn test_build_score_clamped_at_zero() {
        let analyses: Vec<_> = (0..10)
            .map(|_| analysis_with(BottleneckComponent::Cpu, 90, false))
            .collect();
        assert_eq!(calculate_build_score(&analyses, &[]), 0);
    }

    #[test]
    fn test_component_age_urgency() {
        assert_eq!(ComponentAge::new(ComponentKind::Cpu, 1).urgency, Urgency::Low);
        assert_eq!(ComponentAge::new(ComponentKind::Cpu, 3).urgency, Urgency::Medium);
        assert_eq!(ComponentAge::new(ComponentKind::Gpu, 4).urgency, Urgency::High);

        let age = ComponentAge::from_release_year(ComponentKind::Gpu, 2019, 2026);
        assert_eq!(age.age_years, 7);
        assert!(age.past_lifespan());

        let future = ComponentAge::from_release_year(ComponentKind::Cpu, 2030, 2026);
        assert_eq!(future.age_years, 0);
        assert!(!future.past_lifespan());
    }

    #[test]
    fn test_absurd_release_years_do_not_overflow() {
        let ancient = ComponentAge::from_release_year(ComponentKind::Cpu, i32::MIN, 2026);
        assert_eq!(ancient.age_years, i32::MAX as u32);
        assert_eq!(ancient.urgency, Urgency::High);

        let distant = ComponentAge::from_release_year(ComponentKind::Gpu, i32::MAX, -5);
        assert_eq!(distant.age_years, 0);
    }

    proptest! {
        #[test]
        fn build_score_never_increases_with_severity(
            base in 0u32..=100,
            bump in 0u32..=100,
            others in proptest::collection::vec(0u32..=100, 0..5),
        ) {
            let make = |p: u32| analysis_with(BottleneckComponent::Gpu, p, true);
            let mut lower: Vec<_> = others.iter().map(|p| make(*p)).collect();
            let mut higher = lower.clone();
            lower.push(make(base));
            higher.push(make((base + bump).min(100)));

            let low_score = calculate_build_score(&lower, &[]);
            let high_score = calculate_build_score(&higher, &[]);
            prop_assert!(high_score <= low_score);
            prop_assert!(high_score <= 100);
        }
    }
}
