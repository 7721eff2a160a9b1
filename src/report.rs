//! Human-readable rendering of an analysis report

use std::fmt;

use crate::engine::AnalysisReport;
use crate::optimizer::ComboRecommendation;
use crate::recommendations::UpgradeRecommendation;

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Build Analysis ===")?;
        writeln!(f, "CPU: {} (score {})", self.cpu.name, self.cpu.score)?;
        writeln!(f, "GPU: {} (score {})", self.gpu.name, self.gpu.score)?;
        writeln!(
            f,
            "RAM: {}GB {}   Storage: {}   PSU: {}W",
            self.build.ram.capacity_gb,
            self.build.ram.generation.to_uppercase(),
            self.build.storage,
            self.build.psu_watts
        )?;
        writeln!(f, "Resolution: {}   Budget: ${:.0}", self.build.resolution, self.build.budget)?;
        writeln!(f)?;

        writeln!(f, "Build score: {}/100", self.build_score)?;
        if self.overall.component.opposite().is_some() {
            writeln!(
                f,
                "Overall: {} bottleneck, {}% on average",
                self.overall.component, self.overall.average_percentage
            )?;
        } else {
            writeln!(f, "Overall: balanced")?;
        }
        writeln!(f)?;

        if !self.game_analyses.is_empty() {
            writeln!(f, "Games:")?;
            for analysis in &self.game_analyses {
                writeln!(f, "  {}", analysis.recommendation)?;
            }
            writeln!(f)?;
        }

        if !self.ages.is_empty() {
            writeln!(f, "Component age:")?;
            for age in &self.ages {
                writeln!(
                    f,
                    "  {}: {} of {} years ({} urgency)",
                    age.kind.label(),
                    age.age_years,
                    age.lifespan_years,
                    age.urgency
                )?;
            }
            writeln!(f)?;
        }

        writeln!(f, "Storage: {}", self.storage.advice)?;
        if self.psu.sufficient {
            writeln!(
                f,
                "PSU: ~{}W estimated draw, {}% headroom",
                self.psu.estimated_draw, self.psu.headroom_percent
            )?;
        } else {
            writeln!(
                f,
                "PSU: ~{}W estimated draw exceeds the {}W safe load",
                self.psu.estimated_draw, self.psu.max_safe_load
            )?;
            if let Some(watts) = self.psu.recommended_wattage {
                writeln!(f, "  Recommended: {}W or more", watts)?;
            }
        }
        writeln!(f)?;

        if !self.recommendations.is_empty() {
            writeln!(f, "Recommended upgrades:")?;
            for (i, rec) in self.recommendations.iter().enumerate() {
                write_recommendation(f, i + 1, rec)?;
            }
            writeln!(f)?;
        }

        if !self.combos.is_empty() {
            writeln!(f, "Combined CPU + GPU upgrades:")?;
            for (i, combo) in self.combos.iter().enumerate() {
                write_combo(f, i + 1, combo)?;
            }
            writeln!(f)?;
        }

        if !self.warnings.is_empty() {
            writeln!(f, "Warnings:")?;
            for warning in &self.warnings {
                writeln!(f, "  - {}", warning)?;
            }
            writeln!(f)?;
        }

        write!(f, "Data quality: {}", self.data_quality)?;
        if !self.partial_failures.is_empty() {
            write!(f, " ({} failed lookups)", self.partial_failures.len())?;
        }
        writeln!(f)
    }
}

fn write_recommendation(f: &mut fmt::Formatter<'_>, n: usize, rec: &UpgradeRecommendation) -> fmt::Result {
    write!(
        f,
        "  {}. [{} {}] {}: {} -> {}",
        n,
        rec.priority_label,
        rec.priority_score,
        rec.component_type.label(),
        rec.current_component,
        rec.recommended_component
    )?;
    match rec.price {
        Some(price) => writeln!(f, " (${:.0}, +{:.0}%)", price, rec.estimated_performance_gain)?,
        None => writeln!(f, " (+{:.0}%)", rec.estimated_performance_gain)?,
    }
    writeln!(f, "     {}", rec.reason)?;

    if rec.value_curve.len() > 1 {
        for (i, option) in rec.value_curve.iter().enumerate() {
            let marker = if Some(i) == rec.sweet_spot_index { " <- best value" } else { "" };
            writeln!(
                f,
                "       {:<28} ${:>7.0}  +{:>5.0}%{}",
                option.name, option.price, option.performance_gain, marker
            )?;
        }
    }

    for impact in &rec.per_game_impact {
        writeln!(
            f,
            "       {}: ~{} -> ~{} fps",
            impact.game_name, impact.current_fps, impact.estimated_fps
        )?;
    }

    if let Some(warning) = &rec.path_warning {
        writeln!(f, "     Note: {}", warning.message)?;
    }
    Ok(())
}

fn write_combo(f: &mut fmt::Formatter<'_>, n: usize, combo: &ComboRecommendation) -> fmt::Result {
    writeln!(
        f,
        "  {}. {} + {} for ${:.0} (+{:.0}% average fps)",
        n, combo.components.cpu.name, combo.components.gpu.name, combo.total_cost, combo.total_performance_gain
    )?;
    writeln!(f, "     {}", combo.reason_for_combo)
}
