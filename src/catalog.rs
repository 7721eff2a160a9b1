//! Catalog import from JSON files
//!
//! A catalog directory holds any number of `*.json` files, each with optional
//! `components`, `games` and `prices` arrays. Every component's specs are
//! validated against its type before insertion; invalid entries are skipped
//! and the rest of the file still imports.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rusqlite::Connection;
use serde::Deserialize;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::constants::{MAX_WEIGHT, MIN_WEIGHT};
use crate::db;
use crate::error::{CatalogError, StoreError};
use crate::models::{
    Component, ComponentKind, ComponentSpecs, Game, GameWeights, PriceOffer, RecommendedSpecs,
};

#[derive(Debug, Default, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub components: Vec<CatalogComponent>,
    #[serde(default)]
    pub games: Vec<CatalogGame>,
    #[serde(default)]
    pub prices: Vec<PriceOffer>,
}

#[derive(Debug, Deserialize)]
pub struct CatalogComponent {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ComponentKind,
    pub brand: String,
    pub model: String,
    #[serde(default)]
    pub release_year: Option<i32>,
    pub benchmark_score: u32,
    #[serde(default)]
    pub specs: serde_json::Value,
}

impl CatalogComponent {
    pub fn into_component(self) -> Result<Component, CatalogError> {
        let specs = ComponentSpecs::parse(self.kind, self.specs).map_err(|e| CatalogError::InvalidComponent {
            id: self.id.clone(),
            kind: self.kind,
            reason: e.to_string(),
        })?;

        Ok(Component {
            id: self.id,
            kind: self.kind,
            brand: self.brand,
            model: self.model,
            release_year: self.release_year,
            benchmark_score: self.benchmark_score,
            specs,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct CatalogGame {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub steam_id: Option<u32>,
    #[serde(default)]
    pub cpu_weight: Option<f64>,
    #[serde(default)]
    pub gpu_weight: Option<f64>,
    #[serde(alias = "ram_requirement")]
    pub ram_requirement_gb: u32,
    #[serde(default)]
    pub recommended_specs: Option<RecommendedSpecs>,
}

impl CatalogGame {
    /// Weights must both be present and inside [0.5, 1.5], or both absent
    pub fn into_game(self) -> Result<Game, CatalogError> {
        let in_range = |w: f64| (MIN_WEIGHT..=MAX_WEIGHT).contains(&w);
        let weights = match (self.cpu_weight, self.gpu_weight) {
            (None, None) => None,
            (Some(cpu), Some(gpu)) if in_range(cpu) && in_range(gpu) => Some(GameWeights { cpu, gpu }),
            _ => return Err(CatalogError::InvalidWeights(self.id)),
        };

        Ok(Game {
            id: self.id,
            name: self.name,
            steam_id: self.steam_id,
            weights,
            ram_requirement_gb: self.ram_requirement_gb,
            recommended_specs: self.recommended_specs,
        })
    }
}

/// Find all catalog files under `dir`, in a stable order
pub fn find_catalog_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();
    files
}

pub fn parse_catalog_file(path: &Path) -> Result<CatalogFile, CatalogError> {
    let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| CatalogError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Insert one parsed file in a single transaction
fn import_file(conn: &Connection, file: CatalogFile, stats: &mut ImportStats) -> Result<(), CatalogError> {
    let tx = conn.unchecked_transaction().map_err(StoreError::from)?;

    for entry in file.components {
        match entry.into_component() {
            Ok(component) => {
                db::upsert_component(&tx, &component)?;
                stats.components += 1;
            }
            Err(e) => {
                warn!(error = %e, "skipping component");
                stats.skipped += 1;
            }
        }
    }

    for entry in file.games {
        match entry.into_game() {
            Ok(game) => {
                db::upsert_game(&tx, &game)?;
                stats.games += 1;
            }
            Err(e) => {
                warn!(error = %e, "skipping game");
                stats.skipped += 1;
            }
        }
    }

    for offer in file.prices {
        if !offer.price.is_finite() || offer.price < 0.0 {
            warn!(component = %offer.component_id, price = offer.price, "skipping price");
            stats.skipped += 1;
            continue;
        }
        db::insert_price(&tx, &offer)?;
        stats.prices += 1;
    }

    tx.commit().map_err(StoreError::from)?;
    Ok(())
}

/// Import every catalog file under `dir`
///
/// Files that fail to read or parse are counted as errors and skipped.
pub fn import_catalog(conn: &Connection, dir: &Path) -> Result<ImportStats> {
    if !dir.is_dir() {
        anyhow::bail!("{} is not a directory", dir.display());
    }

    let mut stats = ImportStats::default();
    let files = find_catalog_files(dir);
    info!(dir = %dir.display(), files = files.len(), "importing catalog");

    for path in &files {
        let file = match parse_catalog_file(path) {
            Ok(file) => file,
            Err(e) => {
                warn!(error = %e, "skipping catalog file");
                stats.errors += 1;
                continue;
            }
        };
        debug!(
            path = %path.display(),
            components = file.components.len(),
            games = file.games.len(),
            prices = file.prices.len(),
            "parsed catalog file"
        );
        import_file(conn, file, &mut stats).with_context(|| format!("Failed to import {}", path.display()))?;
    }

    Ok(stats)
}

#[derive(Debug, Default, PartialEq)]
pub struct ImportStats {
    pub components: usize,
    pub games: usize,
    pub prices: usize,
    pub skipped: usize,
    pub errors: usize,
}

impl std::fmt::Display for ImportStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Imported {} components, {} games, {} prices. Skipped: {}, Errors: {}",
            self.components, self.games, self.prices, self.skipped, self.errors
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::SqliteStore;
    use crate::store::ComponentStore;

    const PARTS: &str = r#"{
        "components": [
            {"id": "r5-5600", "type": "cpu", "brand": "AMD", "model": "Ryzen 5 5600",
             "release_year": 2022, "benchmark_score": 21500,
             "specs": {"cores": 6, "threads": 12, "socket": "AM4"}},
            {"id": "rtx-3060", "type": "gpu", "brand": "NVIDIA", "model": "GeForce RTX 3060",
             "release_year": 2021, "benchmark_score": 17000,
             "specs": {"vram_gb": 12}},
            {"id": "broken", "type": "gpu", "brand": "X", "model": "Y",
             "benchmark_score": 100, "specs": {"cores": 4}}
        ],
        "prices": [
            {"component_id": "r5-5600", "retailer": "shop-a", "price": 129.99},
            {"component_id": "rtx-3060", "retailer": "shop-b", "price": 289.0, "in_stock": false}
        ]
    }"#;

    const GAMES: &str = r#"{
        "games": [
            {"id": "cs2", "name": "Counter-Strike 2", "cpu_weight": 1.4, "gpu_weight": 0.7,
             "ram_requirement": 8},
            {"id": "new-game", "name": "New Game", "ram_requirement_gb": 16,
             "recommended_specs": {"rec_cpu": "Ryzen 5 5600", "rec_gpu": "RTX 3060"}},
            {"id": "bad", "name": "Bad", "cpu_weight": 3.0, "gpu_weight": 1.0, "ram_requirement": 8}
        ]
    }"#;

    #[test]
    fn test_import_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("parts.json"), PARTS).unwrap();
        fs::create_dir(dir.path().join("games")).unwrap();
        fs::write(dir.path().join("games").join("games.json"), GAMES).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        fs::write(dir.path().join("junk.json"), "{ not json").unwrap();

        let store = SqliteStore::open_in_memory().unwrap();
        let stats = import_catalog(&store.connection().unwrap(), dir.path()).unwrap();

        assert_eq!(
            stats,
            ImportStats {
                components: 2,
                games: 2,
                prices: 2,
                skipped: 2,
                errors: 1,
            }
        );

        let cpu = store.get_component(ComponentKind::Cpu, "r5-5600").unwrap();
        assert_eq!(cpu.benchmark_score, 21_500);
        assert!(store.get_component(ComponentKind::Gpu, "broken").is_err());

        let games = store
            .games_by_ids(&["cs2".to_string(), "new-game".to_string()])
            .unwrap();
        assert_eq!(games[0].weights, Some(GameWeights { cpu: 1.4, gpu: 0.7 }));
        assert_eq!(games[1].weights, None);
        assert!(games[1].recommended_specs.is_some());
    }

    #[test]
    fn test_find_catalog_files_is_sorted() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.json"), "{}").unwrap();
        fs::write(dir.path().join("a.json"), "{}").unwrap();
        let files = find_catalog_files(dir.path());
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.json", "b.json"]);
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let store = SqliteStore::open_in_memory().unwrap();
        let missing = Path::new("/definitely/not/here");
        assert!(import_catalog(&store.connection().unwrap(), missing).is_err());
    }

    #[test]
    fn test_half_weighted_game_rejected() {
        let game = CatalogGame {
            id: "half".to_string(),
            name: "Half".to_string(),
            steam_id: None,
            cpu_weight: Some(1.0),
            gpu_weight: None,
            ram_requirement_gb: 8,
            recommended_specs: None,
        };
        assert!(matches!(game.into_game(), Err(CatalogError::InvalidWeights(id)) if id == "half"));
    }

    #[test]
    fn test_stats_display() {
        let stats = ImportStats {
            components: 3,
            games: 1,
            prices: 4,
            skipped: 0,
            errors: 0,
        };
        assert_eq!(
            stats.to_string(),
            "Imported 3 components, 1 games, 4 prices. Skipped: 0, Errors: 0"
        );
    }
}
