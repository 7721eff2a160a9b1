//! Shared builders for unit tests

use std::collections::HashMap;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::candidates::UpgradeCandidate;
use crate::db::{insert_price, upsert_component, upsert_game, SqliteStore};
use crate::error::StoreError;
use crate::models::{
    Component, ComponentKind, ComponentSpecs, CpuSpecs, Game, GameWeights, GpuSpecs, InstalledPart,
    PriceOffer, PsuSpecs, RamSpecs, StorageSpecs, StorageType,
};
use crate::store::{ComponentStore, SharedStore};

/// A game with raw (unclamped) weights, named after its id
pub fn game(id: &str, cpu_weight: f64, gpu_weight: f64, ram_gb: u32) -> Game {
    Game {
        id: id.to_string(),
        name: id.to_string(),
        steam_id: None,
        weights: Some(GameWeights {
            cpu: cpu_weight,
            gpu: gpu_weight,
        }),
        ram_requirement_gb: ram_gb,
        recommended_specs: None,
    }
}

fn specs_for(kind: ComponentKind) -> ComponentSpecs {
    match kind {
        ComponentKind::Cpu => ComponentSpecs::Cpu(CpuSpecs {
            cores: 8,
            threads: 16,
            boost_clock_ghz: None,
            tdp_watts: None,
            socket: None,
        }),
        ComponentKind::Gpu => ComponentSpecs::Gpu(GpuSpecs {
            vram_gb: 8,
            tdp_watts: None,
        }),
        ComponentKind::Ram => ComponentSpecs::Ram(RamSpecs {
            generation: "ddr4".to_string(),
            capacity_gb: 16,
            speed_mhz: None,
        }),
        ComponentKind::Storage => ComponentSpecs::Storage(StorageSpecs {
            interface: StorageType::Nvme,
            capacity_gb: 1000,
        }),
        ComponentKind::Psu => ComponentSpecs::Psu(PsuSpecs {
            wattage: 650,
            efficiency: None,
        }),
    }
}

fn part(id: &str, kind: ComponentKind, score: u32, year: i32) -> Component {
    Component {
        id: id.to_string(),
        kind,
        brand: "Acme".to_string(),
        model: id.to_uppercase(),
        release_year: Some(year),
        benchmark_score: score,
        specs: specs_for(kind),
    }
}

pub fn cpu(id: &str, score: u32, year: i32) -> Component {
    part(id, ComponentKind::Cpu, score, year)
}

pub fn gpu(id: &str, score: u32, year: i32) -> Component {
    part(id, ComponentKind::Gpu, score, year)
}

pub fn named(id: &str, kind: ComponentKind, brand: &str, model: &str) -> Component {
    Component {
        id: id.to_string(),
        kind,
        brand: brand.to_string(),
        model: model.to_string(),
        release_year: None,
        benchmark_score: 10_000,
        specs: specs_for(kind),
    }
}

pub fn offer(component_id: &str, price: f64, in_stock: bool) -> PriceOffer {
    PriceOffer {
        component_id: component_id.to_string(),
        retailer: "test-shop".to_string(),
        price,
        in_stock,
        url: None,
    }
}

pub fn installed(kind: ComponentKind, id: &str, score: u32) -> InstalledPart {
    InstalledPart {
        kind,
        id: id.to_string(),
        name: format!("My {}", kind.label()),
        score,
        release_year: None,
        found: true,
    }
}

pub fn candidate(component: Component, price: f64) -> UpgradeCandidate {
    UpgradeCandidate {
        component,
        seed_price: price,
    }
}

/// In-memory store with a small priced CPU and GPU ladder
///
/// gpu-35k is $900 in stock but also listed at $600 out of stock.
pub fn priced_store() -> SharedStore {
    priced_store_with(&[])
}

/// The priced ladder plus the given games
pub fn priced_store_with(games: &[Game]) -> SharedStore {
    let store = SqliteStore::open_in_memory().unwrap();
    let conn = store.connection().unwrap();

    let cpus = [
        ("cpu-12k", 12_000, 2017, 60.0),
        ("cpu-20k", 20_000, 2019, 120.0),
        ("cpu-28k", 28_000, 2021, 180.0),
        ("cpu-36k", 36_000, 2022, 260.0),
        ("cpu-48k", 48_000, 2023, 450.0),
    ];
    for (id, score, year, price) in cpus {
        upsert_component(&conn, &cpu(id, score, year)).unwrap();
        insert_price(&conn, &offer(id, price, true)).unwrap();
    }

    let gpus = [
        ("gpu-8k", 8_000, 2016, 90.0),
        ("gpu-14k", 14_000, 2019, 200.0),
        ("gpu-18k", 18_000, 2020, 280.0),
        ("gpu-22k", 22_000, 2021, 420.0),
        ("gpu-26k", 26_000, 2022, 550.0),
        ("gpu-35k", 35_000, 2023, 900.0),
    ];
    for (id, score, year, price) in gpus {
        upsert_component(&conn, &gpu(id, score, year)).unwrap();
        insert_price(&conn, &offer(id, price, true)).unwrap();
    }
    insert_price(&conn, &offer("gpu-35k", 600.0, false)).unwrap();

    for g in games {
        upsert_game(&conn, g).unwrap();
    }
    drop(conn);

    Arc::new(store)
}

pub fn failing_store() -> SharedStore {
    Arc::new(FailingStore)
}

pub fn hanging_store(delay: Duration) -> SharedStore {
    Arc::new(HangingStore { delay })
}

/// A store whose every call fails
pub struct FailingStore;

fn broken() -> StoreError {
    StoreError::Sqlite(rusqlite::Error::InvalidQuery)
}

impl ComponentStore for FailingStore {
    fn get_component(&self, _kind: ComponentKind, _id: &str) -> Result<Component, StoreError> {
        Err(broken())
    }

    fn components_above(&self, _kind: ComponentKind, _min_score: u32) -> Result<Vec<Component>, StoreError> {
        Err(broken())
    }

    fn list_components(&self, _kind: ComponentKind) -> Result<Vec<Component>, StoreError> {
        Err(broken())
    }

    fn lowest_prices(&self, _ids: &[String], _in_stock_only: bool) -> Result<HashMap<String, f64>, StoreError> {
        Err(broken())
    }

    fn games_by_ids(&self, _ids: &[String]) -> Result<Vec<Game>, StoreError> {
        Err(broken())
    }
}

/// A store that answers every call, but only after `delay`
pub struct HangingStore {
    delay: Duration,
}

impl ComponentStore for HangingStore {
    fn get_component(&self, kind: ComponentKind, id: &str) -> Result<Component, StoreError> {
        thread::sleep(self.delay);
        Err(StoreError::NotFound {
            kind,
            id: id.to_string(),
        })
    }

    fn components_above(&self, _kind: ComponentKind, _min_score: u32) -> Result<Vec<Component>, StoreError> {
        thread::sleep(self.delay);
        Ok(Vec::new())
    }

    fn list_components(&self, _kind: ComponentKind) -> Result<Vec<Component>, StoreError> {
        thread::sleep(self.delay);
        Ok(Vec::new())
    }

    fn lowest_prices(&self, _ids: &[String], _in_stock_only: bool) -> Result<HashMap<String, f64>, StoreError> {
        thread::sleep(self.delay);
        Ok(HashMap::new())
    }

    fn games_by_ids(&self, _ids: &[String]) -> Result<Vec<Game>, StoreError> {
        thread::sleep(self.delay);
        Ok(Vec::new())
    }
}
