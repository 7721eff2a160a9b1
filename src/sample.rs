//! Built-in sample catalog for trying the tool without a dataset

use rusqlite::Connection;
use tracing::info;

use crate::db;
use crate::error::StoreError;
use crate::models::{
    Component, ComponentKind, ComponentSpecs, CpuSpecs, Game, GameWeights, GpuSpecs, PriceOffer,
    PsuSpecs, RamSpecs, RecommendedSpecs, StorageSpecs, StorageType,
};

// id, brand, model, year, score, cores, threads, boost GHz, TDP, socket
const CPUS: &[(&str, &str, &str, i32, u32, u32, u32, f64, u32, &str)] = &[
    ("i5-6600k", "Intel", "Core i5-6600K", 2015, 6_300, 4, 4, 3.9, 91, "LGA1151"),
    ("i7-8700k", "Intel", "Core i7-8700K", 2017, 13_800, 6, 12, 4.7, 95, "LGA1151"),
    ("r5-3600", "AMD", "Ryzen 5 3600", 2019, 17_800, 6, 12, 4.2, 65, "AM4"),
    ("r5-5600x", "AMD", "Ryzen 5 5600X", 2020, 21_900, 6, 12, 4.6, 65, "AM4"),
    ("i5-12600k", "Intel", "Core i5-12600K", 2021, 27_600, 10, 16, 4.9, 125, "LGA1700"),
    ("r7-7800x3d", "AMD", "Ryzen 7 7800X3D", 2023, 34_500, 8, 16, 5.0, 120, "AM5"),
    ("i7-13700k", "Intel", "Core i7-13700K", 2022, 46_500, 16, 24, 5.4, 125, "LGA1700"),
    ("r9-7900x", "AMD", "Ryzen 9 7900X", 2022, 51_500, 12, 24, 5.6, 170, "AM5"),
];

// id, brand, model, year, score, VRAM GB, TDP
const GPUS: &[(&str, &str, &str, i32, u32, u32, u32)] = &[
    ("gtx-970", "NVIDIA", "GeForce GTX 970", 2014, 9_700, 4, 145),
    ("gtx-1060", "NVIDIA", "GeForce GTX 1060", 2016, 10_000, 6, 120),
    ("gtx-1070", "NVIDIA", "GeForce GTX 1070", 2016, 13_500, 8, 150),
    ("rtx-2060", "NVIDIA", "GeForce RTX 2060", 2019, 14_000, 6, 160),
    ("rtx-3060", "NVIDIA", "GeForce RTX 3060", 2021, 17_000, 12, 170),
    ("rx-6700-xt", "AMD", "Radeon RX 6700 XT", 2021, 19_500, 12, 230),
    ("rtx-3070", "NVIDIA", "GeForce RTX 3070", 2020, 22_000, 8, 220),
    ("rtx-4070", "NVIDIA", "GeForce RTX 4070", 2023, 26_800, 12, 200),
    ("rx-7900-xtx", "AMD", "Radeon RX 7900 XTX", 2022, 31_000, 24, 355),
    ("rtx-4090", "NVIDIA", "GeForce RTX 4090", 2022, 38_500, 24, 450),
];

// component id, price at the first retailer, price at the second (None = not listed),
// second listing in stock
const PRICES: &[(&str, f64, Option<f64>, bool)] = &[
    ("i7-8700k", 140.0, Some(155.0), true),
    ("r5-3600", 85.0, Some(79.0), false),
    ("r5-5600x", 135.0, Some(129.0), true),
    ("i5-12600k", 185.0, Some(179.0), true),
    ("r7-7800x3d", 389.0, Some(449.0), true),
    ("i7-13700k", 349.0, None, true),
    ("r9-7900x", 399.0, Some(379.0), true),
    ("gtx-1070", 120.0, None, true),
    ("rtx-2060", 160.0, Some(175.0), true),
    ("rtx-3060", 279.0, Some(289.0), true),
    ("rx-6700-xt", 319.0, Some(299.0), true),
    ("rtx-3070", 349.0, Some(329.0), false),
    ("rtx-4070", 549.0, Some(539.0), true),
    ("rx-7900-xtx", 899.0, Some(929.0), true),
    ("rtx-4090", 1_799.0, None, true),
    ("ddr4-32-3600", 79.0, Some(84.0), true),
    ("nvme-1tb", 79.0, Some(69.0), true),
    ("psu-850", 119.0, None, true),
];

const RETAILERS: [&str; 2] = ["PartsHub", "MegaComputers"];

fn cpu_components() -> impl Iterator<Item = Component> {
    CPUS.iter().map(
        |&(id, brand, model, year, score, cores, threads, boost, tdp, socket)| Component {
            id: id.to_string(),
            kind: ComponentKind::Cpu,
            brand: brand.to_string(),
            model: model.to_string(),
            release_year: Some(year),
            benchmark_score: score,
            specs: ComponentSpecs::Cpu(CpuSpecs {
                cores,
                threads,
                boost_clock_ghz: Some(boost),
                tdp_watts: Some(tdp),
                socket: Some(socket.to_string()),
            }),
        },
    )
}

fn gpu_components() -> impl Iterator<Item = Component> {
    GPUS.iter().map(|&(id, brand, model, year, score, vram, tdp)| Component {
        id: id.to_string(),
        kind: ComponentKind::Gpu,
        brand: brand.to_string(),
        model: model.to_string(),
        release_year: Some(year),
        benchmark_score: score,
        specs: ComponentSpecs::Gpu(GpuSpecs {
            vram_gb: vram,
            tdp_watts: Some(tdp),
        }),
    })
}

fn other_components() -> Vec<Component> {
    let part = |id: &str, kind, brand: &str, model: &str, year, specs| Component {
        id: id.to_string(),
        kind,
        brand: brand.to_string(),
        model: model.to_string(),
        release_year: Some(year),
        benchmark_score: 0,
        specs,
    };

    vec![
        part(
            "ddr4-16-3200",
            ComponentKind::Ram,
            "Corsair",
            "Vengeance LPX 16GB (2x8GB) DDR4-3200",
            2019,
            ComponentSpecs::Ram(RamSpecs {
                generation: "ddr4".to_string(),
                capacity_gb: 16,
                speed_mhz: Some(3200),
            }),
        ),
        part(
            "ddr4-32-3600",
            ComponentKind::Ram,
            "G.Skill",
            "Ripjaws V 32GB (2x16GB) DDR4-3600",
            2020,
            ComponentSpecs::Ram(RamSpecs {
                generation: "ddr4".to_string(),
                capacity_gb: 32,
                speed_mhz: Some(3600),
            }),
        ),
        part(
            "hdd-2tb",
            ComponentKind::Storage,
            "Seagate",
            "BarraCuda 2TB",
            2018,
            ComponentSpecs::Storage(StorageSpecs {
                interface: StorageType::Hdd,
                capacity_gb: 2000,
            }),
        ),
        part(
            "nvme-1tb",
            ComponentKind::Storage,
            "Samsung",
            "980 1TB",
            2021,
            ComponentSpecs::Storage(StorageSpecs {
                interface: StorageType::Nvme,
                capacity_gb: 1000,
            }),
        ),
        part(
            "psu-550",
            ComponentKind::Psu,
            "EVGA",
            "550 BR",
            2019,
            ComponentSpecs::Psu(PsuSpecs {
                wattage: 550,
                efficiency: Some("80+ Bronze".to_string()),
            }),
        ),
        part(
            "psu-850",
            ComponentKind::Psu,
            "Corsair",
            "RM850x",
            2021,
            ComponentSpecs::Psu(PsuSpecs {
                wattage: 850,
                efficiency: Some("80+ Gold".to_string()),
            }),
        ),
    ]
}

fn games() -> Vec<Game> {
    let curated = |id: &str, name: &str, steam_id, cpu, gpu, ram| Game {
        id: id.to_string(),
        name: name.to_string(),
        steam_id: Some(steam_id),
        weights: Some(GameWeights { cpu, gpu }),
        ram_requirement_gb: ram,
        recommended_specs: None,
    };

    vec![
        curated("cyberpunk-2077", "Cyberpunk 2077", 1_091_500, 0.9, 1.3, 16),
        curated("counter-strike-2", "Counter-Strike 2", 730, 1.4, 0.7, 8),
        curated("flight-simulator", "Microsoft Flight Simulator", 1_250_410, 1.3, 1.1, 32),
        curated("baldurs-gate-3", "Baldur's Gate 3", 1_086_940, 1.1, 1.0, 16),
        // Weights derived at analysis time from the recommended parts
        Game {
            id: "elden-ring".to_string(),
            name: "Elden Ring".to_string(),
            steam_id: Some(1_245_620),
            weights: None,
            ram_requirement_gb: 16,
            recommended_specs: Some(RecommendedSpecs {
                min_cpu: Some("Intel Core i5-8400".to_string()),
                rec_cpu: Some("Intel Core i7-8700K".to_string()),
                min_gpu: Some("NVIDIA GeForce GTX 1060 3GB".to_string()),
                rec_gpu: Some("NVIDIA GeForce GTX 1070".to_string()),
                notes: None,
            }),
        },
        Game {
            id: "hades-2".to_string(),
            name: "Hades II".to_string(),
            steam_id: Some(1_145_350),
            weights: None,
            ram_requirement_gb: 8,
            recommended_specs: None,
        },
    ]
}

fn offers() -> Vec<PriceOffer> {
    let mut offers = Vec::new();
    for &(id, first, second, second_in_stock) in PRICES {
        offers.push(PriceOffer {
            component_id: id.to_string(),
            retailer: RETAILERS[0].to_string(),
            price: first,
            in_stock: true,
            url: None,
        });
        if let Some(price) = second {
            offers.push(PriceOffer {
                component_id: id.to_string(),
                retailer: RETAILERS[1].to_string(),
                price,
                in_stock: second_in_stock,
                url: None,
            });
        }
    }
    offers
}

/// Replace the catalog with the built-in sample data
pub fn load_sample_data(conn: &Connection) -> Result<(), StoreError> {
    let tx = conn.unchecked_transaction()?;
    db::clear_catalog(&tx)?;

    let mut components = 0;
    for component in cpu_components().chain(gpu_components()).chain(other_components()) {
        db::upsert_component(&tx, &component)?;
        components += 1;
    }

    let games = games();
    for game in &games {
        db::upsert_game(&tx, game)?;
    }

    let offers = offers();
    for offer in &offers {
        db::insert_price(&tx, offer)?;
    }

    tx.commit()?;
    info!(components, games = games.len(), prices = offers.len(), "sample catalog loaded");
    Ok(())
}
