//! Data models for hardware components, games and user builds

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{MAX_WEIGHT, MIN_WEIGHT};
use crate::error::BuildDataError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    Cpu,
    Gpu,
    Ram,
    Storage,
    Psu,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 5] = [
        ComponentKind::Cpu,
        ComponentKind::Gpu,
        ComponentKind::Ram,
        ComponentKind::Storage,
        ComponentKind::Psu,
    ];

    /// Identifier used in the database and catalog files
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentKind::Cpu => "cpu",
            ComponentKind::Gpu => "gpu",
            ComponentKind::Ram => "ram",
            ComponentKind::Storage => "storage",
            ComponentKind::Psu => "psu",
        }
    }

    /// Human-facing label
    pub fn label(&self) -> &'static str {
        match self {
            ComponentKind::Cpu => "CPU",
            ComponentKind::Gpu => "GPU",
            ComponentKind::Ram => "RAM",
            ComponentKind::Storage => "Storage",
            ComponentKind::Psu => "PSU",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComponentKind {
    type Err = BuildDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cpu" => Ok(ComponentKind::Cpu),
            "gpu" => Ok(ComponentKind::Gpu),
            "ram" => Ok(ComponentKind::Ram),
            "storage" => Ok(ComponentKind::Storage),
            "psu" => Ok(ComponentKind::Psu),
            other => Err(BuildDataError::UnknownComponentKind(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpuSpecs {
    pub cores: u32,
    pub threads: u32,
    #[serde(default)]
    pub boost_clock_ghz: Option<f64>,
    #[serde(default)]
    pub tdp_watts: Option<u32>,
    #[serde(default)]
    pub socket: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpuSpecs {
    pub vram_gb: u32,
    #[serde(default)]
    pub tdp_watts: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RamSpecs {
    pub generation: String,
    pub capacity_gb: u32,
    #[serde(default)]
    pub speed_mhz: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageSpecs {
    pub interface: StorageType,
    pub capacity_gb: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PsuSpecs {
    pub wattage: u32,
    #[serde(default)]
    pub efficiency: Option<String>,
}

/// Type-specific component specifications, validated when read from a store
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ComponentSpecs {
    Cpu(CpuSpecs),
    Gpu(GpuSpecs),
    Ram(RamSpecs),
    Storage(StorageSpecs),
    Psu(PsuSpecs),
}

impl ComponentSpecs {
    /// Parse a raw JSON spec blob for the given component kind
    pub fn parse(kind: ComponentKind, value: serde_json::Value) -> serde_json::Result<Self> {
        Ok(match kind {
            ComponentKind::Cpu => ComponentSpecs::Cpu(serde_json::from_value(value)?),
            ComponentKind::Gpu => ComponentSpecs::Gpu(serde_json::from_value(value)?),
            ComponentKind::Ram => ComponentSpecs::Ram(serde_json::from_value(value)?),
            ComponentKind::Storage => ComponentSpecs::Storage(serde_json::from_value(value)?),
            ComponentKind::Psu => ComponentSpecs::Psu(serde_json::from_value(value)?),
        })
    }

    pub fn kind(&self) -> ComponentKind {
        match self {
            ComponentSpecs::Cpu(_) => ComponentKind::Cpu,
            ComponentSpecs::Gpu(_) => ComponentKind::Gpu,
            ComponentSpecs::Ram(_) => ComponentKind::Ram,
            ComponentSpecs::Storage(_) => ComponentKind::Storage,
            ComponentSpecs::Psu(_) => ComponentKind::Psu,
        }
    }
}

/// Immutable reference data for a single hardware part
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Component {
    pub id: String,
    pub kind: ComponentKind,
    pub brand: String,
    pub model: String,
    pub release_year: Option<i32>,
    pub benchmark_score: u32,
    pub specs: ComponentSpecs,
}

impl Component {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.brand, self.model)
    }
}

/// The part a user currently has installed, as far as the store could tell
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstalledPart {
    pub kind: ComponentKind,
    pub id: String,
    pub name: String,
    /// 0 when the part could not be looked up
    pub score: u32,
    pub release_year: Option<i32>,
    pub found: bool,
}

impl InstalledPart {
    pub fn from_lookup(kind: ComponentKind, id: &str, component: Option<Component>) -> Self {
        match component {
            Some(c) => Self {
                kind,
                id: c.id.clone(),
                name: c.display_name(),
                score: c.benchmark_score,
                release_year: c.release_year,
                found: true,
            },
            None => Self {
                kind,
                id: id.to_string(),
                name: format!("Unknown {}", kind.label()),
                score: 0,
                release_year: None,
                found: false,
            },
        }
    }
}

/// Relative CPU/GPU importance for a game, each in [0.5, 1.5]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameWeights {
    pub cpu: f64,
    pub gpu: f64,
}

impl GameWeights {
    pub const NEUTRAL: GameWeights = GameWeights { cpu: 1.0, gpu: 1.0 };

    pub fn new(cpu: f64, gpu: f64) -> Self {
        Self {
            cpu: clamp_weight(cpu),
            gpu: clamp_weight(gpu),
        }
    }

    /// Combined importance of a game, used to weight multi-game averages
    pub fn total(&self) -> f64 {
        self.cpu + self.gpu
    }
}

pub fn clamp_weight(weight: f64) -> f64 {
    if weight.is_nan() {
        return 1.0;
    }
    weight.clamp(MIN_WEIGHT, MAX_WEIGHT)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendedSpecs {
    #[serde(default)]
    pub min_cpu: Option<String>,
    #[serde(default)]
    pub rec_cpu: Option<String>,
    #[serde(default)]
    pub min_gpu: Option<String>,
    #[serde(default)]
    pub rec_gpu: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub steam_id: Option<u32>,
    /// `None` means the game has not been curated yet
    #[serde(default)]
    pub weights: Option<GameWeights>,
    pub ram_requirement_gb: u32,
    #[serde(default)]
    pub recommended_specs: Option<RecommendedSpecs>,
}

/// One retailer listing for a component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceOffer {
    pub component_id: String,
    pub retailer: String,
    pub price: f64,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
    #[serde(default)]
    pub url: Option<String>,
}

fn default_in_stock() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resolution {
    #[serde(rename = "1080p")]
    P1080,
    #[serde(rename = "1440p")]
    P1440,
    #[serde(rename = "4k")]
    P4k,
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Resolution::P1080 => "1080p",
            Resolution::P1440 => "1440p",
            Resolution::P4k => "4k",
        })
    }
}

impl FromStr for Resolution {
    type Err = BuildDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1080p" | "1080" => Ok(Resolution::P1080),
            "1440p" | "1440" => Ok(Resolution::P1440),
            "4k" | "2160p" | "2160" => Ok(Resolution::P4k),
            other => Err(BuildDataError::UnknownResolution(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StorageType {
    Nvme,
    SataSsd,
    Hdd,
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StorageType::Nvme => "nvme",
            StorageType::SataSsd => "sata-ssd",
            StorageType::Hdd => "hdd",
        })
    }
}

impl FromStr for StorageType {
    type Err = BuildDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nvme" => Ok(StorageType::Nvme),
            "sata-ssd" | "ssd" => Ok(StorageType::SataSsd),
            "hdd" => Ok(StorageType::Hdd),
            other => Err(BuildDataError::UnknownStorage(other.to_string())),
        }
    }
}

/// Installed memory, written as `ddrN-GB` (e.g. `ddr4-16`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RamConfig {
    pub generation: String,
    pub capacity_gb: u32,
}

impl FromStr for RamConfig {
    type Err = BuildDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        let (generation, capacity) = normalized
            .split_once('-')
            .ok_or_else(|| BuildDataError::InvalidRam(s.to_string()))?;

        let valid_generation = generation.len() > 3
            && generation.starts_with("ddr")
            && generation[3..].chars().all(|c| c.is_ascii_digit());
        if !valid_generation {
            return Err(BuildDataError::InvalidRam(s.to_string()));
        }

        let capacity_gb = capacity
            .trim_end_matches("gb")
            .parse::<u32>()
            .map_err(|_| BuildDataError::InvalidRam(s.to_string()))?;
        if capacity_gb == 0 {
            return Err(BuildDataError::InvalidRam(s.to_string()));
        }

        Ok(RamConfig {
            generation: generation.to_string(),
            capacity_gb,
        })
    }
}

impl fmt::Display for RamConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.generation, self.capacity_gb)
    }
}

impl Serialize for RamConfig {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RamConfig {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Parse a PSU wattage string such as `650` or `650W`
pub fn parse_psu_wattage(raw: &str) -> Result<u32, BuildDataError> {
    let trimmed = raw.trim().trim_end_matches(['w', 'W']).trim();
    match trimmed.parse::<u32>() {
        Ok(watts) if watts > 0 => Ok(watts),
        _ => Err(BuildDataError::InvalidPsu(raw.to_string())),
    }
}

fn deserialize_psu<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u32),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(watts) => Ok(watts),
        Raw::Text(text) => parse_psu_wattage(&text).map_err(serde::de::Error::custom),
    }
}

/// A single analysis request as collected by the build wizard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildData {
    pub cpu: String,
    pub gpu: String,
    pub ram: RamConfig,
    pub storage: StorageType,
    #[serde(rename = "psu", deserialize_with = "deserialize_psu")]
    pub psu_watts: u32,
    pub games: Vec<String>,
    pub budget: f64,
    pub resolution: Resolution,
}

impl BuildData {
    pub fn validate(&self) -> Result<(), BuildDataError> {
        if !self.budget.is_finite() || self.budget < 0.0 {
            return Err(BuildDataError::InvalidBudget(self.budget));
        }
        Ok(())
    }
}
