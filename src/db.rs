//! SQLite schema and the SQLite-backed component store

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use rusqlite::{params_from_iter, Connection, OptionalExtension};
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::models::{
    clamp_weight, Component, ComponentKind, ComponentSpecs, Game, GameWeights, PriceOffer,
    RecommendedSpecs,
};
use crate::store::ComponentStore;

/// Initialize the database schema
pub fn init_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        r#"
        -- Hardware reference data
        CREATE TABLE IF NOT EXISTS components (
            id TEXT PRIMARY KEY,
            kind TEXT NOT NULL,
            brand TEXT NOT NULL,
            model TEXT NOT NULL,
            release_year INTEGER,
            benchmark_score INTEGER NOT NULL,
            specs TEXT NOT NULL
        );

        -- Games; NULL weights mean "not curated yet"
        CREATE TABLE IF NOT EXISTS games (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            steam_id INTEGER,
            cpu_weight REAL,
            gpu_weight REAL,
            ram_requirement_gb INTEGER NOT NULL,
            recommended_specs TEXT
        );

        -- Retailer listings, several per component
        CREATE TABLE IF NOT EXISTS prices (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            component_id TEXT NOT NULL,
            retailer TEXT NOT NULL,
            price REAL NOT NULL,
            in_stock INTEGER NOT NULL DEFAULT 1,
            url TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_components_kind_score ON components(kind, benchmark_score);
        CREATE INDEX IF NOT EXISTS idx_prices_component ON prices(component_id);
        "#,
    )?;
    Ok(())
}

/// Insert or replace a component
pub fn upsert_component(conn: &Connection, component: &Component) -> Result<(), StoreError> {
    if component.specs.kind() != component.kind {
        return Err(StoreError::InvalidSpecs {
            id: component.id.clone(),
            reason: format!("{} specs on a {} component", component.specs.kind(), component.kind),
        });
    }
    let specs = serde_json::to_string(&component.specs)?;
    conn.execute(
        "INSERT OR REPLACE INTO components (id, kind, brand, model, release_year, benchmark_score, specs)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        (
            &component.id,
            component.kind.as_str(),
            &component.brand,
            &component.model,
            component.release_year,
            component.benchmark_score,
            specs,
        ),
    )?;
    Ok(())
}

/// Insert or replace a game
pub fn upsert_game(conn: &Connection, game: &Game) -> Result<(), StoreError> {
    let specs = game
        .recommended_specs
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;
    conn.execute(
        "INSERT OR REPLACE INTO games (id, name, steam_id, cpu_weight, gpu_weight, ram_requirement_gb, recommended_specs)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        (
            &game.id,
            &game.name,
            game.steam_id,
            game.weights.map(|w| w.cpu),
            game.weights.map(|w| w.gpu),
            game.ram_requirement_gb,
            specs,
        ),
    )?;
    Ok(())
}

/// Insert a retailer price listing
pub fn insert_price(conn: &Connection, offer: &PriceOffer) -> Result<(), StoreError> {
    conn.execute(
        "INSERT INTO prices (component_id, retailer, price, in_stock, url)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        (
            &offer.component_id,
            &offer.retailer,
            offer.price,
            offer.in_stock,
            &offer.url,
        ),
    )?;
    Ok(())
}

/// Clear all catalog data (for re-import)
pub fn clear_catalog(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        r#"
        DELETE FROM prices;
        DELETE FROM games;
        DELETE FROM components;
        "#,
    )?;
    Ok(())
}

/// List all games in the database
pub fn list_games(conn: &Connection) -> Result<Vec<Game>, StoreError> {
    let mut stmt = conn.prepare(&format!("{} ORDER BY name", GAME_COLUMNS))?;
    let rows = stmt.query_map([], read_game_row)?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row?.into_game()?);
    }
    Ok(results)
}

const COMPONENT_COLUMNS: &str =
    "SELECT id, kind, brand, model, release_year, benchmark_score, specs FROM components";

const GAME_COLUMNS: &str = "SELECT id, name, steam_id, cpu_weight, gpu_weight, ram_requirement_gb, recommended_specs FROM games";

/// Component row before its spec blob has been validated
struct ComponentRow {
    id: String,
    kind: String,
    brand: String,
    model: String,
    release_year: Option<i32>,
    benchmark_score: u32,
    specs: String,
}

fn read_component_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ComponentRow> {
    Ok(ComponentRow {
        id: row.get(0)?,
        kind: row.get(1)?,
        brand: row.get(2)?,
        model: row.get(3)?,
        release_year: row.get(4)?,
        benchmark_score: row.get(5)?,
        specs: row.get(6)?,
    })
}

impl ComponentRow {
    fn into_component(self) -> Result<Component, StoreError> {
        let invalid = |reason: String| StoreError::InvalidSpecs {
            id: self.id.clone(),
            reason,
        };

        let kind: ComponentKind = self.kind.parse().map_err(|e| invalid(format!("{}", e)))?;
        let raw: serde_json::Value =
            serde_json::from_str(&self.specs).map_err(|e| invalid(e.to_string()))?;
        let specs = ComponentSpecs::parse(kind, raw).map_err(|e| invalid(e.to_string()))?;

        Ok(Component {
            id: self.id,
            kind,
            brand: self.brand,
            model: self.model,
            release_year: self.release_year,
            benchmark_score: self.benchmark_score,
            specs,
        })
    }
}

struct GameRow {
    id: String,
    name: String,
    steam_id: Option<u32>,
    cpu_weight: Option<f64>,
    gpu_weight: Option<f64>,
    ram_requirement_gb: u32,
    recommended_specs: Option<String>,
}

fn read_game_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<GameRow> {
    Ok(GameRow {
        id: row.get(0)?,
        name: row.get(1)?,
        steam_id: row.get(2)?,
        cpu_weight: row.get(3)?,
        gpu_weight: row.get(4)?,
        ram_requirement_gb: row.get(5)?,
        recommended_specs: row.get(6)?,
    })
}

impl GameRow {
    fn into_game(self) -> Result<Game, StoreError> {
        // Both weights or neither; a half-curated row is treated as uncurated
        let weights = match (self.cpu_weight, self.gpu_weight) {
            (Some(cpu), Some(gpu)) => Some(GameWeights {
                cpu: clamp_weight(cpu),
                gpu: clamp_weight(gpu),
            }),
            _ => None,
        };
        let recommended_specs = self
            .recommended_specs
            .map(|raw| serde_json::from_str::<RecommendedSpecs>(&raw))
            .transpose()?;

        Ok(Game {
            id: self.id,
            name: self.name,
            steam_id: self.steam_id,
            weights,
            ram_requirement_gb: self.ram_requirement_gb,
            recommended_specs,
        })
    }
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

/// Component store backed by a SQLite database
///
/// The connection sits behind a mutex so queries can run on the worker
/// threads that enforce timeouts.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (and initialize) a database file, waiting at most `timeout` on locks
    pub fn open(path: &Path, timeout: Duration) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(timeout)?;
        init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn connection(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }

    /// Rows whose specs fail validation are logged and left out
    fn query_components(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<Component>, StoreError> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(params, read_component_row)?;

        let mut results = Vec::new();
        for row in rows {
            match row?.into_component() {
                Ok(component) => results.push(component),
                Err(e) => warn!(error = %e, "skipping unreadable component row"),
            }
        }
        Ok(results)
    }
}

impl ComponentStore for SqliteStore {
    fn get_component(&self, kind: ComponentKind, id: &str) -> Result<Component, StoreError> {
        let row = self
            .connection()?
            .query_row(
                &format!("{} WHERE id = ?1 AND kind = ?2", COMPONENT_COLUMNS),
                (id, kind.as_str()),
                read_component_row,
            )
            .optional()?;

        match row {
            Some(row) => row.into_component(),
            None => Err(StoreError::NotFound {
                kind,
                id: id.to_string(),
            }),
        }
    }

    fn components_above(&self, kind: ComponentKind, min_score: u32) -> Result<Vec<Component>, StoreError> {
        self.query_components(
            &format!(
                "{} WHERE kind = ?1 AND benchmark_score > ?2 ORDER BY benchmark_score ASC, id ASC",
                COMPONENT_COLUMNS
            ),
            (kind.as_str(), min_score),
        )
    }

    fn list_components(&self, kind: ComponentKind) -> Result<Vec<Component>, StoreError> {
        self.query_components(
            &format!(
                "{} WHERE kind = ?1 ORDER BY benchmark_score ASC, id ASC",
                COMPONENT_COLUMNS
            ),
            [kind.as_str()],
        )
    }

    fn lowest_prices(&self, ids: &[String], in_stock_only: bool) -> Result<HashMap<String, f64>, StoreError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut sql = format!(
            "SELECT component_id, MIN(price) FROM prices WHERE component_id IN ({})",
            placeholders(ids.len())
        );
        if in_stock_only {
            sql.push_str(" AND in_stock = 1");
        }
        sql.push_str(" GROUP BY component_id");

        let conn = self.connection()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(ids.iter()), |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?))
        })?;

        let mut prices = HashMap::new();
        for row in rows {
            let (id, price) = row?;
            prices.insert(id, price);
        }
        debug!(requested = ids.len(), priced = prices.len(), "price lookup");
        Ok(prices)
    }

    fn games_by_ids(&self, ids: &[String]) -> Result<Vec<Game>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let conn = self.connection()?;
        let mut stmt = conn.prepare(&format!(
            "{} WHERE id IN ({})",
            GAME_COLUMNS,
            placeholders(ids.len())
        ))?;
        let rows = stmt.query_map(params_from_iter(ids.iter()), read_game_row)?;

        let mut games = Vec::new();
        for row in rows {
            games.push(row?.into_game()?);
        }
        // Keep the order the user picked the games in
        games.sort_by_key(|g| ids.iter().position(|id| id == &g.id));
        Ok(games)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{cpu, gpu, offer};

    fn store() -> SqliteStore {
        let store = SqliteStore::open_in_memory().unwrap();
        {
            let conn = store.connection().unwrap();
            upsert_component(&conn, &cpu("cpu-a", 12_000, 2017)).unwrap();
            upsert_component(&conn, &cpu("cpu-b", 25_000, 2021)).unwrap();
            upsert_component(&conn, &cpu("cpu-c", 40_000, 2023)).unwrap();
            upsert_component(&conn, &gpu("gpu-a", 9_000, 2019)).unwrap();
            insert_price(&conn, &offer("cpu-b", 199.0, true)).unwrap();
            insert_price(&conn, &offer("cpu-b", 179.0, true)).unwrap();
            insert_price(&conn, &offer("cpu-c", 250.0, false)).unwrap();
            insert_price(&conn, &offer("cpu-c", 329.0, true)).unwrap();
        }
        store
    }

    fn insert_bad_gpu(store: &SqliteStore) {
        store
            .connection()
            .unwrap()
            .execute(
                "INSERT INTO components (id, kind, brand, model, release_year, benchmark_score, specs)
                 VALUES ('bad', 'gpu', 'X', 'Y', 2020, 100, '{\"cores\": 4}')",
                [],
            )
            .unwrap();
    }

    #[test]
    fn test_component_round_trip() {
        let store = store();
        let component = store.get_component(ComponentKind::Cpu, "cpu-b").unwrap();
        assert_eq!(component, cpu("cpu-b", 25_000, 2021));
    }

    #[test]
    fn test_get_wrong_kind_is_not_found() {
        let store = store();
        let err = store.get_component(ComponentKind::Gpu, "cpu-b").unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[test]
    fn test_components_above_is_strict_and_ascending() {
        let store = store();
        let above = store.components_above(ComponentKind::Cpu, 12_000).unwrap();
        let ids: Vec<_> = above.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["cpu-b", "cpu-c"]);
    }

    #[test]
    fn test_lowest_prices() {
        let store = store();
        let ids = vec!["cpu-b".to_string(), "cpu-c".to_string(), "cpu-a".to_string()];

        let in_stock = store.lowest_prices(&ids, true).unwrap();
        assert_eq!(in_stock.get("cpu-b"), Some(&179.0));
        assert_eq!(in_stock.get("cpu-c"), Some(&329.0));
        assert!(!in_stock.contains_key("cpu-a"));

        let any = store.lowest_prices(&ids, false).unwrap();
        assert_eq!(any.get("cpu-c"), Some(&250.0));

        assert!(store.lowest_prices(&[], true).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_specs_rejected_at_read() {
        let store = store();
        insert_bad_gpu(&store);
        let err = store.get_component(ComponentKind::Gpu, "bad").unwrap_err();
        assert!(matches!(err, StoreError::InvalidSpecs { .. }));
    }

    #[test]
    fn test_invalid_row_skipped_in_listings() {
        let store = store();
        insert_bad_gpu(&store);
        let above = store.components_above(ComponentKind::Gpu, 0).unwrap();
        let ids: Vec<_> = above.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["gpu-a"]);
        assert_eq!(store.list_components(ComponentKind::Gpu).unwrap().len(), 1);
    }

    #[test]
    fn test_games_keep_requested_order_and_optional_weights() {
        let store = store();
        let mut curated = crate::fixtures::game("b-game", 1.3, 0.8, 16);
        curated.name = "B Game".to_string();
        let mut uncurated = crate::fixtures::game("a-game", 1.0, 1.0, 8);
        uncurated.weights = None;
        upsert_game(&store.connection().unwrap(), &curated).unwrap();
        upsert_game(&store.connection().unwrap(), &uncurated).unwrap();

        let games = store
            .games_by_ids(&["b-game".to_string(), "a-game".to_string(), "missing".to_string()])
            .unwrap();
        assert_eq!(games.len(), 2);
        assert_eq!(games[0].id, "b-game");
        assert_eq!(games[0].weights, Some(GameWeights { cpu: 1.3, gpu: 0.8 }));
        assert_eq!(games[1].weights, None);

        assert_eq!(list_games(&store.connection().unwrap()).unwrap().len(), 2);
    }

    #[test]
    fn test_mismatched_specs_rejected_at_write() {
        let store = store();
        let mut wrong = cpu("cpu-x", 10_000, 2020);
        wrong.kind = ComponentKind::Gpu;
        let err = upsert_component(&store.connection().unwrap(), &wrong).unwrap_err();
        assert!(matches!(err, StoreError::InvalidSpecs { .. }));
    }

    #[test]
    fn test_clear_catalog() {
        let store = store();
        clear_catalog(&store.connection().unwrap()).unwrap();
        assert!(store.list_components(ComponentKind::Cpu).unwrap().is_empty());
    }
}
