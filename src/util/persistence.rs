use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Error as SerdeError;

use crate::domain::{CatalogItem, PriceTable};

pub const APP_QUALIFIER: &str = "com";
pub const APP_ORG: &str = "RuneBreak";
pub const APP_DIR_NAME: &str = "RuneBreakScanner";

const CATALOG_FILE: &str = "catalog.json";
const PRICES_FILE: &str = "prices.json";

pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_DIR_NAME)
}

/// Where catalog and price snapshots live unless a path is given.
pub fn default_data_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
}

pub fn default_catalog_path() -> Result<PathBuf, SnapshotError> {
    default_data_dir()
        .map(|dir| dir.join(CATALOG_FILE))
        .ok_or(SnapshotError::StorageUnavailable)
}

pub fn default_prices_path() -> Result<PathBuf, SnapshotError> {
    default_data_dir()
        .map(|dir| dir.join(PRICES_FILE))
        .ok_or(SnapshotError::StorageUnavailable)
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, SnapshotError> {
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), SnapshotError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}

pub fn load_catalog(path: &Path) -> Result<Vec<CatalogItem>, SnapshotError> {
    read_json(path)
}

pub fn save_catalog(path: &Path, catalog: &[CatalogItem]) -> Result<(), SnapshotError> {
    write_json(path, &catalog)
}

pub fn load_prices(path: &Path) -> Result<PriceTable, SnapshotError> {
    read_json(path)
}

pub fn save_prices(path: &Path, prices: &PriceTable) -> Result<(), SnapshotError> {
    write_json(path, prices)
}

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("storage directory unavailable")]
    StorageUnavailable,
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] SerdeError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Item, RecipeEntry, StatEffect};

    #[test]
    fn catalog_and_prices_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let catalog_path = dir.path().join("snapshots").join(CATALOG_FILE);
        let prices_path = dir.path().join(PRICES_FILE);

        let mut entry = CatalogItem::from(Item {
            id: 44,
            name: "Gelano".into(),
            level: 60,
            item_type: "Ring".into(),
            image: None,
            stats: vec![StatEffect::from_range("AP", 1.0, 0.0, false)],
            recipe: vec![RecipeEntry::new(7, 2)],
        });
        entry.last_coefficient = Some(88.0);
        save_catalog(&catalog_path, &[entry.clone()]).unwrap();
        assert_eq!(load_catalog(&catalog_path).unwrap(), vec![entry]);

        let mut prices = PriceTable::default();
        prices.runes.insert("Ga Pa Rune".into(), 250_000.0);
        prices.ingredients.insert(7, -1.0);
        save_prices(&prices_path, &prices).unwrap();
        assert_eq!(load_prices(&prices_path).unwrap(), prices);
    }

    #[test]
    fn sparse_price_files_use_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PRICES_FILE);
        fs::write(&path, r#"{ "runes": { "Vi Rune": 12.5 } }"#).unwrap();
        let prices = load_prices(&path).unwrap();
        assert_eq!(prices.rune_price("Vi Rune"), 12.5);
        assert!(prices.ingredients.is_empty());
    }

    #[test]
    fn malformed_snapshot_is_a_serde_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CATALOG_FILE);
        fs::write(&path, "not json").unwrap();
        assert!(matches!(load_catalog(&path), Err(SnapshotError::Serde(_))));
        assert!(matches!(
            load_catalog(&dir.path().join("missing.json")),
            Err(SnapshotError::Io(_))
        ));
    }
}
