//! Calculator store
//!
//! An explicit collection of calculators backed by a JSON file. Nothing is
//! written until [`CalculatorStore::save`] is called.

use crate::builder::timestamp;
use crate::{Calculator, CalculatorUpdate};
use formulaforge_formula::{validate_calculator, ValidationReport};
use formulaforge_json::{CalculatorReader, CalculatorWriter, JsonError, ReadOptions, WriteOptions};
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming the store file
pub const STORE_ENV_VAR: &str = "FORMULAFORGE_STORE";

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Core(#[from] formulaforge_core::Error),

    #[error(transparent)]
    Json(#[from] JsonError),

    #[error(transparent)]
    Invalid(#[from] ValidationReport),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// No explicit path, no environment override and no home directory
    #[error("Cannot locate the calculator store: set FORMULAFORGE_STORE or HOME")]
    NoStorePath,
}

/// Where the store lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub path: PathBuf,
}

impl StoreConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Resolve the store path: `explicit`, else `$FORMULAFORGE_STORE`, else
    /// `$HOME/.config/formulaforge/calculators.json`
    pub fn resolve(explicit: Option<PathBuf>) -> StoreResult<Self> {
        if let Some(path) = explicit {
            return Ok(Self::new(path));
        }
        if let Some(path) = std::env::var_os(STORE_ENV_VAR).filter(|p| !p.is_empty()) {
            return Ok(Self::new(path));
        }
        let home = std::env::var_os("HOME")
            .filter(|h| !h.is_empty())
            .ok_or(StoreError::NoStorePath)?;
        Ok(Self::new(
            Path::new(&home)
                .join(".config")
                .join("formulaforge")
                .join("calculators.json"),
        ))
    }
}

/// A list of calculators with an explicit load/save lifecycle
#[derive(Debug)]
pub struct CalculatorStore {
    config: StoreConfig,
    calculators: Vec<Calculator>,
}

impl CalculatorStore {
    /// Load the store file, or start empty when it does not exist yet
    pub fn open(config: StoreConfig) -> StoreResult<Self> {
        let calculators = if config.path.exists() {
            let text = fs::read_to_string(&config.path)?;
            if text.trim().is_empty() {
                Vec::new()
            } else {
                CalculatorReader::read_many(&text, &ReadOptions { validate: false })?
            }
        } else {
            Vec::new()
        };

        tracing::info!(path = %config.path.display(), count = calculators.len(), "opened calculator store");
        Ok(Self {
            config,
            calculators,
        })
    }

    /// Write every calculator back to the store file
    pub fn save(&self) -> StoreResult<()> {
        if let Some(parent) = self.config.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let options = WriteOptions {
            pretty: true,
            include_exported_at: false,
            fill_formula_display: false,
        };
        let text = CalculatorWriter::export_all(&self.calculators, &options)?;
        fs::write(&self.config.path, text)?;

        tracing::info!(path = %self.config.path.display(), count = self.calculators.len(), "saved calculator store");
        Ok(())
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.calculators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calculators.is_empty()
    }

    /// Add a validated calculator; its id must not be taken
    pub fn add(&mut self, mut calculator: Calculator) -> StoreResult<()> {
        self.check_new_id(&calculator.id)?;
        check_valid(&calculator)?;

        let now = timestamp();
        calculator.created_at.get_or_insert_with(|| now.clone());
        calculator.updated_at.get_or_insert(now);
        self.calculators.push(calculator);
        Ok(())
    }

    /// Apply updates to a stored calculator.
    ///
    /// The updates are applied to a copy which must still validate; the
    /// stored calculator is left untouched otherwise.
    pub fn update<I>(&mut self, id: &str, updates: I) -> StoreResult<&Calculator>
    where
        I: IntoIterator<Item = CalculatorUpdate>,
    {
        let index = self.position(id)?;
        let mut calculator = self.calculators[index].clone();
        for update in updates {
            update.apply(&mut calculator)?;
        }
        check_valid(&calculator)?;

        calculator.updated_at = Some(timestamp());
        self.calculators[index] = calculator;
        Ok(&self.calculators[index])
    }

    pub fn remove(&mut self, id: &str) -> StoreResult<Calculator> {
        let index = self.position(id)?;
        Ok(self.calculators.remove(index))
    }

    pub fn get(&self, id: &str) -> Option<&Calculator> {
        self.calculators.iter().find(|c| c.id == id)
    }

    pub fn list(&self) -> &[Calculator] {
        &self.calculators
    }

    /// Case-insensitive match on title, description or category. A blank
    /// query matches everything.
    pub fn search(&self, query: &str) -> Vec<&Calculator> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self.calculators.iter().collect();
        }

        self.calculators
            .iter()
            .filter(|calc| {
                calc.title.to_lowercase().contains(&query)
                    || calc.description.to_lowercase().contains(&query)
                    || calc
                        .category
                        .as_deref()
                        .is_some_and(|c| c.to_lowercase().contains(&query))
            })
            .collect()
    }

    pub fn filter_by_category(&self, category: &str) -> Vec<&Calculator> {
        self.calculators
            .iter()
            .filter(|calc| calc.category.as_deref() == Some(category))
            .collect()
    }

    /// Distinct categories, sorted
    pub fn categories(&self) -> Vec<String> {
        self.calculators
            .iter()
            .filter_map(|calc| calc.category.clone())
            .filter(|c| !c.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Import one calculator document, returning its id
    pub fn import_json(&mut self, json: &str) -> StoreResult<String> {
        let calculator = CalculatorReader::read_str(json, &ReadOptions::default())?;
        let id = calculator.id.clone();
        self.add(calculator)?;
        Ok(id)
    }

    /// Import an array of documents (or a single one). Either every
    /// calculator is added or none is.
    pub fn import_many_json(&mut self, json: &str) -> StoreResult<Vec<String>> {
        let calculators = CalculatorReader::read_many(json, &ReadOptions::default())?;

        let mut seen = HashSet::new();
        for calculator in &calculators {
            self.check_new_id(&calculator.id)?;
            if !seen.insert(calculator.id.as_str()) {
                return Err(formulaforge_core::Error::DuplicateCalculator(calculator.id.clone()).into());
            }
        }

        let ids = calculators.iter().map(|c| c.id.clone()).collect();
        let now = timestamp();
        for mut calculator in calculators {
            calculator.created_at.get_or_insert_with(|| now.clone());
            calculator.updated_at.get_or_insert_with(|| now.clone());
            self.calculators.push(calculator);
        }
        Ok(ids)
    }

    /// Export one calculator as a JSON document
    pub fn export_json(&self, id: &str) -> StoreResult<String> {
        let calculator = self
            .get(id)
            .ok_or_else(|| formulaforge_core::Error::UnknownCalculator(id.to_string()))?;
        Ok(CalculatorWriter::to_string(calculator, &WriteOptions::default())?)
    }

    /// Export every calculator as one JSON array
    pub fn export_all_json(&self) -> StoreResult<String> {
        Ok(CalculatorWriter::export_all(&self.calculators, &WriteOptions::default())?)
    }

    fn position(&self, id: &str) -> StoreResult<usize> {
        self.calculators
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| formulaforge_core::Error::UnknownCalculator(id.to_string()).into())
    }

    fn check_new_id(&self, id: &str) -> StoreResult<()> {
        if self.get(id).is_some() {
            Err(formulaforge_core::Error::DuplicateCalculator(id.to_string()).into())
        } else {
            Ok(())
        }
    }
}

fn check_valid(calculator: &Calculator) -> StoreResult<()> {
    let report = validate_calculator(calculator);
    if report.is_valid() {
        Ok(())
    } else {
        Err(report.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{InputField, OutputField};
    use pretty_assertions::assert_eq;

    fn calculator(id: &str, title: &str, category: Option<&str>) -> Calculator {
        let mut calc = Calculator::new(id, title, format!("{} calculator", title))
            .with_input(InputField::number("x", "X", "x", ""))
            .with_output(OutputField::new("y", "Y", "y", "", "x * 2"));
        calc.category = category.map(String::from);
        calc
    }

    fn store_in(dir: &tempfile::TempDir) -> CalculatorStore {
        CalculatorStore::open(StoreConfig::new(dir.path().join("store").join("calculators.json")))
            .unwrap()
    }

    #[test]
    fn test_open_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert!(store.is_empty());
    }

    #[test]
    fn test_save_and_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        store.add(calculator("a", "Alpha", Some("Math"))).unwrap();
        store.add(calculator("b", "Beta", None)).unwrap();
        store.save().unwrap();

        let reopened = store_in(&dir);
        assert_eq!(reopened.len(), 2);
        assert_eq!(reopened.list(), store.list());
    }

    #[test]
    fn test_add_rejects_duplicates_and_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        store.add(calculator("a", "Alpha", None)).unwrap();
        assert!(matches!(
            store.add(calculator("a", "Again", None)),
            Err(StoreError::Core(formulaforge_core::Error::DuplicateCalculator(_)))
        ));

        let mut invalid = calculator("c", "Gamma", None);
        invalid.outputs.clear();
        assert!(matches!(store.add(invalid), Err(StoreError::Invalid(_))));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_update() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        store.add(calculator("a", "Alpha", None)).unwrap();

        let updated = store
            .update(
                "a",
                [
                    CalculatorUpdate::Title("Alpha 2".into()),
                    CalculatorUpdate::Category(Some("Physics".into())),
                ],
            )
            .unwrap();
        assert_eq!(updated.title, "Alpha 2");
        assert_eq!(updated.category.as_deref(), Some("Physics"));

        // Invalid result leaves the stored calculator untouched
        assert!(store.update("a", [CalculatorUpdate::Outputs(Vec::new())]).is_err());
        assert_eq!(store.get("a").map(|c| c.outputs.len()), Some(1));

        assert!(store.update("missing", []).is_err());
    }

    #[test]
    fn test_search_and_categories() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        store.add(calculator("ohm", "Ohm's Law", Some("Electrical"))).unwrap();
        store.add(calculator("ke", "Kinetic Energy", Some("Mechanics"))).unwrap();
        store.add(calculator("pe", "Potential Energy", Some("Mechanics"))).unwrap();
        store.add(calculator("misc", "Misc", None)).unwrap();

        let titles = |found: Vec<&Calculator>| -> Vec<String> {
            found.iter().map(|c| c.title.clone()).collect()
        };
        assert_eq!(titles(store.search("ENERGY")), vec!["Kinetic Energy", "Potential Energy"]);
        assert_eq!(titles(store.search("electrical")), vec!["Ohm's Law"]);
        assert_eq!(store.search("  ").len(), 4);
        assert_eq!(titles(store.filter_by_category("Mechanics")).len(), 2);
        assert_eq!(store.categories(), vec!["Electrical", "Mechanics"]);

        store.remove("ke").unwrap();
        assert!(store.get("ke").is_none());
        assert!(store.remove("ke").is_err());
    }

    #[test]
    fn test_import_export() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        store.add(calculator("a", "Alpha", None)).unwrap();

        let json = store.export_json("a").unwrap();
        assert!(store.import_json(&json).is_err(), "duplicate id must be rejected");

        let mut other = store_in(&dir);
        assert_eq!(other.import_json(&json).unwrap(), "a");

        let all = store.export_all_json().unwrap();
        let mut fresh = CalculatorStore::open(StoreConfig::new(dir.path().join("fresh.json"))).unwrap();
        assert_eq!(fresh.import_many_json(&all).unwrap(), vec!["a"]);

        // A batch with one bad document imports nothing
        let batch = format!("[{}, {{\"title\": \"broken\"}}]", json.replace("\"a\"", "\"b\""));
        let mut target = CalculatorStore::open(StoreConfig::new(dir.path().join("target.json"))).unwrap();
        assert!(target.import_many_json(&batch).is_err());
        assert!(target.is_empty());
    }

    #[test]
    fn test_resolve_explicit_path() {
        let config = StoreConfig::resolve(Some(PathBuf::from("/tmp/calcs.json"))).unwrap();
        assert_eq!(config.path, PathBuf::from("/tmp/calcs.json"));
    }
}
