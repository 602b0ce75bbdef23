//! CSV Data Loader Module
//! Reads the yearly indicator CSV into a `Dataset` using Polars.

use crate::data::{Dataset, Record};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Columns every input file must carry.
pub const LOCATION_COL: &str = "location";
pub const TIME_COL: &str = "time";
pub const FERTILITY_COL: &str = "fertility_rate";
pub const LIFE_EXPECTANCY_COL: &str = "life_expectancy";
pub const POPULATION_COL: &str = "pop_mlns";

pub const REQUIRED_COLUMNS: [&str; 5] = [
    LOCATION_COL,
    TIME_COL,
    FERTILITY_COL,
    LIFE_EXPECTANCY_COL,
    POPULATION_COL,
];

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    Csv(#[from] PolarsError),
    #[error("Missing required column: {0}")]
    MissingColumn(String),
    #[error("No data loaded")]
    NoData,
}

/// Loads the dataset once and keeps it shared for the session.
pub struct DataLoader {
    dataset: Option<Arc<Dataset>>,
    file_path: Option<PathBuf>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self {
            dataset: None,
            file_path: None,
        }
    }

    /// Read a CSV file into a `Dataset` without touching loader state.
    ///
    /// Rows with a missing or unparsable required field are skipped.
    pub fn read_csv(file_path: &Path) -> Result<Dataset, LoaderError> {
        debug!(path = %file_path.display(), "reading csv");

        let df = LazyCsvReader::new(file_path)
            .with_infer_schema_length(Some(10000))
            .with_ignore_errors(true)
            .finish()?
            .collect()?;

        let dataset = Self::dataset_from_frame(&df)?;
        info!(
            path = %file_path.display(),
            rows = df.height(),
            records = dataset.len(),
            "dataset loaded"
        );
        Ok(dataset)
    }

    /// Convert a loaded DataFrame into records, in row order.
    pub fn dataset_from_frame(df: &DataFrame) -> Result<Dataset, LoaderError> {
        let present: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        if let Some(missing) = REQUIRED_COLUMNS
            .iter()
            .find(|name| !present.iter().any(|p| p == *name))
        {
            return Err(LoaderError::MissingColumn(missing.to_string()));
        }

        let location = df.column(LOCATION_COL)?.cast(&DataType::String)?;
        let time = df.column(TIME_COL)?.cast(&DataType::Int64)?;
        let fertility = df.column(FERTILITY_COL)?.cast(&DataType::Float64)?;
        let life = df.column(LIFE_EXPECTANCY_COL)?.cast(&DataType::Float64)?;
        let pop = df.column(POPULATION_COL)?.cast(&DataType::Float64)?;

        let location = location.str()?;
        let time = time.i64()?;
        let fertility = fertility.f64()?;
        let life = life.f64()?;
        let pop = pop.f64()?;

        let mut records = Vec::with_capacity(df.height());
        let mut skipped = 0usize;

        for i in 0..df.height() {
            match (
                location.get(i),
                time.get(i),
                fertility.get(i),
                life.get(i),
                pop.get(i),
            ) {
                (Some(loc), Some(t), Some(f), Some(l), Some(p)) => records.push(Record {
                    location: loc.to_string(),
                    time: t,
                    fertility_rate: f,
                    life_expectancy: l,
                    pop_mlns: p,
                }),
                _ => skipped += 1,
            }
        }

        if skipped > 0 {
            warn!(skipped, "rows with missing fields were skipped");
        }
        if records.is_empty() {
            return Err(LoaderError::NoData);
        }

        Ok(Dataset::new(records))
    }

    /// Get a shared handle to the loaded dataset.
    pub fn get_dataset(&self) -> Option<Arc<Dataset>> {
        self.dataset.clone()
    }

    /// Get file path.
    pub fn get_file_path(&self) -> Option<&PathBuf> {
        self.file_path.as_ref()
    }

    /// Set the dataset directly (used for background loading).
    pub fn set_dataset(&mut self, dataset: Dataset, file_path: PathBuf) {
        self.dataset = Some(Arc::new(dataset));
        self.file_path = Some(file_path);
    }
}
