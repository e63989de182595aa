//! Bulk import of official restroom datasets exported as CSV.

mod parser;

use std::io::Read;
use std::path::Path;

use tracing::{debug, info};

use super::repository::LocationRepository;
use crate::repository::RepositoryError;
use parser::{PlaceRecord, RowError};

#[derive(Debug)]
pub enum PlaceImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidRow { line: usize, reason: String },
    Repository(RepositoryError),
}

impl std::fmt::Display for PlaceImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlaceImportError::Io(err) => write!(f, "failed to read place dataset: {}", err),
            PlaceImportError::Csv(err) => write!(f, "invalid place CSV data: {}", err),
            PlaceImportError::InvalidRow { line, reason } => {
                write!(f, "invalid place on line {}: {}", line, reason)
            }
            PlaceImportError::Repository(err) => {
                write!(f, "could not store imported place: {}", err)
            }
        }
    }
}

impl std::error::Error for PlaceImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PlaceImportError::Io(err) => Some(err),
            PlaceImportError::Csv(err) => Some(err),
            PlaceImportError::InvalidRow { .. } => None,
            PlaceImportError::Repository(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for PlaceImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<RowError> for PlaceImportError {
    fn from(err: RowError) -> Self {
        match err {
            RowError::Csv(err) => Self::Csv(err),
            RowError::Invalid { line, reason } => Self::InvalidRow { line, reason },
        }
    }
}

impl From<RepositoryError> for PlaceImportError {
    fn from(err: RepositoryError) -> Self {
        Self::Repository(err)
    }
}

/// Counts of what an import run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub refreshed: usize,
}

/// Loads official place datasets into the base and merged location tables.
///
/// Rows carrying a `(source_name, source_id)` pair already present refresh that base row;
/// everything else becomes a new API-sourced location. The whole file is validated before the
/// first write, so a bad row leaves the store untouched.
pub struct PlaceImporter;

impl PlaceImporter {
    pub fn from_path<R, P>(repository: &R, path: P) -> Result<ImportSummary, PlaceImportError>
    where
        R: LocationRepository,
        P: AsRef<Path>,
    {
        let file = std::fs::File::open(path)?;
        Self::from_reader(repository, file)
    }

    pub fn from_reader<R, Rd>(repository: &R, reader: Rd) -> Result<ImportSummary, PlaceImportError>
    where
        R: LocationRepository,
        Rd: Read,
    {
        let records = parser::parse_records(reader)?;
        let mut summary = ImportSummary::default();

        for record in records {
            apply_record(repository, record, &mut summary)?;
        }

        info!(
            imported = summary.imported,
            refreshed = summary.refreshed,
            "place dataset import finished"
        );
        Ok(summary)
    }
}

fn apply_record<R: LocationRepository>(
    repository: &R,
    record: PlaceRecord,
    summary: &mut ImportSummary,
) -> Result<(), RepositoryError> {
    let PlaceRecord { line, draft } = record;

    if let (Some(source_name), Some(source_id)) = (&draft.source_name, &draft.source_id) {
        if let Some(existing) = repository.find_base_by_source(source_name, source_id)? {
            repository.refresh_base(existing.base_id, &draft)?;
            summary.refreshed += 1;
            debug!(line, %source_name, %source_id, "refreshed base location");
            return Ok(());
        }
    }

    let location_id = repository.create_from_base(&draft)?;
    summary.imported += 1;
    debug!(line, %location_id, "imported base location");
    Ok(())
}
