//! Export and import of a user's locations on the command line.

use std::{
    fs,
    io::{self, Write as _},
    path::Path,
};

use anyhow::{bail, Context as _, Result};
use lonb_application::{
    prelude as flows,
    storage::{Storage, StorageSource},
};
use lonb_core::usecases::ImportSummary;
use lonb_webserver::json::{self, from_json};

fn ensure_persistent(storage: &Storage) -> Result<()> {
    if storage.source() == StorageSource::Memory {
        bail!("No primary store available");
    }
    Ok(())
}

/// Writes all locations of a user as a JSON array to the file or stdout.
pub fn export(storage: &Storage, user_id: &str, output: Option<&Path>) -> Result<usize> {
    ensure_persistent(storage)?;
    let locations: Vec<json::Location> = flows::export_locations(storage, user_id)?
        .into_iter()
        .map(json::Location::from)
        .collect();
    let document = serde_json::to_string_pretty(&locations)?;
    match output {
        Some(path) => fs::write(path, document)
            .with_context(|| format!("Unable to write {}", path.display()))?,
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{document}")?;
        }
    }
    Ok(locations.len())
}

pub fn import(storage: &Storage, user_id: &str, file: &Path) -> Result<ImportSummary> {
    ensure_persistent(storage)?;
    let document =
        fs::read_to_string(file).with_context(|| format!("Unable to read {}", file.display()))?;
    let entries: Vec<json::ImportLocation> =
        serde_json::from_str(&document).context("Invalid data format")?;
    let entries = entries.into_iter().map(from_json::import_location).collect();
    let summary = flows::import_locations(storage, user_id, entries)?;
    Ok(summary)
}
