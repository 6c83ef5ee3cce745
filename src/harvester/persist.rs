use crate::{
    domain::ResultDocument,
    error::{Error, Result},
};
use std::{fs, path::Path};

/// Replaces the file at `path` with the pretty-printed document, creating
/// missing parent directories.
pub fn persist(document: &ResultDocument, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(document)?;

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| Error::Persistence {
            path: parent.to_owned(),
            source,
        })?;
    }

    fs::write(path, json).map_err(|source| Error::Persistence {
        path: path.to_owned(),
        source,
    })?;

    log::info!(
        "Saved {count} links to '{path}'",
        count = document.links.len(),
        path = path.display(),
    );

    Ok(())
}
