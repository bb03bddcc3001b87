//! Corpus discovery: turns a directory of reports into [`Document`]s.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::document::Document;
use crate::error::{RagError, Result};

/// Load every file under `root` whose extension is in `extensions`.
///
/// Files are visited recursively and returned sorted by their path relative
/// to `root`, which also becomes the document ID. A missing root yields an
/// empty corpus rather than an error so that a dashboard without reports can
/// still start. Files that cannot be read are skipped.
///
/// # Errors
///
/// Returns [`RagError::Ingestion`] if `root` exists but is not a directory.
pub fn load_documents(root: impl AsRef<Path>, extensions: &[String]) -> Result<Vec<Document>> {
    let root = root.as_ref();
    if !root.exists() {
        warn!(path = %root.display(), "report directory not found, corpus is empty");
        return Ok(Vec::new());
    }
    if !root.is_dir() {
        return Err(RagError::Ingestion(format!("'{}' is not a directory", root.display())));
    }

    let mut paths = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| {
            entry
                .inspect_err(|e| warn!(error = %e, "skipping unreadable report path"))
                .ok()
        })
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| has_extension(entry.path(), extensions))
        .map(|entry| entry.into_path())
        .collect::<Vec<_>>();
    paths.sort();

    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping unreadable report");
                continue;
            }
        };
        let text = String::from_utf8_lossy(&bytes).into_owned();

        let id = path
            .strip_prefix(root)
            .unwrap_or(&path)
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        let mut metadata = HashMap::new();
        metadata.insert("source".to_string(), path.display().to_string());
        if let Some(name) = path.file_name() {
            metadata.insert("file_name".to_string(), name.to_string_lossy().into_owned());
        }

        debug!(document.id = %id, bytes = bytes.len(), "loaded report");
        documents.push(Document {
            id,
            text,
            metadata,
            source_uri: Some(format!("file://{}", path.display())),
        });
    }

    Ok(documents)
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy())
        .is_some_and(|ext| extensions.iter().any(|wanted| wanted.eq_ignore_ascii_case(&ext)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn txt() -> Vec<String> {
        vec!["txt".to_string()]
    }

    #[test]
    fn loads_only_text_reports_recursively() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("premier_league")).unwrap();
        fs::write(root.join("saka.txt"), "Bukayo Saka is a right winger.").unwrap();
        fs::write(root.join("premier_league/rice.TXT"), "Declan Rice anchors midfield.").unwrap();
        fs::write(root.join("notes.md"), "ignored").unwrap();
        fs::write(root.join("photo.png"), [0u8, 1, 2]).unwrap();

        let documents = load_documents(root, &txt()).unwrap();
        let ids: Vec<_> = documents.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["premier_league/rice.TXT", "saka.txt"]);
        assert_eq!(documents[1].text, "Bukayo Saka is a right winger.");
        assert_eq!(documents[1].metadata.get("file_name").map(String::as_str), Some("saka.txt"));
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_subdirectory_does_not_stop_loading() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        let locked = root.join("locked");
        fs::create_dir(&locked).unwrap();
        fs::write(locked.join("hidden.txt"), "Confidential report.").unwrap();
        fs::write(root.join("saka.txt"), "Bukayo Saka is a right winger.").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        let result = load_documents(root, &txt());
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        let documents = result.unwrap();
        assert!(documents.iter().any(|d| d.id == "saka.txt"));
    }

    #[test]
    fn missing_directory_is_an_empty_corpus() {
        let temp = tempfile::tempdir().unwrap();
        let documents = load_documents(temp.path().join("articles"), &txt()).unwrap();
        assert!(documents.is_empty());
    }

    #[test]
    fn file_path_is_rejected() {
        let temp = tempfile::tempdir().unwrap();
        let file = temp.path().join("report.txt");
        fs::write(&file, "text").unwrap();
        assert!(matches!(load_documents(&file, &txt()), Err(RagError::Ingestion(_))));
    }
}
