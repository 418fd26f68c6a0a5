//! JSON persistence of fetched records
//!
//! The JSON file is the only hand-off between the fetch and cluster stages.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use super::error::{Result, StarError};
use super::models::StarRecord;

/// File name the fetch stage writes for `username`
pub fn starred_repos_filename(username: &str) -> String {
    format!("{}_starred_repos.json", username)
}

/// Report path for an input file.
///
/// The prefix is the input file name up to its first underscore, so
/// `octocat_starred_repos.json` becomes `clustering_analysis_octocat.txt`.
/// The report lands next to the input.
pub fn report_filename(input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let prefix = name.split('_').next().unwrap_or_default();
    let file = format!("clustering_analysis_{}.txt", prefix);

    match input.parent() {
        Some(parent) => parent.join(file),
        None => PathBuf::from(file),
    }
}

/// Serialize records as a JSON array indented with four spaces
pub fn to_json(records: &[StarRecord]) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    records.serialize(&mut ser)?;
    String::from_utf8(buf).map_err(|e| StarError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

/// Save records to file path
pub fn save_records(path: &Path, records: &[StarRecord]) -> Result<()> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let json = to_json(records)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Load records written by [`save_records`]
pub fn load_records(path: &Path) -> Result<Vec<StarRecord>> {
    if !path.exists() {
        return Err(StarError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::RepoInfo;
    use tempfile::TempDir;

    fn sample_records() -> Vec<StarRecord> {
        let mut rust = RepoInfo::new("rust-lang/rust", &["compiler", "rust"]);
        rust.language = Some(serde_json::json!("Rust"));
        rust.stargazers_count = Some(serde_json::json!(100_000));

        let mut bare = RepoInfo::new("octocat/Spoon-Knife", &[]);
        bare.topics = None;
        bare.extra.insert("fork".to_string(), serde_json::json!(false));

        vec![
            StarRecord::new(rust, "2024-01-02T03:04:05Z"),
            StarRecord::new(bare, "2023-12-31T23:59:59Z"),
        ]
    }

    #[test]
    fn test_filenames() {
        assert_eq!(starred_repos_filename("octocat"), "octocat_starred_repos.json");
        assert_eq!(
            report_filename(Path::new("octocat_starred_repos.json")),
            PathBuf::from("clustering_analysis_octocat.txt")
        );
        assert_eq!(
            report_filename(Path::new("/data/runs/octocat_starred_repos.json")),
            PathBuf::from("/data/runs/clustering_analysis_octocat.txt")
        );
    }

    #[test]
    fn test_report_filename_without_underscore() {
        assert_eq!(
            report_filename(Path::new("stars.json")),
            PathBuf::from("clustering_analysis_stars.json.txt")
        );
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("octocat_starred_repos.json");
        let records = sample_records();

        save_records(&path, &records).unwrap();
        let loaded = load_records(&path).unwrap();

        assert_eq!(loaded, records);
        assert_eq!(loaded[0].repo.topic_list(), vec!["compiler", "rust"]);
        assert!(loaded[1].repo.topics.is_none());
    }

    #[test]
    fn test_json_is_indented_with_four_spaces() {
        let json = to_json(&sample_records()).unwrap();
        assert!(json.starts_with("[\n    {\n        \""));
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_records(Path::new("/nonexistent/octocat_starred_repos.json"));
        assert!(matches!(result, Err(StarError::FileNotFound { .. })));
    }

    #[test]
    fn test_load_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad_starred_repos.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_records(&path), Err(StarError::Json(_))));
    }
}
