//! Topic clustering of starred repositories
//!
//! Pipeline: load records → keep repositories with topics → TF-IDF →
//! k-means → per-cluster summaries → plain-text report.
//!
//! # Components
//!
//! - `vectorizer`: topic documents to L2-normalized TF-IDF rows
//! - `algorithms`: k-means with k-means++ seeding and restarts
//! - `report`: top terms per centroid and the report layout

pub mod algorithms;
pub mod report;
pub mod vectorizer;

use std::path::PathBuf;

pub use algorithms::{ClusterResult, ClusteringError, KMeans, SparseMatrix, SparseVector};
pub use report::{render_report, summarize, ClusterSummary};
pub use vectorizer::{TfidfMatrix, TfidfVectorizer};

use crate::core::config::AnalyzeConfig;
use crate::core::error::{Result, StarError};
use crate::core::models::StarRecord;
use crate::core::store::{load_records, report_filename};

/// A repository reduced to what clustering needs.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicDocument {
    pub full_name: String,
    pub topics: Vec<String>,
}

impl TopicDocument {
    /// Topics joined by single spaces
    pub fn text(&self) -> String {
        self.topics.join(" ")
    }
}

/// Flatten records to repositories, dropping those without topics.
pub fn topic_documents(records: &[StarRecord]) -> Vec<TopicDocument> {
    records
        .iter()
        .map(|record| TopicDocument {
            full_name: record.repo.full_name.clone(),
            topics: record.repo.topic_list(),
        })
        .filter(|doc| !doc.topics.is_empty())
        .collect()
}

/// Everything computed from one set of documents.
#[derive(Debug, Clone)]
pub struct Clustering {
    pub tfidf: TfidfMatrix,
    pub result: ClusterResult,
    pub summaries: Vec<ClusterSummary>,
}

/// Vectorize and cluster already-filtered documents.
///
/// Deterministic for a fixed `config.seed`.
pub fn cluster_documents(documents: &[TopicDocument], config: &AnalyzeConfig) -> Result<Clustering> {
    if documents.is_empty() {
        return Err(StarError::NoTopics);
    }

    let texts: Vec<String> = documents.iter().map(TopicDocument::text).collect();
    let tfidf = TfidfVectorizer::new(config.max_df, config.min_df).fit_transform(&texts)?;

    let result = KMeans::new(config.n_clusters)
        .with_max_iter(config.max_iter)
        .with_tolerance(config.tolerance)
        .with_n_init(config.n_init)
        .with_seed(config.seed)
        .fit(&tfidf.matrix)?;

    tracing::info!(
        clusters = result.n_clusters,
        inertia = result.inertia,
        iterations = result.n_iter,
        silhouette = ?result.silhouette_score,
        "k-means finished"
    );

    let names: Vec<String> = documents.iter().map(|d| d.full_name.clone()).collect();
    let summaries = summarize(&result, &tfidf.vocabulary, &names, config.top_terms);

    Ok(Clustering {
        tfidf,
        result,
        summaries,
    })
}

/// Outcome of a successful analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    /// Where the report was written
    pub output_path: PathBuf,
    /// Repositories in the input file
    pub total_repositories: usize,
    /// Repositories that had at least one topic
    pub clustered_repositories: usize,
    pub summaries: Vec<ClusterSummary>,
}

/// Run the full analysis and write `clustering_analysis_<prefix>.txt`
/// next to the input file.
///
/// # Errors
///
/// * `InvalidConfig` - cluster count or df bounds out of range
/// * `FileNotFound` - the input file does not exist
/// * `Json` - the input is not a list of star records
/// * `NoTopics` - no repository has a topic; nothing is written
/// * `Vectorize` / `Clustering` - degenerate input for TF-IDF or k-means
pub fn analyze(config: &AnalyzeConfig) -> Result<AnalysisReport> {
    config.validate()?;

    let records = load_records(&config.input)?;
    let documents = topic_documents(&records);
    tracing::info!(
        total = records.len(),
        with_topics = documents.len(),
        "loaded starred repositories"
    );

    if documents.is_empty() {
        return Err(StarError::NoTopics);
    }

    let clustering = cluster_documents(&documents, config)?;

    let output_path = report_filename(&config.input);
    std::fs::write(&output_path, render_report(&clustering.summaries))?;

    Ok(AnalysisReport {
        output_path,
        total_repositories: records.len(),
        clustered_repositories: documents.len(),
        summaries: clustering.summaries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::RepoInfo;

    fn record(name: &str, topics: &[&str]) -> StarRecord {
        StarRecord::new(RepoInfo::new(name, topics), "2024-01-01T00:00:00Z")
    }

    #[test]
    fn test_topic_documents_filters_empty() {
        let mut absent = record("c/none", &[]);
        absent.repo.topics = None;
        let records = vec![record("a/rust", &["rust", "cli"]), record("b/empty", &[]), absent];

        let docs = topic_documents(&records);

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].full_name, "a/rust");
        assert_eq!(docs[0].text(), "rust cli");
    }

    #[test]
    fn test_cluster_documents_separates_topics() {
        let docs: Vec<TopicDocument> = topic_documents(&[
            record("r/1", &["rust", "cli"]),
            record("r/2", &["rust", "cli"]),
            record("r/3", &["rust", "cli", "terminal"]),
            record("p/1", &["python", "django"]),
            record("p/2", &["python", "django"]),
            record("p/3", &["python", "django", "terminal"]),
        ]);
        let config = AnalyzeConfig::new("unused.json", 2);

        let clustering = cluster_documents(&docs, &config).unwrap();
        let labels = &clustering.result.labels;

        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[1], labels[2]);
        assert_eq!(labels[3], labels[4]);
        assert_eq!(labels[4], labels[5]);
        assert_ne!(labels[0], labels[3]);

        let rust_cluster = &clustering.summaries[labels[0]];
        assert_eq!(rust_cluster.members, vec!["r/1", "r/2", "r/3"]);
        assert!(rust_cluster.top_terms[..2].contains(&"rust".to_string()));
        assert!(rust_cluster.top_terms[..2].contains(&"cli".to_string()));
    }

    #[test]
    fn test_cluster_documents_empty() {
        let config = AnalyzeConfig::new("unused.json", 2);
        assert!(matches!(cluster_documents(&[], &config), Err(StarError::NoTopics)));
    }

    #[test]
    fn test_too_many_clusters() {
        let docs = topic_documents(&[
            record("a/1", &["rust"]),
            record("a/2", &["rust", "web"]),
            record("a/3", &["web"]),
        ]);
        let config = AnalyzeConfig::new("unused.json", 4);
        assert!(matches!(
            cluster_documents(&docs, &config),
            Err(StarError::Clustering(ClusteringError::InvalidParameters(_)))
        ));
    }
}
