//! Cluster summaries and the plain-text report

use std::fmt::Write;

use super::algorithms::ClusterResult;

/// Width of the rule printed after each cluster section
const RULE_WIDTH: usize = 50;

/// Representative terms and members of one cluster.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterSummary {
    /// Zero-based cluster id (printed one-based)
    pub id: usize,
    /// Highest-weighted vocabulary terms of the centroid, descending
    pub top_terms: Vec<String>,
    /// `full_name` of every repository assigned here, in input order
    pub members: Vec<String>,
}

/// Indices of the `n` largest weights, descending; ties keep column order.
pub fn top_term_indices(weights: &[f32], n: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..weights.len()).collect();
    order.sort_by(|&a, &b| weights[b].total_cmp(&weights[a]).then(a.cmp(&b)));
    order.truncate(n);
    order
}

/// Build one summary per cluster id, in id order.
pub fn summarize(
    result: &ClusterResult,
    vocabulary: &[String],
    names: &[String],
    top_terms: usize,
) -> Vec<ClusterSummary> {
    (0..result.n_clusters)
        .map(|id| {
            let top_terms = result
                .centroids
                .get(id)
                .map(|centroid| {
                    top_term_indices(centroid, top_terms)
                        .into_iter()
                        .map(|i| vocabulary[i].clone())
                        .collect()
                })
                .unwrap_or_default();

            let members = result
                .get_cluster_indices(id)
                .into_iter()
                .map(|row| names[row].clone())
                .collect();

            ClusterSummary {
                id,
                top_terms,
                members,
            }
        })
        .collect()
}

/// Render the report text.
///
/// ```text
/// Clustering complete. Found 2 clusters:
///
/// --- Cluster 1 ---
/// Most common topics:
///   rust, cli
///
/// Repositories in this cluster:
///   - owner/name
///
/// ==================================================
/// ```
pub fn render_report(summaries: &[ClusterSummary]) -> String {
    let mut out = String::new();
    let _ = write!(out, "Clustering complete. Found {} clusters:\n\n", summaries.len());

    for summary in summaries {
        let _ = writeln!(out, "--- Cluster {} ---", summary.id + 1);
        out.push_str("Most common topics:\n");
        let _ = writeln!(out, "  {}", summary.top_terms.join(", "));

        out.push_str("\nRepositories in this cluster:\n");
        for name in &summary.members {
            let _ = writeln!(out, "  - {}", name);
        }
        let _ = writeln!(out, "\n{}", "=".repeat(RULE_WIDTH));
    }

    out
}
