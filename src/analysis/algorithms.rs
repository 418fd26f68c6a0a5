//! Clustering Algorithms - K-means over sparse rows
//!
//! Pure Rust k-means with k-means++ seeding and multiple restarts.
//! Rows are sparse (a repository carries a handful of topics out of the whole
//! vocabulary) while centroids are dense.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

// =============================================================================
// Error Types
// =============================================================================

#[derive(Debug, Error)]
pub enum ClusteringError {
    #[error("Empty dataset")]
    EmptyDataset,

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

pub type ClusteringResult<T> = Result<T, ClusteringError>;

// =============================================================================
// Sparse Data
// =============================================================================

/// A sparse row: parallel column indices (ascending) and values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    pub indices: Vec<usize>,
    pub values: Vec<f32>,
}

impl SparseVector {
    /// Build from a dense slice, dropping zeros
    pub fn from_dense(dense: &[f32]) -> Self {
        let (indices, values) = dense
            .iter()
            .enumerate()
            .filter(|(_, &v)| v != 0.0)
            .map(|(i, &v)| (i, v))
            .unzip();
        Self { indices, values }
    }

    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    pub fn squared_norm(&self) -> f32 {
        self.values.iter().map(|v| v * v).sum()
    }

    /// Dot product with a dense vector
    pub fn dot_dense(&self, dense: &[f32]) -> f32 {
        self.indices
            .iter()
            .zip(self.values.iter())
            .map(|(&i, &v)| v * dense[i])
            .sum()
    }

    /// Dot product with another sparse row (both index lists ascending)
    pub fn dot(&self, other: &SparseVector) -> f32 {
        let (mut a, mut b) = (0, 0);
        let mut sum = 0.0;
        while a < self.nnz() && b < other.nnz() {
            match self.indices[a].cmp(&other.indices[b]) {
                std::cmp::Ordering::Less => a += 1,
                std::cmp::Ordering::Greater => b += 1,
                std::cmp::Ordering::Equal => {
                    sum += self.values[a] * other.values[b];
                    a += 1;
                    b += 1;
                }
            }
        }
        sum
    }

    pub fn to_dense(&self, n_features: usize) -> Vec<f32> {
        let mut dense = vec![0.0; n_features];
        for (&i, &v) in self.indices.iter().zip(self.values.iter()) {
            dense[i] = v;
        }
        dense
    }
}

/// Row-major sparse matrix with a fixed column count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseMatrix {
    pub rows: Vec<SparseVector>,
    pub n_cols: usize,
}

impl SparseMatrix {
    pub fn new(rows: Vec<SparseVector>, n_cols: usize) -> Self {
        Self { rows, n_cols }
    }

    pub fn from_dense(data: &[Vec<f32>]) -> ClusteringResult<Self> {
        let n_cols = data.first().map(|r| r.len()).unwrap_or(0);
        for row in data {
            if row.len() != n_cols {
                return Err(ClusteringError::DimensionMismatch {
                    expected: n_cols,
                    actual: row.len(),
                });
            }
        }
        Ok(Self {
            rows: data.iter().map(|r| SparseVector::from_dense(r)).collect(),
            n_cols,
        })
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Mean per-column variance, used to scale the convergence tolerance
    fn mean_variance(&self) -> f32 {
        let n = self.n_rows() as f64;
        if n == 0.0 || self.n_cols == 0 {
            return 0.0;
        }
        let mut sum = vec![0.0f64; self.n_cols];
        let mut sum_sq = vec![0.0f64; self.n_cols];
        for row in &self.rows {
            for (&i, &v) in row.indices.iter().zip(row.values.iter()) {
                sum[i] += v as f64;
                sum_sq[i] += (v as f64) * (v as f64);
            }
        }
        let total: f64 = sum
            .iter()
            .zip(sum_sq.iter())
            .map(|(s, sq)| (sq / n - (s / n).powi(2)).max(0.0))
            .sum();
        (total / self.n_cols as f64) as f32
    }
}

// =============================================================================
// Cluster Result
// =============================================================================

/// Result of a clustering operation.
#[derive(Debug, Clone)]
pub struct ClusterResult {
    /// Cluster label for each row
    pub labels: Vec<usize>,
    /// Dense cluster centroids
    pub centroids: Vec<Vec<f32>>,
    /// Number of clusters requested
    pub n_clusters: usize,
    /// Within-cluster sum of squares of the winning run
    pub inertia: f32,
    /// Lloyd iterations used by the winning run
    pub n_iter: usize,
    /// Silhouette score (-1 to 1, higher is better), skipped for large inputs
    pub silhouette_score: Option<f32>,
    /// Size of each cluster
    pub cluster_sizes: Vec<usize>,
}

impl ClusterResult {
    /// Get indices of rows in a specific cluster.
    pub fn get_cluster_indices(&self, cluster_id: usize) -> Vec<usize> {
        self.labels
            .iter()
            .enumerate()
            .filter(|(_, &label)| label == cluster_id)
            .map(|(i, _)| i)
            .collect()
    }
}

/// Above this many rows the O(n²) silhouette is skipped.
pub const SILHOUETTE_MAX_ROWS: usize = 5_000;

// =============================================================================
// K-Means Clustering
// =============================================================================

/// K-means clustering algorithm.
#[derive(Debug, Clone)]
pub struct KMeans {
    /// Number of clusters
    pub k: usize,
    /// Maximum Lloyd iterations per run
    pub max_iter: usize,
    /// Convergence tolerance, relative to the mean column variance
    pub tolerance: f32,
    /// Independent k-means++ initializations; the lowest inertia wins
    pub n_init: usize,
    /// Random seed for reproducibility
    pub seed: u64,
}

impl Default for KMeans {
    fn default() -> Self {
        Self {
            k: 8,
            max_iter: 300,
            tolerance: 1e-4,
            n_init: 10,
            seed: 42,
        }
    }
}

/// Outcome of a single initialization.
struct Run {
    labels: Vec<usize>,
    centroids: Vec<Vec<f32>>,
    inertia: f32,
    n_iter: usize,
}

impl KMeans {
    pub fn new(k: usize) -> Self {
        Self {
            k,
            ..Default::default()
        }
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_n_init(mut self, n_init: usize) -> Self {
        self.n_init = n_init;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Perform K-means clustering.
    pub fn fit(&self, data: &SparseMatrix) -> ClusteringResult<ClusterResult> {
        if data.rows.is_empty() {
            return Err(ClusteringError::EmptyDataset);
        }

        let n_samples = data.n_rows();

        if self.k == 0 {
            return Err(ClusteringError::InvalidParameters(
                "k must be at least 1".to_string(),
            ));
        }

        if self.k > n_samples {
            return Err(ClusteringError::InvalidParameters(format!(
                "n_samples={} should be >= n_clusters={}",
                n_samples, self.k
            )));
        }

        if self.n_init == 0 || self.max_iter == 0 {
            return Err(ClusteringError::InvalidParameters(
                "n_init and max_iter must be at least 1".to_string(),
            ));
        }

        for row in &data.rows {
            if let Some(&max) = row.indices.iter().max() {
                if max >= data.n_cols {
                    return Err(ClusteringError::DimensionMismatch {
                        expected: data.n_cols,
                        actual: max + 1,
                    });
                }
            }
        }

        let norms: Vec<f32> = data.rows.iter().map(|r| r.squared_norm()).collect();
        let tol = data.mean_variance() * self.tolerance;
        let mut rng = StdRng::seed_from_u64(self.seed);

        let mut best: Option<Run> = None;
        for _ in 0..self.n_init {
            let centroids = self.initialize_centroids_plusplus(data, &norms, &mut rng);
            let run = self.lloyd(data, &norms, centroids, tol);
            if best.as_ref().map_or(true, |b| run.inertia < b.inertia) {
                best = Some(run);
            }
        }

        let Run {
            labels,
            centroids,
            inertia,
            n_iter,
        } = best.ok_or(ClusteringError::EmptyDataset)?;

        // Calculate cluster sizes
        let mut cluster_sizes = vec![0usize; self.k];
        for &label in &labels {
            cluster_sizes[label] += 1;
        }

        let silhouette_score = if n_samples <= SILHOUETTE_MAX_ROWS {
            Some(silhouette(data, &norms, &labels, self.k))
        } else {
            None
        };

        Ok(ClusterResult {
            labels,
            centroids,
            n_clusters: self.k,
            inertia,
            n_iter,
            silhouette_score,
            cluster_sizes,
        })
    }

    /// Greedy k-means++ seeding.
    ///
    /// Each new centroid is the best of `2 + ln(k)` candidates drawn with
    /// probability proportional to squared distance from the chosen set.
    fn initialize_centroids_plusplus(
        &self,
        data: &SparseMatrix,
        norms: &[f32],
        rng: &mut StdRng,
    ) -> Vec<Vec<f32>> {
        let n_samples = data.n_rows();
        let n_local_trials = 2 + (self.k as f64).ln() as usize;
        let mut centroids = Vec::with_capacity(self.k);

        // First centroid: random point
        let first = rng.gen_range(0..n_samples);
        centroids.push(data.rows[first].to_dense(data.n_cols));

        let mut closest: Vec<f32> = (0..n_samples)
            .map(|i| sq_distance_rows(&data.rows[i], norms[i], &data.rows[first], norms[first]))
            .collect();
        let mut potential: f32 = closest.iter().sum();

        for _ in 1..self.k {
            let cumulative: Vec<f32> = closest
                .iter()
                .scan(0.0f32, |acc, &d| {
                    *acc += d;
                    Some(*acc)
                })
                .collect();

            let mut best_candidate = 0;
            let mut best_potential = f32::INFINITY;
            let mut best_closest = Vec::new();

            for _ in 0..n_local_trials {
                let threshold = rng.gen::<f32>() * potential;
                let candidate = cumulative
                    .partition_point(|&c| c < threshold)
                    .min(n_samples - 1);

                let candidate_closest: Vec<f32> = (0..n_samples)
                    .map(|i| {
                        let d = sq_distance_rows(
                            &data.rows[i],
                            norms[i],
                            &data.rows[candidate],
                            norms[candidate],
                        );
                        d.min(closest[i])
                    })
                    .collect();
                let candidate_potential: f32 = candidate_closest.iter().sum();

                if candidate_potential < best_potential {
                    best_potential = candidate_potential;
                    best_candidate = candidate;
                    best_closest = candidate_closest;
                }
            }

            centroids.push(data.rows[best_candidate].to_dense(data.n_cols));
            closest = best_closest;
            potential = best_potential;
        }

        centroids
    }

    /// Lloyd iterations from the given seeds.
    fn lloyd(&self, data: &SparseMatrix, norms: &[f32], mut centroids: Vec<Vec<f32>>, tol: f32) -> Run {
        let n_samples = data.n_rows();
        let mut labels = vec![usize::MAX; n_samples];
        let mut distances = vec![0.0f32; n_samples];
        let mut n_iter = 0;

        for iteration in 0..self.max_iter {
            n_iter = iteration + 1;

            // Assign points to nearest centroid
            let centroid_norms: Vec<f32> = centroids.iter().map(|c| dense_sq_norm(c)).collect();
            let mut changed = false;
            for (i, row) in data.rows.iter().enumerate() {
                let (nearest, dist) = find_nearest_centroid(row, norms[i], &centroids, &centroid_norms);
                if labels[i] != nearest {
                    changed = true;
                }
                labels[i] = nearest;
                distances[i] = dist;
            }

            if !changed {
                break;
            }

            // Update centroids
            let mut new_centroids = self.compute_centroids(data, &labels);
            self.relocate_empty_clusters(data, &labels, &distances, &mut new_centroids);

            let shift: f32 = centroids
                .iter()
                .zip(new_centroids.iter())
                .map(|(old, new)| euclidean_distance(old, new).powi(2))
                .sum();
            centroids = new_centroids;

            if shift <= tol {
                break;
            }
        }

        // Final assignment against the final centroids
        let centroid_norms: Vec<f32> = centroids.iter().map(|c| dense_sq_norm(c)).collect();
        let mut inertia = 0.0;
        for (i, row) in data.rows.iter().enumerate() {
            let (nearest, dist) = find_nearest_centroid(row, norms[i], &centroids, &centroid_norms);
            labels[i] = nearest;
            inertia += dist;
        }

        Run {
            labels,
            centroids,
            inertia,
            n_iter,
        }
    }

    fn compute_centroids(&self, data: &SparseMatrix, labels: &[usize]) -> Vec<Vec<f32>> {
        let mut sums = vec![vec![0.0f32; data.n_cols]; self.k];
        let mut counts = vec![0usize; self.k];

        for (row, &label) in data.rows.iter().zip(labels.iter()) {
            counts[label] += 1;
            for (&i, &v) in row.indices.iter().zip(row.values.iter()) {
                sums[label][i] += v;
            }
        }

        sums.into_iter()
            .zip(counts.iter())
            .map(|(sum, &count)| {
                if count > 0 {
                    sum.into_iter().map(|v| v / count as f32).collect()
                } else {
                    sum
                }
            })
            .collect()
    }

    /// Move each empty cluster onto the point farthest from its own centroid.
    fn relocate_empty_clusters(
        &self,
        data: &SparseMatrix,
        labels: &[usize],
        distances: &[f32],
        centroids: &mut [Vec<f32>],
    ) {
        let mut counts = vec![0usize; self.k];
        for &label in labels {
            counts[label] += 1;
        }

        let empty: Vec<usize> = (0..self.k).filter(|&c| counts[c] == 0).collect();
        if empty.is_empty() {
            return;
        }

        let mut far: Vec<usize> = (0..data.n_rows()).collect();
        far.sort_by(|&a, &b| distances[b].total_cmp(&distances[a]).then(a.cmp(&b)));

        for (cluster, &point) in empty.iter().zip(far.iter()) {
            centroids[*cluster] = data.rows[point].to_dense(data.n_cols);
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn dense_sq_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum()
}

/// Nearest centroid by squared Euclidean distance; ties go to the lower index.
fn find_nearest_centroid(
    row: &SparseVector,
    row_norm: f32,
    centroids: &[Vec<f32>],
    centroid_norms: &[f32],
) -> (usize, f32) {
    let mut best = (0, f32::INFINITY);
    for (c, (centroid, &c_norm)) in centroids.iter().zip(centroid_norms.iter()).enumerate() {
        let dist = (row_norm + c_norm - 2.0 * row.dot_dense(centroid)).max(0.0);
        if dist < best.1 {
            best = (c, dist);
        }
    }
    best
}

fn sq_distance_rows(a: &SparseVector, a_norm: f32, b: &SparseVector, b_norm: f32) -> f32 {
    (a_norm + b_norm - 2.0 * a.dot(b)).max(0.0)
}

/// Mean silhouette coefficient over all rows.
fn silhouette(data: &SparseMatrix, norms: &[f32], labels: &[usize], k: usize) -> f32 {
    let n = data.n_rows();
    if n <= 1 || k <= 1 {
        return 0.0;
    }

    let mut total_score = 0.0;
    let mut valid_points = 0;

    for i in 0..n {
        let mut sums = vec![0.0f32; k];
        let mut counts = vec![0usize; k];
        for j in 0..n {
            if i == j {
                continue;
            }
            let d = sq_distance_rows(&data.rows[i], norms[i], &data.rows[j], norms[j]).sqrt();
            sums[labels[j]] += d;
            counts[labels[j]] += 1;
        }

        // Singleton clusters score 0
        let own = labels[i];
        if counts[own] == 0 {
            valid_points += 1;
            continue;
        }
        let a_i = sums[own] / counts[own] as f32;

        let b_i = (0..k)
            .filter(|&c| c != own && counts[c] > 0)
            .map(|c| sums[c] / counts[c] as f32)
            .fold(f32::INFINITY, f32::min);

        if b_i == f32::INFINITY {
            continue;
        }

        let s_i = (b_i - a_i) / a_i.max(b_i);
        if !s_i.is_nan() {
            total_score += s_i;
        }
        valid_points += 1;
    }

    if valid_points > 0 {
        total_score / valid_points as f32
    } else {
        0.0
    }
}

/// Calculate Euclidean distance between two dense vectors.
pub fn euclidean_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f32>()
        .sqrt()
}

// =============================================================================
// Tests
// =============================================================================
