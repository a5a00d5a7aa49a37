use crate::color::Color;
use log::{debug, trace};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::collections::HashMap;

/// Number of independently seeded k-means runs; the one with the lowest inertia wins.
pub const KMEANS_RESTARTS: usize = 10;
pub const KMEANS_MAX_ITERATIONS: usize = 300;
/// A run stops once the summed squared centroid movement of an iteration falls to this value.
pub const KMEANS_TOLERANCE: f64 = 1e-4;

type Point = [f64; 3];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Cluster {
    pub color: Color,
    pub population: u32,
}

/// Weighted k-means over the distinct colors of an image.
pub(crate) struct KMeansQuantizer {
    // distinct colors and how many pixels carry each one, sorted by packed RGB value
    colors: Vec<(Color, u32)>,
    max_colors: usize,
    seed: u64,
}

struct Run {
    centroids: Vec<Point>,
    assignments: Vec<usize>,
    inertia: f64,
}

impl KMeansQuantizer {
    pub fn new(pixels: &[Color], max_colors: usize, seed: u64) -> Self {
        let mut hist = HashMap::new();
        for pixel in pixels {
            *hist.entry(*pixel).or_insert(0u32) += 1;
        }

        // hash map iteration order is random, sort so every run sees the colors in the same order
        let mut colors = hist.into_iter().collect::<Vec<_>>();
        colors.sort_by_key(|(color, _)| pack(*color));

        debug!("{} pixels, {} distinct colors", pixels.len(), colors.len());

        Self {
            colors,
            max_colors,
            seed,
        }
    }

    /// Cluster the colors and return one cluster per centroid, most populous first.
    pub fn get_quantized_colors(self) -> Vec<Cluster> {
        if self.colors.len() <= self.max_colors {
            // no more distinct colors than requested, each one is its own cluster
            let mut clusters = self
                .colors
                .iter()
                .map(|&(color, population)| Cluster { color, population })
                .collect::<Vec<_>>();

            sort_by_population(&mut clusters);
            return clusters;
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut best: Option<Run> = None;

        for restart in 0..KMEANS_RESTARTS {
            let run = self.run(&mut rng);
            trace!("k-means restart {} finished with inertia {}", restart, run.inertia);

            if best.as_ref().map_or(true, |best| run.inertia < best.inertia) {
                best = Some(run);
            }
        }

        match best {
            Some(run) => {
                debug!("best k-means inertia {}", run.inertia);
                self.clusters_from_run(&run)
            }
            None => Vec::new(),
        }
    }

    fn run(&self, rng: &mut StdRng) -> Run {
        let mut centroids = self.seed_centroids(rng);
        let mut assignments = vec![0; self.colors.len()];

        for iteration in 0..KMEANS_MAX_ITERATIONS {
            self.assign(&centroids, &mut assignments);
            let updated = self.update_centroids(&centroids, &assignments);

            let shift: f64 = centroids
                .iter()
                .zip(&updated)
                .map(|(old, new)| distance_squared(old, new))
                .sum();
            centroids = updated;

            if shift <= KMEANS_TOLERANCE {
                trace!("k-means converged after {} iterations", iteration + 1);
                break;
            }
        }

        self.assign(&centroids, &mut assignments);
        let inertia = self.inertia(&centroids, &assignments);

        Run {
            centroids,
            assignments,
            inertia,
        }
    }

    /// k-means++: the first centroid is drawn by pixel count, every next one by pixel count times the squared distance
    /// to the closest centroid chosen so far.
    fn seed_centroids(&self, rng: &mut StdRng) -> Vec<Point> {
        let mut centroids = Vec::with_capacity(self.max_colors);

        let Some(first) = pick_weighted(rng, self.colors.iter().map(|(_, count)| *count as f64)) else {
            return centroids;
        };
        let first = to_point(self.colors[first].0);
        centroids.push(first);

        let mut closest = self
            .colors
            .iter()
            .map(|(color, _)| distance_squared(&to_point(*color), &first))
            .collect::<Vec<_>>();

        while centroids.len() < self.max_colors {
            let weights = self
                .colors
                .iter()
                .zip(&closest)
                .map(|((_, count), distance)| *count as f64 * distance);

            let Some(next) = pick_weighted(rng, weights) else {
                break;
            };
            let next = to_point(self.colors[next].0);
            centroids.push(next);

            for ((color, _), distance) in self.colors.iter().zip(closest.iter_mut()) {
                *distance = distance.min(distance_squared(&to_point(*color), &next));
            }
        }

        centroids
    }

    fn assign(&self, centroids: &[Point], assignments: &mut [usize]) {
        for ((color, _), assignment) in self.colors.iter().zip(assignments.iter_mut()) {
            *assignment = nearest(centroids, &to_point(*color));
        }
    }

    fn update_centroids(&self, centroids: &[Point], assignments: &[usize]) -> Vec<Point> {
        let mut sums = vec![[0.0; 3]; centroids.len()];
        let mut weights = vec![0.0; centroids.len()];

        for ((color, count), &cluster) in self.colors.iter().zip(assignments) {
            let point = to_point(*color);
            let count = *count as f64;

            for (sum, channel) in sums[cluster].iter_mut().zip(point) {
                *sum += channel * count;
            }
            weights[cluster] += count;
        }

        let mut reseeded = Vec::new();

        sums.iter()
            .zip(&weights)
            .map(|(sum, &weight)| {
                if weight > 0.0 {
                    [sum[0] / weight, sum[1] / weight, sum[2] / weight]
                } else {
                    // an empty cluster takes over the color that fits its current cluster worst
                    let farthest = self
                        .colors
                        .iter()
                        .zip(assignments)
                        .enumerate()
                        .filter(|(index, _)| !reseeded.contains(index))
                        .map(|(index, ((color, _), &cluster))| {
                            (index, distance_squared(&to_point(*color), &centroids[cluster]))
                        })
                        .max_by(|(_, lhs), (_, rhs)| lhs.total_cmp(rhs))
                        .map(|(index, _)| index)
                        .unwrap_or(0);

                    reseeded.push(farthest);
                    to_point(self.colors[farthest].0)
                }
            })
            .collect()
    }

    fn inertia(&self, centroids: &[Point], assignments: &[usize]) -> f64 {
        self.colors
            .iter()
            .zip(assignments)
            .map(|((color, count), &cluster)| *count as f64 * distance_squared(&to_point(*color), &centroids[cluster]))
            .sum()
    }

    fn clusters_from_run(&self, run: &Run) -> Vec<Cluster> {
        let mut populations = vec![0u32; run.centroids.len()];
        for ((_, count), &cluster) in self.colors.iter().zip(&run.assignments) {
            populations[cluster] += count;
        }

        let mut clusters = run
            .centroids
            .iter()
            .zip(populations)
            .filter(|(_, population)| *population > 0)
            .map(|(centroid, population)| Cluster {
                color: Color::new(
                    quantize_channel(centroid[0]),
                    quantize_channel(centroid[1]),
                    quantize_channel(centroid[2]),
                ),
                population,
            })
            .collect::<Vec<_>>();

        sort_by_population(&mut clusters);
        clusters
    }
}

/// Draw an index with probability proportional to its weight. Returns `None` when all weights are zero.
fn pick_weighted<I>(rng: &mut StdRng, weights: I) -> Option<usize>
where
    I: Iterator<Item = f64> + Clone,
{
    let total: f64 = weights.clone().sum();
    if total <= 0.0 {
        return None;
    }

    let target = rng.gen::<f64>() * total;
    let mut cumulative = 0.0;
    let mut last_positive = None;

    for (index, weight) in weights.enumerate() {
        if weight <= 0.0 {
            continue;
        }

        cumulative += weight;
        last_positive = Some(index);

        if cumulative > target {
            return Some(index);
        }
    }

    // floating point rounding can leave the target just past the cumulative sum
    last_positive
}

fn nearest(centroids: &[Point], point: &Point) -> usize {
    let mut best = 0;
    let mut best_distance = f64::INFINITY;

    for (index, centroid) in centroids.iter().enumerate() {
        let distance = distance_squared(centroid, point);
        if distance < best_distance {
            best = index;
            best_distance = distance;
        }
    }

    best
}

fn sort_by_population(clusters: &mut [Cluster]) {
    clusters.sort_by(|lhs, rhs| {
        rhs.population
            .cmp(&lhs.population)
            .then_with(|| pack(lhs.color).cmp(&pack(rhs.color)))
    });
}

fn to_point(color: Color) -> Point {
    let (r, g, b) = color.rgb();
    [r as f64, g as f64, b as f64]
}

fn distance_squared(lhs: &Point, rhs: &Point) -> f64 {
    lhs.iter().zip(rhs).map(|(l, r)| (l - r) * (l - r)).sum()
}

fn quantize_channel(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

// red is the most significant channel and blue the least
fn pack(color: Color) -> u32 {
    let (r, g, b) = color.rgb();
    ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}
