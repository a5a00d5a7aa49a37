use crate::color::Color;
use log::{debug, trace};
use rand::{rngs::StdRng, SeedableRng};

/// Maximum number of pixels drawn from the image.
pub const SAMPLE_SIZE: usize = 1000;

/// Sampled pixels within this squared RGB distance of a chosen color are considered the same color and dropped.
///
/// This is an arbitrary tuning value; it does not adapt to the image.
pub const SIMILAR_COLOR_THRESHOLD: u32 = 100;

/// Picks representative colors from a random pixel sample by repeatedly taking its approximate medoid.
pub(crate) struct MedoidSampler {
    sample: Vec<Color>,
    max_colors: usize,
}

impl MedoidSampler {
    pub fn new(pixels: &[Color], max_colors: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let amount = pixels.len().min(SAMPLE_SIZE);

        let sample = rand::seq::index::sample(&mut rng, pixels.len(), amount)
            .into_iter()
            .map(|index| pixels[index])
            .collect();

        Self { sample, max_colors }
    }

    /// Returns at most `max_colors` colors, fewer if the sample runs out first.
    pub fn get_representative_colors(mut self) -> Vec<Color> {
        let mut colors = Vec::with_capacity(self.max_colors);

        while colors.len() < self.max_colors {
            let Some(medoid) = self.find_medoid() else {
                debug!("pixel sample exhausted after {} colors", colors.len());
                break;
            };

            colors.push(medoid);
            self.sample
                .retain(|pixel| pixel.distance_squared(medoid) > SIMILAR_COLOR_THRESHOLD);

            trace!("picked {}, {} sampled pixels left", medoid, self.sample.len());
        }

        colors
    }

    // the pixel with the smallest total squared distance to every other sampled pixel, first one on ties
    fn find_medoid(&self) -> Option<Color> {
        let mut best: Option<(u64, Color)> = None;

        for &candidate in &self.sample {
            let total = self
                .sample
                .iter()
                .map(|&other| candidate.distance_squared(other) as u64)
                .sum::<u64>();

            if best.map_or(true, |(best_total, _)| total < best_total) {
                best = Some((total, candidate));
            }
        }

        best.map(|(_, color)| color)
    }
}
