//! A library to extract dominant colors from an image and derive color harmony palettes from them.
//!
//! Dominant colors are found by clustering the image's pixels in RGB space with a fixed seed, so the same image always
//! yields the same colors. Palettes (monochromatic, analogous, complementary, triadic and tetradic) are derived from the
//! most dominant color by deterministic rules on the HSV color wheel.
//!
//! ```no_run
//! use image_color_scheme::{generate_palette, ColorExtractor, PaletteType};
//!
//! let colors = ColorExtractor::open("photo.jpg")?.num_colors(6).extract()?;
//! let palette = generate_palette(&colors, PaletteType::Complementary, 5)?;
//!
//! for color in palette {
//!     println!("{}", color.hex());
//! }
//! # Ok::<(), image_color_scheme::Error>(())
//! ```

mod color;
mod error;
mod harmony;
mod kmeans;
mod sampling;

pub const DEFAULT_NUM_COLORS: usize = 5;
pub const DEFAULT_MAX_SIZE: u32 = 200;
pub const DEFAULT_SEED: u64 = 42;

pub use crate::{
    color::Color,
    error::{Error, Result},
    harmony::{generate_palette, PaletteType},
    kmeans::{KMEANS_MAX_ITERATIONS, KMEANS_RESTARTS, KMEANS_TOLERANCE},
    sampling::{SAMPLE_SIZE, SIMILAR_COLOR_THRESHOLD},
};
pub use image;
pub use palette;

use image::{ImageBuffer, Rgb};
use kmeans::KMeansQuantizer;
use log::debug;
use sampling::MedoidSampler;
use std::{fmt, path::Path, str::FromStr};

/// The clustering used to pick dominant colors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum ExtractionMethod {
    /// Seeded k-means over all pixels. Colors are ordered by cluster size, largest first.
    #[default]
    KMeans,
    /// Repeated medoid picks over a random sample of at most [`SAMPLE_SIZE`] pixels. May return fewer colors than
    /// requested when the sample holds few distinct colors.
    Sampling,
}

impl FromStr for ExtractionMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kmeans" | "k-means" => Ok(ExtractionMethod::KMeans),
            "sampling" => Ok(ExtractionMethod::Sampling),
            _ => Err(Error::UnknownExtractionMethod(s.to_string())),
        }
    }
}

impl fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionMethod::KMeans => f.pad("kmeans"),
            ExtractionMethod::Sampling => f.pad("sampling"),
        }
    }
}

pub struct ColorExtractor<P>
where
    P: image::Pixel<Subpixel = u8> + 'static,
{
    image: ImageBuffer<P, Vec<<P as image::Pixel>::Subpixel>>,
    num_colors: usize,
    resize: bool,
    max_size: u32,
    seed: u64,
    method: ExtractionMethod,
}

impl ColorExtractor<Rgb<u8>> {
    /// Decode an image file. Images in any other color mode are converted to 8-bit RGB.
    pub fn open<T>(path: T) -> Result<Self>
    where
        T: AsRef<Path>,
    {
        let path = path.as_ref();
        let image = image::open(path).map_err(|source| Error::Image {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self::from_image(image.to_rgb8()))
    }
}

impl<P> ColorExtractor<P>
where
    P: image::Pixel<Subpixel = u8> + 'static,
{
    pub fn from_image(image: ImageBuffer<P, Vec<<P as image::Pixel>::Subpixel>>) -> Self {
        Self {
            image,
            num_colors: DEFAULT_NUM_COLORS,
            resize: true,
            max_size: DEFAULT_MAX_SIZE,
            seed: DEFAULT_SEED,
            method: ExtractionMethod::default(),
        }
    }

    pub fn num_colors(self, num_colors: usize) -> Self {
        Self { num_colors, ..self }
    }

    /// Whether to downscale images larger than the maximum size before clustering. Enabled by default.
    pub fn resize(self, resize: bool) -> Self {
        Self { resize, ..self }
    }

    /// The largest allowed width or height when resizing. Zero disables resizing.
    pub fn max_size(self, max_size: u32) -> Self {
        Self { max_size, ..self }
    }

    pub fn seed(self, seed: u64) -> Self {
        Self { seed, ..self }
    }

    pub fn method(self, method: ExtractionMethod) -> Self {
        Self { method, ..self }
    }

    /// Extract the dominant colors, at most the configured number of them.
    pub fn extract(mut self) -> Result<Vec<Color>> {
        if self.num_colors == 0 {
            return Err(Error::InvalidColorCount);
        }

        if self.image.width() == 0 || self.image.height() == 0 {
            return Err(Error::EmptyImage);
        }

        if self.resize {
            self.scale_image_down();
        }

        let pixels = self.image.pixels().map(pixel_to_color).collect::<Vec<_>>();
        quantize(&pixels, self.num_colors, self.seed, self.method)
    }

    fn scale_image_down(&mut self) -> bool {
        let (width, height) = self.image.dimensions();

        let Some((new_width, new_height)) = scaled_dimensions(width, height, self.max_size) else {
            return false;
        };

        debug!("resizing {}x{} image to {}x{}", width, height, new_width, new_height);
        self.image = image::imageops::resize(
            &self.image,
            new_width,
            new_height,
            image::imageops::FilterType::Lanczos3,
        );

        true
    }
}

/// Extract up to `num_colors` dominant colors from an image with the default seed and k-means.
///
/// When `resize` is set, an image wider or taller than `max_size` is first scaled down so its larger side equals
/// `max_size`.
pub fn extract_colors<P>(
    image: &ImageBuffer<P, Vec<<P as image::Pixel>::Subpixel>>,
    num_colors: usize,
    resize: bool,
    max_size: u32,
) -> Result<Vec<Color>>
where
    P: image::Pixel<Subpixel = u8> + 'static,
{
    ColorExtractor::from_image(image.clone())
        .num_colors(num_colors)
        .resize(resize)
        .max_size(max_size)
        .extract()
}

/// Decode an image file and extract up to `num_colors` dominant colors with the default settings.
pub fn extract_colors_from_path<T>(path: T, num_colors: usize) -> Result<Vec<Color>>
where
    T: AsRef<Path>,
{
    ColorExtractor::open(path)?.num_colors(num_colors).extract()
}

/// Extract up to `num_colors` dominant colors from already decoded RGB pixels.
pub fn extract_colors_from_pixels(pixels: &[[u8; 3]], num_colors: usize) -> Result<Vec<Color>> {
    let pixels = pixels.iter().copied().map(Color::from).collect::<Vec<_>>();
    quantize(&pixels, num_colors, DEFAULT_SEED, ExtractionMethod::KMeans)
}

fn quantize(pixels: &[Color], num_colors: usize, seed: u64, method: ExtractionMethod) -> Result<Vec<Color>> {
    if num_colors == 0 {
        return Err(Error::InvalidColorCount);
    }

    if pixels.is_empty() {
        return Err(Error::EmptyImage);
    }

    let colors = match method {
        ExtractionMethod::KMeans => KMeansQuantizer::new(pixels, num_colors, seed)
            .get_quantized_colors()
            .into_iter()
            .map(|cluster| {
                debug!("{} covers {} pixels", cluster.color, cluster.population);
                cluster.color
            })
            .collect(),
        ExtractionMethod::Sampling => MedoidSampler::new(pixels, num_colors, seed).get_representative_colors(),
    };

    Ok(colors)
}

// the larger side becomes `max_size`, the other keeps the aspect ratio rounded down but never drops to zero
fn scaled_dimensions(width: u32, height: u32, max_size: u32) -> Option<(u32, u32)> {
    if max_size == 0 || width == 0 || height == 0 || (width <= max_size && height <= max_size) {
        return None;
    }

    let scale = |side: u32, longest: u32| ((side as u64 * max_size as u64 / longest as u64) as u32).max(1);

    if width > height {
        Some((max_size, scale(height, width)))
    } else {
        Some((scale(width, height), max_size))
    }
}

fn pixel_to_color<P>(pixel: &P) -> Color
where
    P: image::Pixel<Subpixel = u8>,
{
    let rgb = pixel.to_rgb();
    Color::new(rgb.0[0], rgb.0[1], rgb.0[2])
}
