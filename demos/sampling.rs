use image_color_scheme::{image::RgbImage, ColorExtractor, ExtractionMethod};

// compares k-means with the medoid sampling method on a generated gradient
fn main() {
    let img = RgbImage::from_fn(320, 240, |x, y| {
        image_color_scheme::image::Rgb([(x * 255 / 319) as u8, (y * 255 / 239) as u8, 96])
    });

    for method in [ExtractionMethod::KMeans, ExtractionMethod::Sampling] {
        let colors = ColorExtractor::from_image(img.clone())
            .num_colors(8)
            .method(method)
            .extract()
            .unwrap();

        let hex = colors.iter().map(|color| color.hex()).collect::<Vec<_>>();
        println!("{method:>8}: {}", hex.join(" "));
    }
}
