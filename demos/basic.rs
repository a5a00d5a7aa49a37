use image_color_scheme::{generate_palette, image::io::Reader as ImageReader, ColorExtractor, PaletteType};

fn main() {
    let path = std::env::args().nth(1).expect("usage: basic <image>");
    let reader = ImageReader::open(path).unwrap();
    let img = reader.decode().unwrap();
    let buf = img.to_rgb8();

    let colors = ColorExtractor::from_image(buf).num_colors(6).extract().unwrap();
    println!("{:#?}", colors);

    for palette_type in PaletteType::ALL {
        let palette = generate_palette(&colors, palette_type, 5).unwrap();
        let hex = palette.iter().map(|color| color.hex()).collect::<Vec<_>>();

        println!("{palette_type}: {}", hex.join(" "));
    }
}
