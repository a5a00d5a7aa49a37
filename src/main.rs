use clap::Parser;
use image_color_scheme::{
    generate_palette, Color, ColorExtractor, ExtractionMethod, PaletteType, DEFAULT_MAX_SIZE, DEFAULT_NUM_COLORS,
    DEFAULT_SEED,
};
use log::{debug, error, info, LevelFilter};
use simplelog::{Config, SimpleLogger};
use std::process::exit;

#[derive(Parser, Debug)]
#[command(author, version, about = "Extract dominant colors from an image and build palettes from them", long_about = None)]
struct Args {
    #[arg(help = "image file to read")]
    image: String,

    #[arg(short = 'c', long = "colors", help = "number of dominant colors to extract", default_value_t = DEFAULT_NUM_COLORS)]
    colors: usize,

    #[arg(short = 'n', long = "palette-size", help = "number of colors per palette", default_value_t = 5)]
    palette_size: usize,

    #[arg(short = 'p', long = "palette", help = "only print this palette type (default: all of them)")]
    palette: Option<PaletteType>,

    #[arg(long = "no-resize", help = "cluster the image at full size")]
    no_resize: bool,

    #[arg(long = "max-size", help = "largest width or height after resizing", default_value_t = DEFAULT_MAX_SIZE)]
    max_size: u32,

    #[arg(long = "seed", help = "clustering seed", default_value_t = DEFAULT_SEED)]
    seed: u64,

    #[arg(short = 'm', long = "method", help = "kmeans or sampling", default_value_t = ExtractionMethod::KMeans)]
    method: ExtractionMethod,

    #[arg(short = 'd', long = "debug", help = "debug mode, repeat for trace output", action = clap::ArgAction::Count)]
    debug: u8,
}

fn logger_init(debug: u8) {
    let log_level = match debug {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    if let Err(e) = SimpleLogger::init(log_level, Config::default()) {
        eprintln!("failed to initialize logging: {e}");
    }
}

fn print_colors(title: &str, colors: &[Color]) {
    println!("{title}:");
    for (i, color) in colors.iter().enumerate() {
        let (r, g, b) = color.rgb();
        println!("  {:>2}. {}  rgb({r}, {g}, {b})", i + 1, color);
    }
}

fn run(args: Args) -> image_color_scheme::Result<()> {
    info!("extracting colors from '{}'...", args.image);

    let colors = ColorExtractor::open(&args.image)?
        .num_colors(args.colors)
        .resize(!args.no_resize)
        .max_size(args.max_size)
        .seed(args.seed)
        .method(args.method)
        .extract()?;

    if colors.len() < args.colors {
        debug!("only {} of {} colors found", colors.len(), args.colors);
    }

    print_colors("Extracted colors", &colors);

    let palette_types = match args.palette {
        Some(palette_type) => vec![palette_type],
        None => PaletteType::ALL.to_vec(),
    };

    for palette_type in palette_types {
        let palette = generate_palette(&colors, palette_type, args.palette_size)?;
        println!();
        print_colors(&format!("{palette_type} palette"), &palette);
    }

    Ok(())
}

fn main() {
    let args = Args::parse();
    logger_init(args.debug);

    if let Err(e) = run(args) {
        error!("{e}");
        exit(1);
    }
}
