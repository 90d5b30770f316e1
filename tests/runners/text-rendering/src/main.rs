//! Dumps the outline of a string as it would be handed to a rasterizer

use std::{fs, path::PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use math::Vec2D;
use truetype::{Font, PathConsumer};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// One line per path segment
    Segments,

    /// A standalone SVG document
    Svg,
}

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Arguments {
    /// Specify the font to be used
    #[arg(short = 'f', long = "font")]
    font_path: PathBuf,

    /// The characters to be rendered
    #[arg(short = 'r', long = "render", default_value = "a")]
    text: String,

    /// Font size in pixels
    #[arg(short = 's', long = "size", default_value_t = 80.)]
    font_size: f32,

    /// Horizontal position of the text
    #[arg(short = 'x', default_value_t = 100.)]
    x: f32,

    /// Vertical position of the text
    #[arg(short = 'y', default_value_t = 100.)]
    y: f32,

    /// Index of the cmap subtable used to look up glyphs
    #[arg(short = 'e', long = "encoding", default_value_t = 0)]
    encoding: usize,

    #[arg(long = "format", value_enum, default_value_t = OutputFormat::Segments)]
    format: OutputFormat,
}

/// Prints every segment in the order it is received
struct SegmentPrinter;

impl PathConsumer for SegmentPrinter {
    fn move_to(&mut self, p: Vec2D) {
        println!("move,\t({}, {})", p.x, p.y);
    }

    fn line_to(&mut self, p: Vec2D) {
        println!("line,\t({}, {})", p.x, p.y);
    }

    fn quad_bez_to(&mut self, p1: Vec2D, p2: Vec2D) {
        println!("quad,\t({}, {}),\t({}, {})", p1.x, p1.y, p2.x, p2.y);
    }

    fn cubic_bez_to(&mut self, p1: Vec2D, p2: Vec2D, p3: Vec2D) {
        println!(
            "cubic,\t({}, {}),\t({}, {}),\t({}, {})",
            p1.x, p1.y, p2.x, p2.y, p3.x, p3.y
        );
    }

    fn close(&mut self) {
        println!("close");
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Arguments::parse();

    let file = fs::File::open(&args.font_path)
        .with_context(|| format!("Failed to open {}", args.font_path.display()))?;
    let font = Font::from_reader(file)
        .with_context(|| format!("Failed to load font from {}", args.font_path.display()))?;

    if let Some(name) = font.full_name() {
        log::info!("Loaded {name}");
    }

    let cmap = font.cmap_table();
    if cmap.num_encoding_tables() == 0 {
        bail!("The font does not contain any encoding tables");
    }
    let encoding = cmap.encoding_table(args.encoding)?;
    log::info!(
        "Using encoding table {} ({:?})",
        args.encoding,
        encoding.platform_id()
    );

    let ascent = font.horizontal_header_table().ascent();
    log::info!(
        "Scale={}, ascent={ascent}",
        args.font_size / f32::from(ascent)
    );

    let text = font
        .layout_at(&args.text, encoding, Vec2D::new(args.x, args.y), args.font_size)
        .with_context(|| format!("Failed to lay out {:?}", args.text))?;

    match args.format {
        OutputFormat::Segments => text.path.replay(&mut SegmentPrinter),
        OutputFormat::Svg => {
            let pen = text.transform.translation();
            let width = pen.x + args.x;
            let height = args.y + 2. * args.font_size;
            println!(
                "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\">"
            );
            println!("  <path d=\"{}\"/>", text.path.to_svg_path_data());
            println!("</svg>");
        },
    }

    Ok(())
}
