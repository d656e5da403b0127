use std::{
    fs::File,
    io::{BufRead, BufReader, Write},
    path::PathBuf,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use svg::Document;
use tracing_subscriber::EnvFilter;

use skyline::{
    contour::to_bez_path,
    generators,
    io::{read_buildings, read_points, write_buildings, write_points},
    render::{render_buildings, render_skyline, Bounds},
    Building, Point,
};

#[derive(Parser)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Read buildings and print their skyline.
    Solve {
        /// Where to read buildings from; standard input if omitted.
        input: Option<PathBuf>,
    },
    /// Print random buildings.
    Gen {
        /// Buildings span columns in `0..width`.
        #[arg(short, long, default_value_t = 16)]
        width: i64,
        /// Buildings have heights in `1..height`.
        #[arg(short = 'H', long, default_value_t = 32)]
        height: i64,
        /// How many buildings to generate.
        #[arg(short = 'n', long, default_value_t = 8)]
        count: usize,
        /// Random seed.
        #[arg(short, long, default_value_t = 0)]
        seed: u64,
    },
    /// Read buildings and draw their outlines.
    DrawBuildings { input: Option<PathBuf> },
    /// Read a skyline and draw it.
    DrawSkyline { input: Option<PathBuf> },
    /// Read buildings and draw them, with their skyline, as svg.
    Svg {
        input: Option<PathBuf>,

        #[arg(long)]
        output: PathBuf,
    },
}

fn open(input: &Option<PathBuf>) -> anyhow::Result<Box<dyn BufRead>> {
    Ok(match input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("opening {}", path.display()))?,
        )),
        None => Box::new(std::io::stdin().lock()),
    })
}

fn buildings(input: &Option<PathBuf>) -> anyhow::Result<Vec<Building>> {
    Ok(read_buildings(open(input)?)?)
}

fn points(input: &Option<PathBuf>) -> anyhow::Result<Vec<Point>> {
    Ok(read_points(open(input)?)?)
}

pub fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();
    let mut out = std::io::stdout().lock();
    match args.command {
        Command::Solve { input } => {
            let points = skyline::solve(&buildings(&input)?)?;
            write_points(&mut out, &points)?;
        }
        Command::Gen {
            width,
            height,
            count,
            seed,
        } => {
            anyhow::ensure!(width >= 1, "width must be at least 1");
            anyhow::ensure!(height >= 2, "height must be at least 2");
            write_buildings(&mut out, &generators::seeded(seed, width, height, count))?;
        }
        Command::DrawBuildings { input } => {
            let bs = buildings(&input)?;
            let bounds = Bounds::of_buildings(&bs).inflated();
            out.write_all(render_buildings(&bs, bounds)?.as_bytes())?;
        }
        Command::DrawSkyline { input } => {
            let ps = points(&input)?;
            let bounds = Bounds::of_points(&ps).inflated();
            out.write_all(render_skyline(&ps, bounds)?.as_bytes())?;
        }
        Command::Svg { input, output } => {
            let bs = buildings(&input)?;
            let ps = skyline::solve(&bs)?;
            svg::save(&output, &svg_document(&bs, &ps))?;
        }
    }
    Ok(())
}

fn svg_document(buildings: &[Building], points: &[Point]) -> Document {
    let bounds = Bounds::of_buildings(buildings).inflated();
    let width = (bounds.max_x - bounds.min_x) as f64;
    let height = (bounds.max_y - bounds.min_y) as f64;
    let stroke_width = width.max(height) / 256.0;

    // Flip so that y increases upwards.
    let mut group = svg::node::element::Group::new().set(
        "transform",
        format!("translate(0 {}) scale(1 -1)", bounds.max_y + bounds.min_y),
    );

    for b in buildings.iter().filter(|b| b.is_visible()) {
        let r = b.to_kurbo();
        let rect = svg::node::element::Rectangle::new()
            .set("x", r.x0)
            .set("y", r.y0)
            .set("width", r.width())
            .set("height", r.height())
            .set("fill", "steelblue")
            .set("opacity", 0.2)
            .set("stroke", "none");
        group = group.add(rect);
    }

    if !points.is_empty() {
        let path = svg::node::element::Path::new()
            .set("stroke", "black")
            .set("stroke-width", stroke_width)
            .set("stroke-linejoin", "round")
            .set("fill", "none")
            .set("d", to_bez_path(points).to_svg());
        group = group.add(path);
    }

    Document::new()
        .set(
            "viewBox",
            (bounds.min_x as f64, bounds.min_y as f64, width, height),
        )
        .add(group)
}
