use crate::{
    builder::TerrainConfig,
    collider::ColliderConfig,
    planner::EdgeCorrection,
    progress::ProgressCallback,
};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

const BAR_SIZE: u64 = 10000;

#[derive(Parser, Debug)]
#[command(name = "demtile", author, version, about)]
pub struct Cli {
    /// Elevation source: a csv export or a (geo)tiff raster.
    #[arg(required = true)]
    pub src_path: PathBuf,

    /// RON file with the generation settings; overrides the grid flags below.
    #[arg(short = 'f', long)]
    pub config: Option<PathBuf>,

    #[arg(short, long, default_value_t = 1)]
    pub row_count: u32,
    #[arg(short, long, default_value_t = 1)]
    pub col_count: u32,
    #[arg(long = "tw", default_value_t = 251)]
    pub tile_width: u32,
    #[arg(long = "th", default_value_t = 251)]
    pub tile_height: u32,
    #[arg(short, long, default_value_t = 1.0)]
    pub scale: f32,

    /// Tile index whose window origin shifts inward by one sample,
    /// compensating rounding at the raster's far edge.
    #[arg(long)]
    pub edge_correction: Option<u32>,

    /// Also derive a simplified collider proxy for every tile.
    #[arg(long, default_value_t = false)]
    pub colliders: bool,
    /// Fraction of triangles every collider retains.
    #[arg(long, default_value_t = 0.05)]
    pub collider_ratio: f32,
}

impl Cli {
    pub fn terrain_config(&self) -> anyhow::Result<TerrainConfig> {
        if let Some(path) = &self.config {
            return TerrainConfig::load_file(path);
        }

        Ok(TerrainConfig {
            row_tile_count: self.row_count,
            col_tile_count: self.col_count,
            tile_width: self.tile_width,
            tile_height: self.tile_height,
            scale: self.scale,
            edge_correction: self.edge_correction.map(|boundary| EdgeCorrection {
                boundary,
                offset: 1,
            }),
        })
    }

    pub fn collider_config(&self) -> ColliderConfig {
        ColliderConfig {
            target_ratio: self.collider_ratio,
            strict: false,
        }
    }
}

pub struct GenerateBar<'a> {
    name: String,
    bar: ProgressBar,
    callback: Box<ProgressCallback<'a>>,
}

impl GenerateBar<'_> {
    pub fn new(name: String) -> Self {
        let bar = ProgressBar::new(BAR_SIZE).with_style(
            ProgressStyle::with_template(
                &(name.clone() + " terrain: {wide_bar} {percent} % [{elapsed}/{duration}]"),
            )
            .unwrap(),
        );

        let callback = Box::new({
            let progress_bar = bar.clone();
            move |completion: f64| {
                progress_bar.set_position((completion * BAR_SIZE as f64) as u64);
                true
            }
        });

        Self {
            name,
            bar,
            callback,
        }
    }

    pub fn callback(&self) -> &ProgressCallback {
        self.callback.as_ref()
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
        println!("{} took: {:?}", self.name, self.bar.elapsed());
    }
}
