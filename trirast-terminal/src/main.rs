/// trirast - rotate a triangle through a model/view/projection pipeline
///
/// Without arguments the triangle is drawn in the terminal:
///   - A / D: rotate by +/-10 degrees about Z
///   - Q / ESC: quit
///
/// With `-r <ANGLE> [OUTPUT]` a single frame is written to OUTPUT
/// (default `output.png`).
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use nalgebra::Vector3;
use trirast_core::pipeline::{DEFAULT_OUTPUT, DEFAULT_SIZE};
use trirast_core::{Pipeline, RenderConfig};
use trirast_terminal::TerminalApp;

#[derive(Parser, Debug)]
#[command(author, version, about = "Software rasterizer for a single rotating triangle")]
struct Args {
    /// Render one frame rotated by this many degrees and exit
    #[arg(short = 'r', long = "rotate", value_name = "ANGLE", allow_negative_numbers = true)]
    rotate: Option<f32>,
    /// Image file written in single-shot mode
    #[arg(value_name = "OUTPUT", requires = "rotate")]
    output: Option<PathBuf>,
    /// Canvas width in pixels (single-shot mode)
    #[arg(long, default_value_t = DEFAULT_SIZE)]
    width: usize,
    /// Canvas height in pixels (single-shot mode)
    #[arg(long, default_value_t = DEFAULT_SIZE)]
    height: usize,
    /// Camera position
    #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], allow_negative_numbers = true)]
    eye: Option<Vec<f32>>,
    /// Vertical field of view in degrees
    #[arg(long, default_value_t = 45.0)]
    fov: f32,
    /// Distance to the near clip plane
    #[arg(long, default_value_t = 0.1)]
    near: f32,
    /// Distance to the far clip plane
    #[arg(long, default_value_t = 50.0)]
    far: f32,
}

impl Args {
    fn render_config(&self) -> RenderConfig {
        let defaults = RenderConfig::default();
        let eye = match self.eye.as_deref() {
            Some(&[x, y, z]) => Vector3::new(x, y, z),
            _ => defaults.eye,
        };

        RenderConfig {
            width: self.width,
            height: self.height,
            eye,
            fov: self.fov,
            aspect: self.width as f32 / self.height.max(1) as f32,
            near: self.near,
            far: self.far,
            ..defaults
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = args.render_config();

    match args.rotate {
        Some(angle) => {
            let output = args.output.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));
            log::info!("rendering a single frame at {} degrees", angle);

            let mut pipeline = Pipeline::new(config).context("invalid render configuration")?;
            pipeline
                .render_to_file(angle, &output)
                .with_context(|| format!("failed to render {}", output.display()))?;
        }
        None => {
            log::info!("starting interactive mode (A/D rotate, Q/Esc quit)");
            let mut app = TerminalApp::new(config).context("failed to start terminal renderer")?;
            app.run()?;
        }
    }

    Ok(())
}
