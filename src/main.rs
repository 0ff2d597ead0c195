use ::rand as external_rand;
use clap::Parser;
use external_rand::Rng;
use tracing_subscriber::EnvFilter;

use neurogrow::config::GrowthConfig;
use neurogrow::export::{to_json, write_json, NeuronSnapshot};
use neurogrow::population::grow_population;

#[cfg(feature = "ui")]
use macroquad::prelude::*;
#[cfg(feature = "ui")]
use neurogrow::error::OutputError;
#[cfg(feature = "ui")]
use neurogrow::simulation::Simulation;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Grow without a window and print the result as JSON
    #[arg(long)]
    headless: bool,

    /// Configuration file path (YAML or JSON). If not specified, searches for
    /// neurogrow.yaml, neurogrow.yml, or neurogrow.json in current directory.
    /// Its window_size also sets the window size.
    #[arg(short, long)]
    config: Option<String>,

    /// Random seed; overrides the config file
    #[arg(long)]
    seed: Option<u64>,

    /// Number of dendritic growth iterations
    #[arg(long)]
    dendrite_steps: Option<usize>,

    /// Number of axonal growth iterations
    #[arg(long)]
    axon_steps: Option<usize>,

    /// Number of neurons to grow in headless mode
    #[arg(long, default_value_t = 1)]
    count: usize,

    /// Write JSON here instead of stdout (headless mode)
    #[arg(short, long)]
    output: Option<String>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Save a PNG of the window once growth completes
    #[arg(long)]
    screenshot: Option<String>,
}

#[cfg(not(feature = "ui"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let args = Args::parse();
    let config = load_config(&args)?;
    headless_main(&args, config)
}

#[cfg(feature = "ui")]
#[macroquad::main(window_conf)]
async fn main() {
    init_logging();
    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    };

    if args.headless {
        if let Err(e) = headless_main(&args, config) {
            eprintln!("Error running headless mode: {}", e);
            std::process::exit(1);
        }
    } else {
        ui_main(config, args.screenshot).await;
    }
}

/// Logs go to stderr so headless JSON on stdout stays clean
fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("neurogrow=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Load configuration from file or use default, then apply command line overrides
fn load_config(args: &Args) -> Result<GrowthConfig, Box<dyn std::error::Error>> {
    let mut config = if let Some(path) = args.config.as_deref() {
        GrowthConfig::from_file(path)
            .map_err(|e| format!("Failed to load config from {}: {}", path, e))?
    } else {
        GrowthConfig::from_default_paths()
    };

    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if let Some(steps) = args.dendrite_steps {
        config.dendrite_steps = steps;
    }
    if let Some(steps) = args.axon_steps {
        config.axon_steps = steps;
    }
    config.validate()?;
    Ok(config)
}

/// Headless mode - grow one or more neurons and emit them as JSON
fn headless_main(args: &Args, config: GrowthConfig) -> Result<(), Box<dyn std::error::Error>> {
    let base_seed = config
        .seed
        .unwrap_or_else(|| external_rand::thread_rng().gen());
    let sims = grow_population(&config, base_seed, args.count);
    let snapshots: Vec<NeuronSnapshot> = sims.iter().map(NeuronSnapshot::from_simulation).collect();

    match args.output.as_deref() {
        Some(path) => write_json(path, &snapshots, args.pretty)?,
        None => println!("{}", to_json(&snapshots, args.pretty)?),
    }
    Ok(())
}

#[cfg(feature = "ui")]
async fn ui_main(config: GrowthConfig, mut screenshot: Option<String>) {
    use neurogrow::viewport::Viewport;
    use neurogrow::visualization::{draw_legend, draw_neuron, draw_stats, draw_title, MARGIN};

    let steps_per_frame = config.steps_per_frame;
    let mut sim = Simulation::with_config(config);
    tracing::info!(seed = sim.seed(), "growing neuron");

    loop {
        for _ in 0..steps_per_frame {
            if !sim.step() {
                break;
            }
        }

        clear_background(WHITE);

        let viewport = Viewport::fit(&sim.neuron.bounds(), screen_width(), screen_height(), MARGIN);
        draw_neuron(&sim.neuron, &viewport);
        draw_legend(&sim.neuron);
        draw_title();
        draw_stats(&sim.neuron.stats(), sim.phase(), sim.seed());

        // Capture the finished neuron once
        if sim.is_complete() {
            if let Some(filename) = screenshot.take() {
                match capture_screenshot(&filename) {
                    Ok(_) => tracing::info!(file = %filename, "screenshot saved"),
                    Err(e) => {
                        tracing::error!(file = %filename, error = %e, "failed to save screenshot")
                    }
                }
            }
        }

        next_frame().await;
    }
}

#[cfg(feature = "ui")]
fn window_conf() -> Conf {
    // Runs before main, so read --config here too; a bad config is reported by main
    let size = window_size(&Args::parse()) as i32;

    Conf {
        window_title: "Neuron Growth".to_owned(),
        window_width: size,
        window_height: size,
        ..Default::default()
    }
}

/// Window size from the same config main will load, or the default
#[cfg(feature = "ui")]
fn window_size(args: &Args) -> u32 {
    load_config(args)
        .map(|cfg| cfg.window_size)
        .unwrap_or_else(|_| GrowthConfig::default().window_size)
}

#[cfg(feature = "ui")]
/// Capture a screenshot of the current screen
fn capture_screenshot(filename: &str) -> Result<(), OutputError> {
    let screen_image = get_screen_data();

    let width = screen_image.width as u32;
    let height = screen_image.height as u32;
    let bytes = &screen_image.bytes;

    let mut img = image::RgbaImage::new(width, height);

    // OpenGL has origin at bottom-left, images at top-left: flip vertically
    for y in 0..height {
        for x in 0..width {
            let idx = (y * width + x) as usize * 4;
            if idx + 3 < bytes.len() {
                let pixel = [bytes[idx], bytes[idx + 1], bytes[idx + 2], bytes[idx + 3]];
                img.put_pixel(x, height - 1 - y, image::Rgba(pixel));
            }
        }
    }

    img.save(filename)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_file(dir: &tempfile::TempDir, body: &str) -> String {
        let path = dir.path().join("grow.yaml");
        std::fs::write(&path, body).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_file(&dir, "seed: 1\ndendrite_steps: 7\naxon_steps: 8\n");
        let args = Args::parse_from([
            "neurogrow",
            "--config",
            path.as_str(),
            "--seed",
            "9",
            "--axon-steps",
            "3",
        ]);

        let cfg = load_config(&args).unwrap();

        assert_eq!(cfg.seed, Some(9));
        assert_eq!(cfg.dendrite_steps, 7);
        assert_eq!(cfg.axon_steps, 3);
    }

    #[test]
    fn invalid_config_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_file(&dir, "axon_branch_offset: .inf\n");
        let args = Args::parse_from(["neurogrow", "--config", path.as_str()]);
        assert!(load_config(&args).is_err());
    }

    #[cfg(feature = "ui")]
    #[test]
    fn window_size_follows_config_flag() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_file(&dir, "window_size: 640\n");
        let args = Args::parse_from(["neurogrow", "--config", path.as_str()]);
        assert_eq!(window_size(&args), 640);
    }

    #[cfg(feature = "ui")]
    #[test]
    fn window_size_falls_back_when_config_is_broken() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_file(&dir, "sprout_count: 0\n");
        let args = Args::parse_from(["neurogrow", "--config", path.as_str()]);
        assert_eq!(window_size(&args), GrowthConfig::default().window_size);
    }
}
