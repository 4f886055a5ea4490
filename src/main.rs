use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use mazecanvas::document::{load_document, LoaderConfig};
use mazecanvas::{Page, PageEvent, RenderConfig, SurfaceKey};

/// Render every maze canvas in an HTML document to PNG
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// HTML file path or http(s) URL
    source: String,

    /// Directory for `<surface>.png` files
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// JSON render configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Class that marks maze elements (overrides the config file)
    #[arg(long)]
    class: Option<String>,

    /// Do not draw solution routes
    #[arg(long)]
    hide_route: bool,

    /// Print a PNG data URL per surface instead of writing files
    #[arg(long)]
    data_url: bool,

    /// Print a SHA-256 pixel digest per surface instead of writing files
    #[arg(long)]
    digest: bool,

    /// HTTP timeout in milliseconds
    #[arg(long, default_value = "30000")]
    timeout_ms: u64,
}

/// `<key>.png`, with anything outside `[A-Za-z0-9._-]` replaced.
fn file_name(key: &SurfaceKey) -> String {
    let stem: String = key
        .as_str()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || "._-".contains(c) { c } else { '_' })
        .collect();
    format!("{}.png", stem)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => RenderConfig::from_json_file(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?,
        None => RenderConfig::default(),
    };
    if let Some(class) = &args.class {
        config.class_name = class.clone();
    }
    if args.hide_route {
        config.default_show_route = false;
    }

    let loader = LoaderConfig { timeout_ms: args.timeout_ms, ..Default::default() };
    let html = load_document(&args.source, &loader)
        .with_context(|| format!("Failed to load {}", args.source))?;

    let mut page = Page::from_html(&html, config).context("Failed to scan document")?;
    if page.surfaces().is_empty() {
        info!("no maze surfaces in {}", args.source);
        return Ok(());
    }

    let report = page.dispatch(PageEvent::Load).unwrap_or_default();
    info!(
        "rendered {} maze(s), {} failed, {} not a canvas",
        report.rendered.len(),
        report.failed.len(),
        report.skipped.len()
    );

    if !args.data_url && !args.digest {
        std::fs::create_dir_all(&args.out_dir)
            .with_context(|| format!("Failed to create {}", args.out_dir.display()))?;
    }

    for key in &report.rendered {
        let Some(raster) = page.surface(key).and_then(|s| s.canvas_context()) else {
            continue;
        };
        if args.digest {
            println!("{} {}", key, raster.digest());
            continue;
        }
        let shot = match raster.screenshot() {
            Ok(shot) => shot,
            Err(e) => {
                warn!("not writing {}: {}", key, e);
                continue;
            }
        };
        if args.data_url {
            println!("{} {}", key, shot.data_url());
        } else {
            let path = args.out_dir.join(file_name(key));
            std::fs::write(&path, &shot.png_data)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("wrote {} ({}x{})", path.display(), shot.width, shot.height);
        }
    }

    Ok(())
}
