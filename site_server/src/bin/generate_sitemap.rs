//! Writes sitemap.xml into the public directory ahead of deployment

use anyhow::{Context, Result};
use clap::Parser;
use site_core::{AppConfig, SitemapGenerator};
use site_server::init_tracing;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "generate-sitemap")]
#[command(about = "Generate sitemap.xml for the public site")]
struct Args {
    /// Output directory, defaults to the configured public directory
    #[arg(long)]
    public_dir: Option<PathBuf>,

    /// Base URL prefixed to every route
    #[arg(long)]
    base_url: Option<String>,

    /// lastmod date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    date: Option<chrono::NaiveDate>,
}

fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();
    let config = AppConfig::load().context("Failed to load configuration")?;

    let public_dir = args.public_dir.unwrap_or(config.site.public_dir);
    let base_url = args.base_url.unwrap_or(config.site.sitemap_base_url);
    let lastmod = args
        .date
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let generator = SitemapGenerator::new(&base_url);
    let path = generator
        .write_to(&public_dir, lastmod)
        .with_context(|| format!("Failed to write sitemap into {}", public_dir.display()))?;

    info!("Sitemap generated successfully at {}", path.display());
    info!("Total pages: {}", generator.page_count());

    Ok(())
}
