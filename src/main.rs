use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use devis::{assets, render_quote_json};

/// Générer un devis PDF à partir d'un enregistrement JSON.
#[derive(Parser)]
#[command(name = "devis", version)]
struct Args {
    /// Chemin du fichier JSON
    #[arg(long)]
    input: PathBuf,

    /// Chemin du PDF de sortie
    #[arg(long)]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let raw = fs::read(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let logo = assets::load_brand_asset(Path::new(assets::ASSET_DIR))
        .context("failed to read the brand asset")?;
    let pdf = render_quote_json(&raw, logo)?;
    fs::write(&args.output, &pdf)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    log::info!("wrote {} bytes to {}", pdf.len(), args.output.display());
    Ok(())
}
