use std::path::PathBuf;

use anyhow::Context;
use bevy::prelude::*;
use clap::Parser;

use confetti_rain::{CelebrationPlugin, EffectsConfig};

#[derive(Parser, Debug)]
#[command(
    name = "confetti_rain",
    about = "A little celebration: confetti rain, bursts, and a guestbook"
)]
struct Cli {
    /// Base RON config; defaults apply if missing.
    #[arg(long, default_value = "assets/config/effects.ron")]
    config: PathBuf,
    /// Optional RON overlay merged over the base config.
    #[arg(long)]
    overlay: Option<PathBuf>,
    /// Lower particle counts and tick rate (the original page's mobile mode).
    #[arg(long)]
    reduced: bool,
    /// Exit automatically after N seconds (overrides window.autoClose).
    #[arg(long)]
    auto_close: Option<f32>,
    /// Print the resolved config as RON and exit.
    #[arg(long)]
    dump_config: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut layers = vec![cli.config.clone()];
    if let Some(overlay) = &cli.overlay {
        layers.push(overlay.clone());
    }
    let (mut cfg, used, errors) = EffectsConfig::load_layered(&layers);
    for e in &errors {
        eprintln!("config: {e}");
    }
    if used.is_empty() {
        eprintln!("config: no layers loaded, using built-in defaults");
    }
    if cli.reduced {
        cfg.performance.reduced = true;
    }
    if let Some(secs) = cli.auto_close {
        cfg.window.auto_close = secs;
    }
    for warning in cfg.validate() {
        eprintln!("config warning: {warning}");
    }

    if cli.dump_config {
        let pretty = ron::ser::to_string_pretty(&cfg, ron::ser::PrettyConfig::default())
            .context("serialize resolved config")?;
        println!("{pretty}");
        return Ok(());
    }

    App::new()
        .insert_resource(cfg.clone())
        .add_plugins(
            DefaultPlugins.set(WindowPlugin {
                primary_window: Some(Window {
                    title: cfg.window.title.clone(),
                    resolution: (cfg.window.width, cfg.window.height).into(),
                    resizable: true,
                    ..default()
                }),
                ..default()
            }),
        )
        .add_plugins(CelebrationPlugin)
        .run();
    Ok(())
}
