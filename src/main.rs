//! lovefx main entry point.
//!
//! Plays one effect or a JSON sequence on an in-memory recording surface and
//! logs what was drawn. Built with the `raylib` feature, `--window` shows the
//! frames in a preview window instead; double-click it for a quick love
//! reaction.
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --effect gift --seed 42
//! cargo run --release -- --sequence celebration.json --frames 300
//! cargo run --release --features raylib -- --effect celebration --window
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use log::{error, info};

use lovefx::animator::{DEFAULT_RAIN_DURATION, DEFAULT_RAIN_INTENSITY, ParticleAnimator};
use lovefx::reactions::DEFAULT_EMOJI_BURST_COUNT;
use lovefx::resources::effectconfig::{ConfigError, EffectConfig};
use lovefx::sequence::Sequence;
use lovefx::surface::{RecordingHandle, RecordingSurface};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum EffectKind {
    Burst,
    Rain,
    Heart,
    Firework,
    Love,
    Gift,
    Success,
    Reaction,
    EmojiBurst,
    EmojiRain,
    Celebration,
}

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "lovefx", version, about = "Confetti and emoji effects player")]
struct Cli {
    /// INI configuration file (default: ./effects.ini, optional).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Seed for reproducible effects; overrides the config file.
    #[arg(long)]
    seed: Option<u64>,

    /// Effect to play.
    #[arg(long, value_enum, default_value_t = EffectKind::Gift)]
    effect: EffectKind,

    /// JSON sequence to play instead of `--effect`.
    #[arg(long, value_name = "PATH")]
    sequence: Option<PathBuf>,

    /// Maximum number of frames to simulate headless.
    #[arg(long, default_value_t = 600)]
    frames: u32,

    /// Simulated frame length in milliseconds.
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    /// Show the effect in a raylib window.
    #[cfg(feature = "raylib")]
    #[arg(long)]
    window: bool,
}

fn load_config(cli: &Cli) -> Result<EffectConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => {
            let mut config = EffectConfig::with_path(path);
            config.load_from_file()?;
            config
        }
        None => {
            let mut config = EffectConfig::new();
            config.load_from_file().ok(); // optional, defaults otherwise
            config
        }
    };
    if let Some(width) = cli.width {
        config.viewport_width = width;
    }
    if let Some(height) = cli.height {
        config.viewport_height = height;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    Ok(config)
}

fn start_effect(animator: &mut ParticleAnimator, kind: EffectKind) -> bool {
    let center = animator.viewport().center();
    match kind {
        EffectKind::Burst => animator.burst_centered(),
        EffectKind::Rain => animator.rain(DEFAULT_RAIN_DURATION, DEFAULT_RAIN_INTENSITY),
        EffectKind::Heart => animator.heart_burst_centered(),
        EffectKind::Firework => animator.firework_default(),
        EffectKind::Love => animator.love_explosion(center.x, center.y).is_some(),
        EffectKind::Gift => animator.gift_celebration(center.x, center.y).is_some(),
        EffectKind::Success => animator.success_celebration().is_some(),
        EffectKind::Reaction => animator.trigger_reaction("❤️", center.x, center.y).is_some(),
        EffectKind::EmojiBurst => animator
            .emoji_burst("💕", center.x, center.y, DEFAULT_EMOJI_BURST_COUNT)
            .is_some(),
        EffectKind::EmojiRain => {
            animator.emoji_rain("💕", DEFAULT_RAIN_DURATION, DEFAULT_RAIN_INTENSITY)
        }
        EffectKind::Celebration => animator.celebration_mode().is_some(),
    }
}

fn run_headless(animator: &mut ParticleAnimator, recording: &RecordingHandle, cli: &Cli) {
    let dt = Duration::from_millis(cli.frame_ms);
    let mut frames = 0;
    let mut peak_draws = 0;
    while frames < cli.frames {
        let running = animator.tick(dt);
        frames += 1;
        peak_draws = peak_draws.max(recording.borrow().last_frame.len());
        if !running {
            break;
        }
    }
    let stats = animator.stats();
    info!(
        "simulated {frames} frames ({} ms): {} particles spawned, {} evicted, {} reactions, peak {peak_draws} draws",
        u64::from(frames) * cli.frame_ms,
        stats.particles_spawned,
        stats.particles_evicted,
        stats.reactions_spawned
    );
    if animator.is_running() {
        info!(
            "stopped with {} particles still alive",
            animator.particle_count()
        );
        animator.stop();
    }
}

#[cfg(feature = "raylib")]
fn run_window(animator: &mut ParticleAnimator, recording: &RecordingHandle) {
    use lovefx::backend::raylib::RaylibPreview;
    use lovefx::reactions::DoubleClickDetector;

    let mut preview = RaylibPreview::open(animator.viewport(), "lovefx");
    let mut double_click = DoubleClickDetector::default();
    while preview.is_open() {
        let (w, h) = preview.size();
        if (w, h) != (animator.viewport().w, animator.viewport().h) {
            animator.resize(w, h);
        }
        if let Some((x, y)) = preview.clicked_at()
            && double_click.click(preview.clock())
        {
            animator.quick_love_reaction(x, y);
        }
        animator.tick(preview.frame_time());
        preview.show(&recording.borrow());
    }
    animator.destroy();
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let (provider, recording) = RecordingSurface::provider();
    let mut animator = ParticleAnimator::new(provider, &config);

    let started = match &cli.sequence {
        Some(path) => match Sequence::load(path) {
            Ok(sequence) => {
                info!(
                    "playing {} steps from {}",
                    sequence.steps.len(),
                    path.display()
                );
                animator.play_sequence(sequence).is_some()
            }
            Err(e) => {
                error!("{}: {e}", path.display());
                return ExitCode::FAILURE;
            }
        },
        None => {
            info!("playing {:?}", cli.effect);
            start_effect(&mut animator, cli.effect)
        }
    };
    if !started {
        error!("effect could not start");
        return ExitCode::FAILURE;
    }

    #[cfg(feature = "raylib")]
    if cli.window {
        run_window(&mut animator, &recording);
        return ExitCode::SUCCESS;
    }

    run_headless(&mut animator, &recording, &cli);
    ExitCode::SUCCESS
}
