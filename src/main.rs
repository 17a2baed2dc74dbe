use std::cell::{Cell, RefCell};
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::Parser;
use raylib::prelude::*;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use twin_slider::{
    BoxedEngine, Direction, Environment, Key, LiveRegion, Slider, SliderConfig, StripEngine, Track,
};

mod viewer;

use crate::viewer::page::{Badge, Geometry, SharedGeometry, SharedStatus, StatusLine, WindowPage};
use crate::viewer::scene::{entrance_progress, Scene};
use crate::viewer::texture_loader::{
    caption_for, load_sorted_image_paths, load_texture_with_exif_rotation,
};

const WINDOW_WIDTH: i32 = 960;
const WINDOW_HEIGHT: i32 = 720;
const FPS: u32 = 60;

/// Image slider with a synchronized caption track.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Directory holding the images (captions from `<image>.txt` sidecars)
    dir: PathBuf,

    /// TOML slider configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Stop at the ends instead of wrapping
    #[arg(long)]
    no_loop: bool,

    /// Autoplay delay in milliseconds
    #[arg(long)]
    autoplay_delay: Option<u64>,

    /// Behave as if the user prefers reduced motion
    #[arg(long)]
    reduced_motion: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "twin_slider=debug"
    } else {
        "twin_slider=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Config file first, then command line overrides.
fn load_config(args: &Args) -> Result<SliderConfig> {
    let mut config = match &args.config {
        Some(path) => SliderConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => SliderConfig::default(),
    };
    if args.no_loop {
        config.loop_enabled = false;
    }
    if let Some(delay) = args.autoplay_delay {
        config.autoplay_delay_ms = delay;
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn engine(count: usize, loop_enabled: bool) -> twin_slider::error::Result<BoxedEngine> {
    StripEngine::new(count, loop_enabled).map(|e| Box::new(e) as BoxedEngine)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    let config = load_config(&args)?;

    let (mut rl, thread) = raylib::init()
        .size(WINDOW_WIDTH, WINDOW_HEIGHT)
        .title("Twin Slider")
        .vsync()
        .resizable()
        .build();
    rl.set_target_fps(FPS);
    rl.set_trace_log(TraceLogLevel::LOG_ERROR);

    // --- Load slides ---
    let paths = load_sorted_image_paths(&args.dir)?;
    let mut textures = Vec::new();
    let mut captions = Vec::new();
    let mut failed = 0;
    for path in &paths {
        match load_texture_with_exif_rotation(&mut rl, &thread, path) {
            Ok(texture) => {
                textures.push(texture);
                captions.push(caption_for(path));
            }
            Err(e) => {
                warn!(error = %e, "skipping image");
                failed += 1;
            }
        }
    }
    info!(slides = textures.len(), failed, dir = %args.dir.display(), "slides loaded");

    // --- Mount ---
    let mut rng = rand::rng();
    let geometry: SharedGeometry = Rc::new(RefCell::new(Geometry {
        screen_width: rl.get_screen_width() as f32,
        screen_height: rl.get_screen_height() as f32,
        badges: (0..textures.len()).map(|_| Badge::random(&mut rng)).collect(),
        spacer: 0.0,
    }));
    let status: SharedStatus = Rc::default();
    let region = LiveRegion::new(Box::new(StatusLine::new(&status))).shared();

    let count = textures.len();
    let mut slider = Slider::mount(
        config.clone(),
        Environment {
            prefers_reduced_motion: args.reduced_motion,
        },
        engine(count, config.loop_enabled),
        engine(count, config.loop_enabled),
        captions.clone(),
        &region,
        Box::new(WindowPage::new(&geometry)),
    );
    let entered: Rc<Cell<Option<usize>>> = Rc::default();
    let hook = Rc::clone(&entered);
    slider.set_entrance_animator(Box::new(move |index| hook.set(Some(index))));
    if failed > 0 {
        slider.announce_error(&format!("{failed} images could not be loaded"));
    }

    let scene = Scene::new(textures, captions);
    let mut hovered = false;
    let mut minimized = false;
    let mut entered_at = 0;

    // --- Main loop ---
    while !rl.window_should_close() {
        let now = (rl.get_time() * 1000.0) as u64;

        if rl.is_window_resized() {
            let mut g = geometry.borrow_mut();
            g.screen_width = rl.get_screen_width() as f32;
            g.screen_height = rl.get_screen_height() as f32;
            drop(g);
            slider.resize(now);
        }

        // Window focus is not slider focus; only minimising is passed on.
        if rl.is_window_minimized() != minimized {
            minimized = !minimized;
            slider.visibility_change(!minimized, now);
        }

        let mouse = rl.get_mouse_position();
        let (image_area, content_area) = {
            let g = geometry.borrow();
            (g.image_area(), g.content_area())
        };
        let over = image_area.contains(mouse.x, mouse.y) || content_area.contains(mouse.x, mouse.y);
        if over != hovered {
            hovered = over;
            if hovered {
                slider.pointer_enter();
            } else {
                slider.pointer_leave();
            }
        }

        // A click on either half of a track is a swipe on that track alone.
        if rl.is_mouse_button_pressed(MouseButton::MOUSE_BUTTON_LEFT) {
            for (track, area) in [(Track::Image, image_area), (Track::Content, content_area)] {
                if area.contains(mouse.x, mouse.y) {
                    let direction = if mouse.x < area.x + area.width / 2.0 {
                        Direction::Backward
                    } else {
                        Direction::Forward
                    };
                    slider.swipe_track(track, direction);
                }
            }
        }

        for (key, mapped) in [
            (KeyboardKey::KEY_LEFT, Key::Left),
            (KeyboardKey::KEY_RIGHT, Key::Right),
            (KeyboardKey::KEY_HOME, Key::Home),
            (KeyboardKey::KEY_END, Key::End),
            (KeyboardKey::KEY_SPACE, Key::Space),
        ] {
            if rl.is_key_pressed(key) {
                slider.handle_key(mapped);
            }
        }
        if rl.is_key_pressed(KeyboardKey::KEY_S) {
            slider.stop();
        }

        slider.update(now);
        if entered.take().is_some() {
            entered_at = now;
        }

        let mut d = rl.begin_drawing(&thread);
        let shown = status.borrow();
        scene.draw(
            &mut d,
            &slider,
            &geometry.borrow(),
            shown.as_ref(),
            entrance_progress(now.saturating_sub(entered_at)),
        );
    }

    slider.destroy();
    Ok(())
}
