use std::time::Duration;
use anyhow::{Context, Result};
use clap::Parser;
use raylib::prelude::*;
use tracing_subscriber::EnvFilter;

mod cli;
mod constants;
mod error;
mod ffmpeg;
mod looper;
mod slide;
mod state;
mod texture_loader;
mod timer;

use crate::cli::Cli;
use crate::constants::*;
use crate::ffmpeg::Ffmpeg;
use crate::looper::Crossfader;
use crate::slide::Slide;
use crate::texture_loader::{load_sorted_image_paths, load_texture_with_exif_rotation, shuffle_paths};

fn main() -> Result<()> {
    initialise_tracing();
    let cli = Cli::parse();

    let mut image_paths = load_sorted_image_paths(&cli.image_dir)
        .with_context(|| format!("failed to list images in {}", cli.image_dir.display()))?;
    if cli.shuffle {
        shuffle_paths(&mut image_paths, cli.seed);
    }
    tracing::info!(dir = %cli.image_dir.display(), images = image_paths.len(), "found images");

    let (mut rl, thread) = raylib::init()
        .size(RENDER_WIDTH / 2, RENDER_HEIGHT / 2)
        .title("Crossfade")
        .vsync()
        .resizable()
        .build();
    rl.set_target_fps(FPS);
    rl.set_trace_log(TraceLogLevel::LOG_ERROR);

    // --- Load Slides ---
    let mut slides: Vec<Slide> = Vec::with_capacity(image_paths.len());
    for path in &image_paths {
        match load_texture_with_exif_rotation(&mut rl, &thread, path) {
            Ok(texture) => slides.push(Slide::new(texture, cli.fit)),
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "skipping image"),
        }
    }
    let mut framebuffer = rl
        .load_render_texture(&thread, RENDER_WIDTH as u32, RENDER_HEIGHT as u32)
        .map_err(|e| error::Error::RenderTarget(e.to_string()))?;

    let mut recorder = match &cli.record {
        Some(output) => Some(Ffmpeg::spawn(RENDER_WIDTH, RENDER_HEIGHT, FPS, output)?),
        None => None,
    };

    // Everything is loaded: this is the one and only start.
    let mut crossfader = Crossfader::start(slides);
    if crossfader.is_empty() {
        tracing::warn!("no slides loaded; the window stays black");
    }

    // --- Main Loop ---
    while !rl.window_should_close() {
        // Recordings advance by exact frame steps so the video keeps the timings
        let dt = if recorder.is_some() { FRAME_TIME } else { rl.get_frame_time() };
        crossfader.update(Duration::try_from_secs_f32(dt).unwrap_or_default());

        // --- Render into the fixed size framebuffer ---
        rl.draw_texture_mode(&thread, &mut framebuffer, |mut tmd| {
            let mut d = tmd.begin_drawing(&thread);
            d.clear_background(Color::BLACK);

            // Later slides stack on top of earlier ones
            for slide in crossfader.layers() {
                slide.draw(&mut d);
            }

            if cli.debug_overlay {
                let cursor = crossfader.cursor();
                let lines = [
                    format!("State: {:?}", crossfader.state()),
                    format!("Current: {} Next: {} of {}", cursor.current, cursor.next, crossfader.len()),
                    format!("Cycles: {}", crossfader.cycles()),
                    format!("Elapsed: {:.2}s", crossfader.elapsed().as_secs_f32()),
                ];
                for (i, line) in lines.iter().enumerate() {
                    d.draw_text(line, 20, 20 + 30 * i as i32, 24, Color::WHITE);
                }
            }
        });

        // Scaled, vertically flipped copy of the framebuffer on screen
        {
            let mut d2 = rl.begin_drawing(&thread);

            let sw = d2.get_screen_width() as f32;
            let sh = d2.get_screen_height() as f32;

            d2.clear_background(Color::BLACK);
            d2.draw_texture_pro(
                &framebuffer,
                Rectangle::new(0.0, 0.0, framebuffer.width() as f32, -(framebuffer.height() as f32)),
                Rectangle::new(0.0, 0.0, sw, sh),
                Vector2::new(0.0, 0.0),
                0.0,
                Color::WHITE,
            );
        }

        if let Some(ffmpeg) = recorder.as_mut() {
            let image = framebuffer
                .load_image()
                .map_err(|e| error::Error::RenderTarget(e.to_string()))?;
            ffmpeg.write(&image)?;
        }

        if cli.duration.is_some_and(|limit| crossfader.elapsed() >= limit) {
            tracing::info!(cycles = crossfader.cycles(), "duration reached");
            break;
        }
    }

    // Closes ffmpeg's stdin and waits for the file to be written
    drop(recorder);
    Ok(())
}

fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
