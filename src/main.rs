use std::path::PathBuf;

use clap::Parser;
use raylib::prelude::*;
use tracing::{debug, info, warn};

mod card;
mod confetti;
mod constants;
mod customize;
mod ease;
mod gallery;
mod interval;
mod music;
mod scene;
mod storyboard;
mod texture_loader;
mod timeline;
mod wall;

use crate::card::Content;
use crate::confetti::ConfettiEmitter;
use crate::constants::*;
use crate::gallery::Gallery;
use crate::music::{MusicControl, StreamPlayback, ToggleOutcome};
use crate::storyboard::{Cue, Storyboard};
use crate::wall::{Hint, SlidingWall};

#[derive(Parser)]
#[command(name = "birthday-card", about = "An animated birthday greeting card")]
struct Args {
    /// Directory of gallery photos; without it the gallery stays hidden
    photos: Option<PathBuf>,

    /// Customization document with text and image overrides
    #[arg(long, default_value = "customize.json")]
    customize: PathBuf,

    /// Audio track for the hidden music player
    #[arg(long)]
    music: Option<PathBuf>,

    /// Present fullscreen instead of windowed
    #[arg(long)]
    fullscreen: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    let args = Args::parse();

    let mut builder = raylib::init();
    builder
        .size(RENDER_WIDTH, RENDER_HEIGHT)
        .title("Birthday Card")
        .vsync();
    if args.fullscreen {
        builder.fullscreen();
    }
    let (mut rl, thread) = builder.build();
    rl.set_target_fps(FPS);
    rl.set_trace_log(TraceLogLevel::LOG_ERROR);
    let font = rl.get_font_default();

    // --- Content, with optional customization overrides ---
    let mut content = Content::defaults();
    content.apply(&customize::load_or_default(&args.customize));

    let portrait = content.image_path.clone().and_then(|path| {
        match texture_loader::load_texture_with_exif_rotation(&mut rl, &thread, &path) {
            Ok(texture) => Some(texture),
            Err(err) => {
                warn!(%err, "portrait unavailable, drawing placeholder");
                None
            }
        }
    });

    // --- Gallery photos ---
    let mut photos = Vec::new();
    if let Some(dir) = &args.photos {
        match texture_loader::load_sorted_image_paths(dir) {
            Ok(paths) => {
                for path in paths {
                    match texture_loader::load_texture_with_exif_rotation(&mut rl, &thread, &path) {
                        Ok(texture) => photos.push(texture),
                        Err(err) => warn!(%err, "skipping photo"),
                    }
                }
            }
            Err(err) => warn!(%err, "photo directory unusable"),
        }
    }
    let mut gallery = Gallery::new(photos);
    if gallery.is_none() {
        info!("no gallery photos, the slideshow stays hidden");
    }

    // --- Audio ---
    let audio = match RaylibAudio::init_audio_device() {
        Ok(audio) => Some(audio),
        Err(err) => {
            warn!(%err, "audio device unavailable, music player disabled");
            None
        }
    };
    let mut playback: Option<StreamPlayback> = None;
    if let (Some(audio), Some(path)) = (audio.as_ref(), args.music.as_ref()) {
        match audio.new_music(&path.to_string_lossy()) {
            Ok(music) => playback = Some(StreamPlayback::new(music)),
            Err(err) => warn!(%err, "music track unavailable"),
        }
    }
    let mut music_ctl = playback.as_ref().map(|_| MusicControl::new());

    // --- Presentation state ---
    let mut scene = card::build_scene(&content);
    let mut board = Storyboard::build(&scene);
    let mut confetti = ConfettiEmitter::new();
    let mut wall = SlidingWall::new();
    let mut fired: Vec<Cue> = Vec::new();

    info!(duration = board.duration(), "presentation started");

    while !rl.window_should_close() {
        let dt = rl.get_frame_time();

        // --- Pointer input: first touch point and mouse share the math ---
        let pointer = if rl.get_touch_point_count() > 0 {
            rl.get_touch_position(0)
        } else {
            rl.get_mouse_position()
        };
        let pressed = rl.is_mouse_button_pressed(MouseButton::MOUSE_BUTTON_LEFT);
        let down = rl.is_mouse_button_down(MouseButton::MOUSE_BUTTON_LEFT);
        let released = rl.is_mouse_button_released(MouseButton::MOUSE_BUTTON_LEFT);

        let music_props = scene.props("music");
        let panel = card::music_panel();
        let panel = Rectangle::new(
            panel.x + music_props.x,
            panel.y + music_props.y,
            panel.width,
            panel.height,
        );
        let music_visible = music_props.opacity > 0.5;

        let mut want_replay = rl.is_key_pressed(KeyboardKey::KEY_R);
        if pressed {
            if card::replay_button().check_collision_point_rec(pointer) {
                want_replay = true;
            } else if music_visible
                && card::wall_rect(panel, wall.offset()).check_collision_point_rec(pointer)
            {
                wall.begin_drag(pointer.x);
            } else if music_visible && card::music_button(panel).check_collision_point_rec(pointer)
            {
                match (music_ctl.as_mut(), playback.as_mut()) {
                    (Some(ctl), Some(pb)) => match ctl.toggle(pb, wall.is_revealed()) {
                        ToggleOutcome::Locked => wall.nudge_locked(),
                        ToggleOutcome::Started => wall.set_hint(Hint::Playing),
                        ToggleOutcome::Paused => wall.set_hint(Hint::Secret),
                        ToggleOutcome::Denied => wall.pulse_hint(Hint::AllowAudio),
                    },
                    // No track loaded; the cover still teases
                    _ => {
                        if !wall.is_revealed() {
                            wall.nudge_locked();
                        }
                    }
                }
            }
        }
        if down {
            wall.drag_to(pointer.x);
        }
        if released {
            wall.end_drag();
        }

        if want_replay {
            info!("replaying from the top");
            confetti.stop_all();
            if let Some(gallery) = gallery.as_mut() {
                gallery.reset();
            }
            if let (Some(ctl), Some(pb)) = (music_ctl.as_mut(), playback.as_mut()) {
                ctl.reset(pb);
            }
            wall.reset();
            board.replay();
        }

        // --- Update ---
        board.update(dt, &mut fired);
        for cue in fired.drain(..) {
            debug!(?cue, "storyboard cue");
            match cue {
                Cue::PartyStart => {
                    confetti.start_side_cannons();
                    confetti.start_falling();
                }
                Cue::PartyEnd => confetti.stop_all(),
                Cue::Finished => info!("presentation finished"),
            }
        }
        board.sample(&mut scene);
        if let Some(gallery) = gallery.as_mut() {
            gallery.update(dt);
        }
        confetti.update(
            dt,
            Vector2::new(
                rl.get_screen_width() as f32,
                rl.get_screen_height() as f32,
            ),
        );
        wall.update(dt);
        if let Some(ctl) = music_ctl.as_mut() {
            ctl.update(dt);
        }
        if let Some(pb) = playback.as_mut() {
            pb.poll();
        }

        // --- Draw ---
        let mut d = rl.begin_drawing(&thread);
        d.clear_background(CARD_BACKGROUND);
        card::draw_sections(&mut d, &font, &scene, &content, portrait.as_ref());
        if let Some(gallery) = gallery.as_ref() {
            card::draw_gallery(&mut d, gallery, &scene);
        }
        card::draw_music_panel(&mut d, &font, &scene, &wall, music_ctl.as_ref().map(|c| c.glyph()));
        confetti.draw(&mut d);
        card::draw_replay_button(&mut d, &font);
    }

    Ok(())
}
