use std::collections::BTreeMap;
use std::path::PathBuf;

use raylib::prelude::*;

use crate::constants::*;
use crate::gallery::Gallery;
use crate::music::Glyph;
use crate::scene::{Props, Scene};
use crate::wall::SlidingWall;

/// The card's texts, with their customization keys, plus the optional
/// replacement photo path from the `imagePath` key.
pub struct Content {
    texts: BTreeMap<String, String>,
    pub image_path: Option<PathBuf>,
}

const TEXT_KEYS: [(&str, &str); 10] = [
    ("title", "Hey there!"),
    ("subtitle", "Today is a very special day"),
    ("tagline", "It's your birthday!"),
    ("message", "Sending you the warmest wishes and a big hug."),
    ("surprise", "SURPRISE!"),
    ("wish", "Happy Birthday!"),
    ("wishNote", "May every wish of yours come true"),
    ("outro1", "Thank you for being you."),
    ("outro2", "Have the most wonderful year ahead."),
    ("outro3", "With love"),
];

// Idea lines are part of the storyboard, not customizable.
const IDEA_LINES: [&str; 4] = [
    "You deserve all the happiness",
    "All the love and the laughter",
    "And cake.",
    "So here's a little celebration",
];
const IDEA_EMPHASIS: &str = " Lots of cake.";
const IDEA_CLOSER: &str = "Just for you ";
const BALLOON_COUNT: usize = 5;
const RAY_COUNT: usize = 7;

impl Content {
    pub fn defaults() -> Self {
        Self {
            texts: TEXT_KEYS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            image_path: None,
        }
    }

    /// Applies a customization document: empty values leave the slot
    /// untouched, `imagePath` swaps the photo source, unknown keys are
    /// ignored.
    pub fn apply(&mut self, doc: &BTreeMap<String, String>) {
        for (key, value) in doc {
            if value.is_empty() {
                continue;
            }
            if key == "imagePath" {
                self.image_path = Some(PathBuf::from(value));
            } else if let Some(slot) = self.texts.get_mut(key) {
                *slot = value.clone();
            }
        }
    }

    pub fn text(&self, key: &str) -> &str {
        self.texts.get(key).map_or("", String::as_str)
    }
}

/// Builds the scene the storyboard animates: every section with its
/// pre-presentation pose. Sections that enter later start hidden; their
/// entrance steps tween toward the resting pose.
pub fn build_scene(content: &Content) -> Scene {
    let rest = Props {
        color: CARD_TEXT,
        ..Props::default()
    };
    let hidden_below = Props {
        opacity: 0.0,
        y: 10.0,
        ..rest
    };
    let idea_enter = Props {
        opacity: 0.0,
        y: -20.0,
        rotation: 5.0,
        ..rest
    };

    let mut scene = Scene::new();
    scene.add("container", Props { opacity: 0.0, ..rest }, 1);
    scene.add("one", hidden_below, 1);
    scene.add("two", hidden_below, 1);
    scene.add("three", hidden_below, 1);
    scene.add(
        "four",
        Props {
            opacity: 0.0,
            scale: 0.2,
            ..rest
        },
        1,
    );
    scene.add(
        "fake_btn",
        Props {
            opacity: 0.0,
            scale: 0.2,
            color: Color::WHITE,
            ..rest
        },
        1,
    );
    scene.add(
        "chatbox",
        Props { opacity: 0.0, ..rest },
        content.text("message").chars().count(),
    );
    for name in ["idea1", "idea2", "idea3", "idea4"] {
        scene.add(name, idea_enter, 1);
    }
    scene.add("idea3_em", rest, 1);
    scene.add(
        "idea5",
        Props {
            opacity: 0.0,
            y: 50.0,
            rotation: -10.0,
            ..rest
        },
        1,
    );
    scene.add("idea5_smiley", rest, 1);
    scene.add(
        "idea6",
        Props {
            opacity: 0.0,
            scale: 3.0,
            rotation: 15.0,
            ..rest
        },
        content.text("surprise").chars().count(),
    );
    scene.add(
        "balloons",
        Props {
            opacity: 0.0,
            y: 1400.0,
            ..rest
        },
        BALLOON_COUNT,
    );
    scene.add("six", rest, 1);
    scene.add(
        "photo",
        Props {
            opacity: 0.0,
            scale: 3.5,
            x: 25.0,
            y: -25.0,
            rotation: -45.0,
            ..rest
        },
        1,
    );
    scene.add(
        "hat",
        Props {
            opacity: 0.0,
            x: -100.0,
            y: 350.0,
            rotation: -180.0,
            ..rest
        },
        1,
    );
    scene.add(
        "wish_hbd",
        Props {
            opacity: 0.0,
            y: -50.0,
            rotation: 150.0,
            scale: 1.4,
            ..rest
        },
        content.text("wish").chars().count(),
    );
    scene.add("wish_note", hidden_below, 1);
    scene.add("rays", Props { opacity: 0.0, ..rest }, RAY_COUNT);
    scene.add(
        "outro",
        Props {
            opacity: 0.0,
            y: -10.0,
            ..rest
        },
        3,
    );
    scene.add("last_smile", Props { opacity: 0.0, ..rest }, 1);
    scene.add(
        "gallery",
        Props {
            opacity: 0.0,
            y: 20.0,
            ..rest
        },
        1,
    );
    scene.add(
        "music",
        Props {
            opacity: 0.0,
            y: 20.0,
            ..rest
        },
        1,
    );
    scene
}

// --- Layout ---

const CX: f32 = RENDER_WIDTH as f32 * 0.5;
const HEADLINE_Y: f32 = 300.0;

pub fn gallery_frame() -> Rectangle {
    Rectangle::new(CX - 300.0, 180.0, 600.0, 400.0)
}

pub fn music_panel() -> Rectangle {
    Rectangle::new(CX - 220.0, RENDER_HEIGHT as f32 - 150.0, 440.0, 90.0)
}

pub fn music_button(panel: Rectangle) -> Rectangle {
    Rectangle::new(panel.x + panel.width - 76.0, panel.y + 21.0, 48.0, 48.0)
}

/// Cover geometry: the wall spans the button end of the panel and slides
/// left by the gesture offset.
pub fn wall_rect(panel: Rectangle, offset: f32) -> Rectangle {
    Rectangle::new(
        panel.x + panel.width - 100.0 + offset,
        panel.y,
        100.0,
        panel.height,
    )
}

pub fn replay_button() -> Rectangle {
    Rectangle::new(RENDER_WIDTH as f32 - 130.0, 24.0, 106.0, 40.0)
}

// --- Drawing ---

fn faded(color: Color, alpha: f32) -> Color {
    let a = (color.a as f32 * alpha.clamp(0.0, 1.0)) as u8;
    Color::new(color.r, color.g, color.b, a)
}

fn draw_text_centered(
    d: &mut RaylibDrawHandle,
    font: &WeakFont,
    text: &str,
    center: Vector2,
    size: f32,
    props: Props,
    alpha: f32,
) {
    let alpha = alpha * props.opacity;
    if alpha <= 0.0 || text.is_empty() {
        return;
    }
    let size = size * props.scale;
    let spacing = size * 0.05;
    let measured = font.measure_text(text, size, spacing);
    let origin = Vector2::new(measured.x * 0.5, measured.y * 0.5);
    let position = Vector2::new(center.x + props.x, center.y + props.y);
    d.draw_text_pro(
        font.clone(),
        text,
        position,
        origin,
        props.rotation,
        size,
        spacing,
        faded(props.color, alpha),
    );
}

/// Per-character run: characters advance at their base width while each
/// carries its own sampled props (the staggered sections).
fn draw_char_run(
    d: &mut RaylibDrawHandle,
    font: &WeakFont,
    scene: &Scene,
    section: &str,
    text: &str,
    center: Vector2,
    size: f32,
    alpha: f32,
) {
    let spacing = size * 0.05;
    let mut widths = Vec::new();
    let mut total = 0.0;
    for ch in text.chars() {
        let w = font.measure_text(&ch.to_string(), size, spacing).x + spacing;
        widths.push(w);
        total += w;
    }
    let mut pen = center.x - total * 0.5;
    for (i, ch) in text.chars().enumerate() {
        let props = scene.element(section, i);
        let char_center = Vector2::new(pen + widths[i] * 0.5, center.y);
        draw_text_centered(d, font, &ch.to_string(), char_center, size, props, alpha);
        pen += widths[i];
    }
}

/// The storyboard sections, drawn in script order from the sampled scene.
pub fn draw_sections(
    d: &mut RaylibDrawHandle,
    font: &WeakFont,
    scene: &Scene,
    content: &Content,
    photo: Option<&Texture2D>,
) {
    let card_alpha = scene.props("container").opacity;
    if card_alpha <= 0.0 {
        return;
    }
    let headline = Vector2::new(CX, HEADLINE_Y);

    draw_text_centered(d, font, content.text("title"), Vector2::new(CX, 260.0), 56.0, scene.props("one"), card_alpha);
    draw_text_centered(d, font, content.text("subtitle"), Vector2::new(CX, 340.0), 30.0, scene.props("two"), card_alpha);
    draw_text_centered(d, font, content.text("tagline"), headline, 44.0, scene.props("three"), card_alpha);

    // Chat panel with the typed message and its decoy send button
    let four = scene.props("four");
    if four.opacity > 0.0 {
        let w = 560.0 * four.scale;
        let h = 180.0 * four.scale;
        let panel = Rectangle::new(CX - w * 0.5 + four.x, 280.0 - h * 0.5 + four.y, w, h);
        d.draw_rectangle_rounded(panel, 0.15, 8, faded(CARD_PANEL, card_alpha * four.opacity));
        draw_char_run(
            d,
            font,
            scene,
            "chatbox",
            content.text("message"),
            Vector2::new(CX + four.x, 260.0 + four.y),
            22.0,
            card_alpha * four.opacity,
        );
        let btn = scene.props("fake_btn");
        if btn.opacity > 0.0 {
            let bw = 92.0 * btn.scale;
            let bh = 34.0 * btn.scale;
            let rect = Rectangle::new(
                panel.x + panel.width - bw - 18.0 + btn.x,
                panel.y + panel.height - bh - 14.0 + btn.y,
                bw,
                bh,
            );
            d.draw_rectangle_rounded(rect, 0.4, 8, faded(btn.color, card_alpha * btn.opacity));
            draw_text_centered(
                d,
                font,
                "send",
                Vector2::new(rect.x + bw * 0.5, rect.y + bh * 0.5),
                18.0,
                Props { color: CARD_BACKGROUND, ..Props::default() },
                card_alpha * btn.opacity,
            );
        }
    }

    for (i, name) in ["idea1", "idea2", "idea3", "idea4"].iter().enumerate() {
        let props = scene.props(name);
        if *name == "idea3" && props.opacity > 0.0 {
            // The emphasized tail rides the line but animates on its own
            let size = 34.0;
            let spacing = size * 0.05;
            let lead = font.measure_text(IDEA_LINES[i], size, spacing).x;
            let tail = font.measure_text(IDEA_EMPHASIS, size, spacing).x;
            let left = CX - (lead + tail) * 0.5;
            draw_text_centered(d, font, IDEA_LINES[i], Vector2::new(left + lead * 0.5, HEADLINE_Y), size, props, card_alpha);
            let mut em = scene.props("idea3_em");
            em.opacity *= props.opacity;
            em.x += props.x;
            em.y += props.y;
            draw_text_centered(d, font, IDEA_EMPHASIS, Vector2::new(left + lead + tail * 0.5, HEADLINE_Y), size, em, card_alpha);
        } else {
            draw_text_centered(d, font, IDEA_LINES[i], headline, 34.0, props, card_alpha);
        }
    }

    // "Just for you :)" with the smiley tipping over
    let idea5 = scene.props("idea5");
    if idea5.opacity > 0.0 {
        let size = 34.0;
        let spacing = size * 0.05;
        let lead = font.measure_text(IDEA_CLOSER, size, spacing).x;
        let smile = font.measure_text(":)", size, spacing).x;
        let left = CX - (lead + smile) * 0.5;
        draw_text_centered(d, font, IDEA_CLOSER, Vector2::new(left + lead * 0.5, HEADLINE_Y), size, idea5, card_alpha);
        let mut smiley = scene.element("idea5_smiley", 0);
        smiley.opacity *= idea5.opacity;
        smiley.x += idea5.x;
        smiley.y += idea5.y;
        draw_text_centered(d, font, ":)", Vector2::new(left + lead + smile * 0.5, HEADLINE_Y), size, smiley, card_alpha);
    }

    draw_char_run(d, font, scene, "idea6", content.text("surprise"), Vector2::new(CX, HEADLINE_Y), 72.0, card_alpha);

    // Portrait group: balloons, photo, party hat, dimmed together at the end
    let six = scene.props("six");
    let group_alpha = card_alpha * six.opacity;
    for i in 0..BALLOON_COUNT {
        let props = scene.element("balloons", i);
        if props.opacity <= 0.0 {
            continue;
        }
        let color = CONFETTI_COLORS[i % CONFETTI_COLORS.len()];
        let x = CX + (i as f32 - (BALLOON_COUNT - 1) as f32 * 0.5) * 150.0 + props.x;
        let y = 620.0 + six.y + props.y;
        d.draw_circle_v(Vector2::new(x, y), 34.0, faded(color, group_alpha * props.opacity));
        d.draw_line_v(
            Vector2::new(x, y + 34.0),
            Vector2::new(x, y + 110.0),
            faded(CARD_TEXT, group_alpha * props.opacity * 0.6),
        );
    }
    let photo_props = scene.props("photo");
    if photo_props.opacity > 0.0 {
        let side = 240.0 * photo_props.scale;
        let center = Vector2::new(CX + photo_props.x + six.x, 420.0 + photo_props.y + six.y);
        let frame = Rectangle::new(center.x - side * 0.5, center.y - side * 0.5, side, side);
        let alpha = group_alpha * photo_props.opacity;
        match photo {
            Some(texture) => {
                d.draw_texture_pro(
                    texture,
                    Rectangle::new(0.0, 0.0, texture.width() as f32, texture.height() as f32),
                    Rectangle::new(center.x, center.y, side, side),
                    Vector2::new(side * 0.5, side * 0.5),
                    photo_props.rotation,
                    faded(Color::WHITE, alpha),
                );
            }
            None => {
                d.draw_rectangle_rounded(frame, 0.1, 8, faded(CARD_PANEL, alpha));
                draw_text_centered(d, font, ":)", center, 64.0, Props::default(), alpha);
            }
        }
    }
    let hat = scene.props("hat");
    if hat.opacity > 0.0 {
        let center = Vector2::new(CX + 90.0 + hat.x + six.x, 290.0 + hat.y + six.y);
        d.draw_poly(center, 3, 42.0 * hat.scale, hat.rotation - 90.0, faded(CARD_ACCENT, group_alpha * hat.opacity));
    }

    draw_char_run(d, font, scene, "wish_hbd", content.text("wish"), Vector2::new(CX, 240.0), 76.0, card_alpha);
    draw_text_centered(d, font, content.text("wishNote"), Vector2::new(CX, 330.0), 26.0, scene.props("wish_note"), card_alpha);

    // Celebration rays pulse outward from behind the wish
    for i in 0..RAY_COUNT {
        let props = scene.element("rays", i);
        if props.opacity <= 0.0 {
            continue;
        }
        let radius = 6.0 * props.scale;
        d.draw_circle_lines(
            CX as i32,
            HEADLINE_Y as i32,
            radius,
            faded(CONFETTI_COLORS[i % CONFETTI_COLORS.len()], card_alpha * props.opacity),
        );
    }

    for (i, key) in ["outro1", "outro2", "outro3"].iter().enumerate() {
        let props = scene.element("outro", i);
        draw_text_centered(
            d,
            font,
            content.text(key),
            Vector2::new(CX, 640.0 + i as f32 * 40.0),
            26.0,
            props,
            card_alpha,
        );
    }
    draw_text_centered(d, font, ":)", Vector2::new(CX + 190.0, 720.0), 26.0, scene.props("last_smile"), card_alpha);
}

/// Gallery frame border plus the photos themselves.
pub fn draw_gallery(d: &mut RaylibDrawHandle, gallery: &Gallery, scene: &Scene) {
    let props = scene.props("gallery");
    if props.opacity <= 0.0 {
        return;
    }
    let frame = gallery_frame();
    let outline = Rectangle::new(frame.x + props.x - 8.0, frame.y + props.y - 8.0, frame.width + 16.0, frame.height + 16.0);
    d.draw_rectangle_rounded(outline, 0.03, 8, faded(CARD_PANEL, props.opacity));
    gallery.draw(d, frame, &props);
}

/// Music panel, its button, the sliding cover and the hint line.
pub fn draw_music_panel(
    d: &mut RaylibDrawHandle,
    font: &WeakFont,
    scene: &Scene,
    wall: &SlidingWall,
    glyph: Option<Glyph>,
) {
    let props = scene.props("music");
    if props.opacity <= 0.0 {
        return;
    }
    let alpha = props.opacity;
    let panel = music_panel();
    let panel = Rectangle::new(panel.x + props.x, panel.y + props.y, panel.width, panel.height);
    d.draw_rectangle_rounded(panel, 0.3, 8, faded(CARD_PANEL, alpha));
    draw_text_centered(
        d,
        font,
        "a song for you",
        Vector2::new(panel.x + 120.0, panel.y + panel.height * 0.5),
        22.0,
        Props { color: CARD_TEXT, ..Props::default() },
        alpha,
    );

    let button = music_button(panel);
    let glyph = glyph.unwrap_or(Glyph::Muted);
    d.draw_rectangle_rounded(button, 0.5, 8, faded(Color::WHITE, alpha));
    draw_text_centered(
        d,
        font,
        glyph.label(),
        Vector2::new(button.x + button.width * 0.5, button.y + button.height * 0.5),
        24.0,
        Props { color: CARD_BACKGROUND, ..Props::default() },
        alpha,
    );

    let cover = wall_rect(panel, wall.offset() + wall.shake_offset());
    d.draw_rectangle_rounded(cover, 0.3, 8, faded(CARD_ACCENT, alpha));

    if wall.hint_visible() {
        draw_text_centered(
            d,
            font,
            wall.hint().label(),
            Vector2::new(panel.x + panel.width * 0.5, panel.y - 18.0),
            20.0,
            Props { color: CARD_TEXT, ..Props::default() },
            alpha,
        );
    }
}

pub fn draw_replay_button(d: &mut RaylibDrawHandle, font: &WeakFont) {
    let rect = replay_button();
    d.draw_rectangle_rounded(rect, 0.4, 8, faded(CARD_PANEL, 0.9));
    draw_text_centered(
        d,
        font,
        "replay",
        Vector2::new(rect.x + rect.width * 0.5, rect.y + rect.height * 0.5),
        20.0,
        Props { color: CARD_TEXT, ..Props::default() },
        1.0,
    );
}
