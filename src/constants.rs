use raylib::prelude::*;

pub const RENDER_WIDTH: i32 = 1280;           // Window width
pub const RENDER_HEIGHT: i32 = 800;           // Window height
pub const FPS: u32 = 60;                      // Frames per second

// --- Gallery ---
pub const SLIDE_INTERVAL: f32 = 3.0;          // Seconds each photo is shown
pub const GALLERY_RESTART_DELAY: f32 = 1.0;   // Pause after reset before rotation resumes
pub const GALLERY_FADE_DURATION: f32 = 0.8;   // Crossfade between photos (seconds)

// --- Sliding wall / reveal gesture ---
pub const WALL_TRAVEL: f32 = 100.0;           // Max slide distance (pixels, to the left)
pub const REVEAL_THRESHOLD: f32 = 50.0;       // Drag distance that unlatches the button
pub const SHAKE_DURATION: f32 = 0.5;          // Locked-click shake length (seconds)
pub const SHAKE_AMPLITUDE: f32 = 8.0;         // Shake excursion (pixels)
pub const HINT_REVERT_DELAY: f32 = 1.5;       // Transient hint/glyph feedback (seconds)

// --- Confetti ---
pub const SIDE_CANNON_PERIOD: f32 = 0.2;      // Seconds between side-cannon bursts
pub const FALLING_PERIOD: f32 = 0.3;          // Seconds between falling bursts
pub const SIDE_CANNON_COUNT: u32 = 22;        // Particles per side-cannon burst
pub const FALLING_COUNT: u32 = 10;            // Particles per falling burst
pub const CONFETTI_SPREAD: f32 = 60.0;        // Burst cone width (degrees)
pub const SIDE_CANNON_VELOCITY: f32 = 50.0;
pub const SIDE_CANNON_GRAVITY: f32 = 0.9;
pub const SIDE_CANNON_TICKS: u32 = 300;       // Particle lifetime in 60 Hz ticks
pub const FALLING_VELOCITY: f32 = 25.0;
pub const FALLING_GRAVITY: f32 = 0.6;
pub const FALLING_TICKS: u32 = 250;

const fn rgb(r: u8, g: u8, b: u8) -> Color {
    Color { r, g, b, a: 0xff }
}

// Shared confetti palette
pub const CONFETTI_COLORS: [Color; 4] = [
    rgb(0xff, 0x0a, 0x54),
    rgb(0xff, 0x47, 0x7e),
    rgb(0xff, 0x70, 0x96),
    rgb(0xff, 0x85, 0xa1),
];

// --- Card palette ---
pub const CARD_BACKGROUND: Color = rgb(0x16, 0x10, 0x20);
pub const CARD_TEXT: Color = rgb(0xf5, 0xf0, 0xf6);
pub const CARD_ACCENT: Color = rgb(0x15, 0xa1, 0xed);
pub const CARD_BUTTON: Color = rgb(0x7f, 0xce, 0xf8);
pub const CARD_PANEL: Color = rgb(0x2a, 0x1f, 0x38);
