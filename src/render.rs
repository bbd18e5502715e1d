//! Drawing surface contract
//!
//! Game objects only know how to describe themselves with a handful of
//! canvas-style primitives. The host supplies the surface once per frame.

/// RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const BACKGROUND: Color = Color::rgb(14, 16, 28);
    pub const GROUND: Color = Color::rgb(52, 58, 78);
    pub const PLATFORM: Color = Color::rgb(96, 110, 150);
    pub const COIN: Color = Color::rgb(250, 204, 21);
    pub const TEXT: Color = Color::rgb(230, 232, 240);
    pub const ERROR: Color = Color::rgb(248, 113, 113);
    pub const HEALTH: Color = Color::rgb(74, 222, 128);
    pub const PLAYER_ONE: Color = Color::rgb(96, 165, 250);
    pub const PLAYER_TWO: Color = Color::rgb(244, 114, 182);

    /// CSS color string for canvas hosts
    pub fn to_css(self) -> String {
        format!("rgb({},{},{})", self.r, self.g, self.b)
    }
}

/// Primitive drawing operations exposed by the rendering host
pub trait Surface {
    /// Fill the whole surface
    fn clear(&mut self, color: Color);
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color);
    /// Filled circle
    fn arc(&mut self, x: f32, y: f32, radius: f32, color: Color);
    fn fill_text(&mut self, text: &str, x: f32, y: f32, size: f32, color: Color);
}

/// Anything that can put itself on a surface
pub trait Draw {
    fn draw(&self, surface: &mut dyn Surface);
}

/// A recorded drawing primitive
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    Rect { x: f32, y: f32, w: f32, h: f32, color: Color },
    Arc { x: f32, y: f32, radius: f32, color: Color },
    Text { text: String, x: f32, y: f32, size: f32, color: Color },
}

/// Surface that records commands instead of drawing them
///
/// Used by the headless host and by tests that inspect what a screen shows.
#[derive(Debug, Default)]
pub struct CommandBuffer {
    pub commands: Vec<DrawCommand>,
}

impl CommandBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// All text drawn since the last clear, in draw order
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// True if any drawn text contains `needle`
    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().iter().any(|t| t.contains(needle))
    }
}

impl Surface for CommandBuffer {
    fn clear(&mut self, color: Color) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear(color));
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        self.commands.push(DrawCommand::Rect { x, y, w, h, color });
    }

    fn arc(&mut self, x: f32, y: f32, radius: f32, color: Color) {
        self.commands.push(DrawCommand::Arc { x, y, radius, color });
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32, size: f32, color: Color) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            x,
            y,
            size,
            color,
        });
    }
}
