//! Drawing surface contract and a recording implementation
//!
//! Gameplay code draws through [`DrawSurface`] and never touches pixels.
//! Angles are in degrees, zero pointing right, counter-clockwise on screen;
//! a canvas backend negates them when mapping to its y-down coordinates.

use crate::foundation::math::{Point2, Size};

/// RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
    /// Alpha channel
    pub a: u8,
}

impl Color {
    /// Opaque color from RGB channels
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color with explicit alpha
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque black
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Opaque red
    pub const RED: Self = Self::rgb(255, 0, 0);
    /// Opaque green
    pub const GREEN: Self = Self::rgb(0, 200, 0);
    /// Opaque blue
    pub const BLUE: Self = Self::rgb(0, 0, 255);
    /// Opaque yellow
    pub const YELLOW: Self = Self::rgb(255, 220, 0);
    /// Opaque gray
    pub const GRAY: Self = Self::rgb(128, 128, 128);
    /// Opaque brown
    pub const BROWN: Self = Self::rgb(139, 90, 43);
    /// Translucent cyan, used for trigger areas
    pub const TRIGGER: Self = Self::rgba(0, 255, 255, 80);
}

/// Something gameplay code can draw onto
pub trait DrawSurface {
    /// Axis-aligned rectangle anchored at its top-left corner
    fn draw_rect(&mut self, location: Point2, size: Size, border: Color, fill: Option<Color>);

    /// Arc (or full circle for 0..360) around `center`
    fn draw_arc(
        &mut self,
        center: Point2,
        radius: f32,
        start_degrees: f32,
        end_degrees: f32,
        border: Color,
        fill: Option<Color>,
    );

    /// Straight line segment
    fn draw_straight_line(&mut self, start: Point2, end: Point2, color: Color);

    /// Drawable area
    fn size(&self) -> Size;
}

/// One recorded drawing call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Recorded [`DrawSurface::draw_rect`]
    Rect {
        /// Top-left corner
        location: Point2,
        /// Extent
        size: Size,
        /// Outline color
        border: Color,
        /// Optional fill
        fill: Option<Color>,
    },

    /// Recorded [`DrawSurface::draw_arc`]
    Arc {
        /// Arc center
        center: Point2,
        /// Arc radius
        radius: f32,
        /// Start angle in degrees
        start_degrees: f32,
        /// End angle in degrees
        end_degrees: f32,
        /// Outline color
        border: Color,
        /// Optional fill
        fill: Option<Color>,
    },

    /// Recorded [`DrawSurface::draw_straight_line`]
    Line {
        /// Segment start
        start: Point2,
        /// Segment end
        end: Point2,
        /// Line color
        color: Color,
    },
}

impl DrawCommand {
    /// Border or line color of the command
    pub fn color(&self) -> Color {
        match self {
            Self::Rect { border, .. } | Self::Arc { border, .. } => *border,
            Self::Line { color, .. } => *color,
        }
    }
}

/// Headless surface that keeps every command of the current frame
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    size: Size,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    /// Create a recording surface of the given size
    pub fn new(size: Size) -> Self {
        Self { size, commands: Vec::new() }
    }

    /// Commands recorded since the last [`clear`](Self::clear)
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drop recorded commands (call between frames)
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Number of recorded commands using `color`
    pub fn count_with_color(&self, color: Color) -> usize {
        self.commands.iter().filter(|command| command.color() == color).count()
    }
}

impl DrawSurface for RecordingSurface {
    fn draw_rect(&mut self, location: Point2, size: Size, border: Color, fill: Option<Color>) {
        self.commands.push(DrawCommand::Rect { location, size, border, fill });
    }

    fn draw_arc(
        &mut self,
        center: Point2,
        radius: f32,
        start_degrees: f32,
        end_degrees: f32,
        border: Color,
        fill: Option<Color>,
    ) {
        self.commands.push(DrawCommand::Arc {
            center,
            radius,
            start_degrees,
            end_degrees,
            border,
            fill,
        });
    }

    fn draw_straight_line(&mut self, start: Point2, end: Point2, color: Color) {
        self.commands.push(DrawCommand::Line { start, end, color });
    }

    fn size(&self) -> Size {
        self.size
    }
}
