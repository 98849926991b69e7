//! Debug module for visualization and headless drawing
//!
//! Provides the drawing surface contract used by gameplay code, plus a
//! recording implementation for headless runs and tests.

pub mod draw;

pub use draw::{Color, DrawCommand, DrawSurface, RecordingSurface};
