//! Drawing surfaces.
//!
//! A [`Surface`] is the minimal 2D drawing vocabulary every scene needs:
//! clear, filled circle, stroked line, and text. The browser implements it
//! over `CanvasRenderingContext2d`; [`Recording`] captures the calls as a
//! [`DrawCommand`] list for tests and for the CPU rasterizer.

use crate::color::Rgba;
use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Destination for one frame of drawing.
pub trait Surface {
    /// Erases everything drawn since the previous clear.
    fn clear(&mut self);

    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Rgba);

    fn stroke_line(&mut self, from: DVec2, to: DVec2, width: f64, color: Rgba);

    /// Draws `text` centred on `at`. Surfaces without text support may
    /// ignore it.
    fn fill_text(&mut self, text: &str, at: DVec2, color: Rgba);
}

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Circle {
        center: DVec2,
        radius: f64,
        color: Rgba,
    },
    Line {
        from: DVec2,
        to: DVec2,
        width: f64,
        color: Rgba,
    },
    Text {
        text: String,
        at: DVec2,
        color: Rgba,
    },
}

/// A surface that keeps the commands of the current frame in memory.
///
/// `clear` drops the recorded commands, so after a frame callback the
/// recording holds exactly that frame.
#[derive(Debug, Clone, Default)]
pub struct Recording {
    commands: Vec<DrawCommand>,
    clears: usize,
}

impl Recording {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn into_commands(self) -> Vec<DrawCommand> {
        self.commands
    }

    /// Number of times `clear` has been called.
    pub fn clears(&self) -> usize {
        self.clears
    }

    pub fn circles(&self) -> impl Iterator<Item = &DrawCommand> + '_ {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Circle { .. }))
    }

    pub fn lines(&self) -> impl Iterator<Item = &DrawCommand> + '_ {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
    }
}

impl Surface for Recording {
    fn clear(&mut self) {
        self.commands.clear();
        self.clears += 1;
    }

    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Rgba) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    fn stroke_line(&mut self, from: DVec2, to: DVec2, width: f64, color: Rgba) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            width,
            color,
        });
    }

    fn fill_text(&mut self, text: &str, at: DVec2, color: Rgba) {
        self.commands.push(DrawCommand::Text {
            text: text.to_owned(),
            at,
            color,
        });
    }
}
