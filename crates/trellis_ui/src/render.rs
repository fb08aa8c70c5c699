//! UI rendering system.
//!
//! The render traversal walks the scene depth-first, clips every node to
//! its own rectangle intersected with its ancestors', and paints children
//! in ascending z order. Widgets paint through the [`Surface`] trait;
//! [`CommandBuffer`] is the surface that records commands for a window to
//! present.

use crate::error::SceneResult;
use crate::geometry::{Point, Rect};
use crate::node::{DrawCx, NodeId};
use crate::scene::Scene;
use crate::style::Color;

/// Something widgets can paint on.
pub trait Surface {
    /// Pushes a clip rect, intersected with the current one.
    fn push_clip(&mut self, bounds: Rect);

    /// Pops the current clip rect.
    fn pop_clip(&mut self);

    /// The effective clip rect, if any is pushed.
    fn current_clip(&self) -> Option<Rect>;

    /// Fills a rectangle.
    fn fill_rect(&mut self, bounds: Rect, color: Color);

    /// Outlines a rectangle.
    fn stroke_rect(&mut self, bounds: Rect, color: Color, width: f32);

    /// Draws a line of text with its top-left corner at `origin`.
    fn draw_text(&mut self, text: &str, origin: Point, color: Color, font_size: f32);
}

/// A render command for the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    /// Filled rectangle.
    Rect {
        /// Bounds.
        bounds: Rect,
        /// Fill color.
        color: Color,
    },
    /// Rectangle outline.
    RectOutline {
        /// Bounds.
        bounds: Rect,
        /// Stroke color.
        color: Color,
        /// Line width.
        width: f32,
    },
    /// Text.
    Text {
        /// Text content.
        text: String,
        /// Top-left corner.
        origin: Point,
        /// Text color.
        color: Color,
        /// Font size.
        font_size: f32,
    },
    /// Scissor rect (clip children).
    PushClip {
        /// Clip bounds.
        bounds: Rect,
    },
    /// Pop scissor rect.
    PopClip,
}

/// Surface that records commands for later presentation.
#[derive(Debug)]
pub struct CommandBuffer {
    /// All commands from the frame.
    commands: Vec<RenderCommand>,
    /// Clip stack.
    clip_stack: Vec<Rect>,
}

impl CommandBuffer {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            commands: Vec::with_capacity(4096),
            clip_stack: Vec::with_capacity(16),
        }
    }

    /// Begins a new frame.
    pub fn begin_frame(&mut self) {
        self.commands.clear();
        self.clip_stack.clear();
    }

    /// Commands recorded since the last [`begin_frame`](Self::begin_frame).
    #[must_use]
    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// Returns the total command count.
    #[must_use]
    pub fn command_count(&self) -> usize {
        self.commands.len()
    }
}

impl Default for CommandBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface for CommandBuffer {
    fn push_clip(&mut self, bounds: Rect) {
        // Intersect with current clip if any
        let actual_clip = if let Some(current) = self.clip_stack.last() {
            current.intersection(&bounds).unwrap_or(Rect::ZERO)
        } else {
            bounds
        };

        self.clip_stack.push(actual_clip);
        self.commands.push(RenderCommand::PushClip { bounds: actual_clip });
    }

    fn pop_clip(&mut self) {
        self.clip_stack.pop();
        self.commands.push(RenderCommand::PopClip);
    }

    fn current_clip(&self) -> Option<Rect> {
        self.clip_stack.last().copied()
    }

    fn fill_rect(&mut self, bounds: Rect, color: Color) {
        self.commands.push(RenderCommand::Rect { bounds, color });
    }

    fn stroke_rect(&mut self, bounds: Rect, color: Color, width: f32) {
        self.commands.push(RenderCommand::RectOutline {
            bounds,
            color,
            width,
        });
    }

    fn draw_text(&mut self, text: &str, origin: Point, color: Color, font_size: f32) {
        self.commands.push(RenderCommand::Text {
            text: text.to_owned(),
            origin,
            color,
            font_size,
        });
    }
}

/// Counters from one render traversal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Nodes entered by the traversal.
    pub visited: usize,
    /// Nodes whose draw hook ran.
    pub drawn: usize,
    /// Child subtrees skipped by culling.
    pub culled: usize,
}

impl Scene {
    /// Paints the scene onto `surface`, starting at the root.
    ///
    /// With `culling`, a child whose rectangle misses its parent's is
    /// skipped with its whole subtree. Everything that would have been
    /// visible is painted the same either way.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::NoRoot`](crate::SceneError::NoRoot) when the
    /// scene has no root.
    pub fn render(&mut self, surface: &mut dyn Surface, culling: bool) -> SceneResult<RenderStats> {
        self.flush_notifications();
        let root = self.require_root()?;
        let bounds = self.tree.absolute_rect(root)?;
        let mut stats = RenderStats::default();
        self.render_node(root, bounds, surface, culling, &mut stats)?;
        Ok(stats)
    }

    fn render_node(
        &mut self,
        node: NodeId,
        bounds: Rect,
        surface: &mut dyn Surface,
        culling: bool,
        stats: &mut RenderStats,
    ) -> SceneResult<()> {
        stats.visited += 1;
        surface.push_clip(bounds);

        if !self.tree.is_hidden(node)? {
            let focused = self.focus() == Some(node);
            let hovered = self.hovered() == Some(node);
            if let Some(mut widget) = self.tree.take_widget(node) {
                let mut cx = DrawCx::new(&mut *surface, node, bounds, focused, hovered);
                widget.on_draw(&mut cx);
                self.tree.restore_widget(node, widget);
                stats.drawn += 1;
            }
        }

        self.tree.resort(node)?;
        // Draw hooks cannot touch the tree, so the child list is stable here.
        let count = self.tree.children(node)?.len();
        for i in 0..count {
            let child = self.tree.children(node)?[i];
            let child_bounds = self.tree.rect(child)?.translate(bounds.origin());
            if culling && !child_bounds.intersects(&bounds) {
                tracing::trace!(node = %child, "culled subtree");
                stats.culled += 1;
                continue;
            }
            self.render_node(child, child_bounds, surface, culling, stats)?;
        }

        surface.pop_clip();
        Ok(())
    }
}
