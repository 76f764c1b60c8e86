//! Terminal rendering backend. All terminal I/O lives here.
//!
//! Implements the [`Renderer`] and [`TextureLoader`] seams on top of
//! crossterm, drawing the scene top-down: the lane's X axis maps to columns,
//! Z to rows with the far end at the top. No game logic is performed; this
//! module only translates draw calls into terminal commands.

use std::io::{self, Write};

use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal, QueueableCommand,
};
use glam::Vec3;
use log::debug;

use crate::entities::{Camera, Transform};
use crate::render::{Renderer, TextureHandle, TextureLoader};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BACKDROP: Color = Color::DarkGrey;
const C_STAGE: Color = Color::DarkBlue;
const C_PLAYER: Color = Color::White;
const C_BEAM: Color = Color::Cyan;
const C_ENEMY: Color = Color::Red;
const C_TEXT: Color = Color::Yellow;

// ── Projection window ─────────────────────────────────────────────────────────

// Top-down orthographic window over the lane, slightly wider than the
// playable [-4, 4] so clamped entities stay off the screen edge.
const VIEW_X_MIN: f32 = -4.6;
const VIEW_X_MAX: f32 = 4.6;
const VIEW_Z_NEAR: f32 = -6.5;
const VIEW_Z_FAR: f32 = 40.5;

/// Rows at the top reserved for overlay text.
const OVERLAY_ROWS: u16 = 1;

// ── Texture styles ────────────────────────────────────────────────────────────

/// What a texture handle resolves to on a character grid.
#[derive(Clone, Copy, Debug)]
struct GlyphStyle {
    glyph: char,
    color: Color,
}

const FALLBACK_STYLE: GlyphStyle = GlyphStyle {
    glyph: '?',
    color: Color::Grey,
};

fn style_for(name: &str) -> GlyphStyle {
    match name {
        "bg" => GlyphStyle { glyph: '.', color: C_BACKDROP },
        "stage" => GlyphStyle { glyph: '|', color: C_STAGE },
        "player" => GlyphStyle { glyph: 'A', color: C_PLAYER },
        "beam" => GlyphStyle { glyph: '!', color: C_BEAM },
        "enemy" => GlyphStyle { glyph: 'V', color: C_ENEMY },
        _ => FALLBACK_STYLE,
    }
}

// ── Renderer ──────────────────────────────────────────────────────────────────

/// Crossterm-backed renderer over any writer.
///
/// Commands are queued on the writer and flushed once per [`present`], so a
/// frame reaches the terminal in one burst.
///
/// [`present`]: Renderer::present
pub struct TerminalRenderer<W: Write> {
    out: W,
    width: u16,
    height: u16,
    styles: Vec<GlyphStyle>,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, width: u16, height: u16) -> Self {
        Self {
            out,
            width: width.max(8),
            height: height.max(OVERLAY_ROWS + 4),
            styles: Vec::new(),
        }
    }

    fn style(&self, texture: TextureHandle) -> GlyphStyle {
        self.styles
            .get(texture.0 as usize)
            .copied()
            .unwrap_or(FALLBACK_STYLE)
    }

    /// Project a world XZ point into the viewport, if it lies inside it.
    fn cell(&self, x: f32, z: f32) -> Option<(u16, u16)> {
        let u = (x - VIEW_X_MIN) / (VIEW_X_MAX - VIEW_X_MIN);
        let v = (VIEW_Z_FAR - z) / (VIEW_Z_FAR - VIEW_Z_NEAR);
        if !(0.0..1.0).contains(&u) || !(0.0..1.0).contains(&v) {
            return None;
        }
        Some(self.project(u, v))
    }

    /// Like [`Self::cell`] but clamps out-of-window points to the border.
    fn cell_clamped(&self, x: f32, z: f32) -> (u16, u16) {
        let u = ((x - VIEW_X_MIN) / (VIEW_X_MAX - VIEW_X_MIN)).clamp(0.0, 1.0);
        let v = ((VIEW_Z_FAR - z) / (VIEW_Z_FAR - VIEW_Z_NEAR)).clamp(0.0, 1.0);
        self.project(u, v)
    }

    fn project(&self, u: f32, v: f32) -> (u16, u16) {
        let cols = f32::from(self.width);
        let rows = f32::from(self.height - OVERLAY_ROWS);
        let col = ((u * cols) as u16).min(self.width - 1);
        let row = (OVERLAY_ROWS + (v * rows) as u16).min(self.height - 1);
        (col, row)
    }

    fn put(&mut self, col: u16, row: u16, sty: GlyphStyle) -> io::Result<()> {
        self.out.queue(cursor::MoveTo(col, row))?;
        self.out.queue(SetForegroundColor(sty.color))?;
        self.out.queue(Print(sty.glyph))?;
        Ok(())
    }

    /// Rasterize a footprint rectangle's outline: two side walls plus the
    /// near and far edges, clamped to the viewport.
    fn draw_outline(&mut self, x0: f32, x1: f32, z0: f32, z1: f32, sty: GlyphStyle) -> io::Result<()> {
        let (c0, r_far) = self.cell_clamped(x0, z1);
        let (c1, r_near) = self.cell_clamped(x1, z0);
        for row in r_far..=r_near {
            self.put(c0, row, sty)?;
            self.put(c1, row, sty)?;
        }
        for col in c0..=c1 {
            self.put(col, r_far, sty)?;
            self.put(col, r_near, sty)?;
        }
        Ok(())
    }
}

impl<W: Write> TextureLoader for TerminalRenderer<W> {
    fn load(&mut self, name: &str) -> TextureHandle {
        let handle = TextureHandle(self.styles.len() as u32);
        self.styles.push(style_for(name));
        debug!("texture {:?} -> {:?}", name, handle);
        handle
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn begin_frame(&mut self) -> io::Result<()> {
        self.out.queue(terminal::Clear(terminal::ClearType::All))?;
        Ok(())
    }

    fn draw_sprite(&mut self, texture: TextureHandle) -> io::Result<()> {
        let sty = self.style(texture);
        // Sparse fixed star field; the scatter is a hash of the row so the
        // backdrop holds still from frame to frame.
        for row in OVERLAY_ROWS..self.height {
            if row % 2 == 0 {
                continue;
            }
            let col = ((u32::from(row) * 37 + 11) % u32::from(self.width)) as u16;
            self.put(col, row, sty)?;
        }
        Ok(())
    }

    fn clear_depth(&mut self) -> io::Result<()> {
        // A character cell has no depth buffer; painter's order alone
        // decides occlusion here. The call stays in the frame sequence.
        Ok(())
    }

    fn draw_model(
        &mut self,
        transform: &Transform,
        _camera: &Camera,
        texture: TextureHandle,
    ) -> io::Result<()> {
        let sty = self.style(texture);
        let pos = transform.world.transform_point3(Vec3::ZERO);
        let half_x = transform.scale.x;
        let half_z = transform.scale.z;

        if half_x >= 1.0 || half_z >= 1.0 {
            // Wide footprints (the stage) read better as an outline.
            self.draw_outline(
                pos.x - half_x,
                pos.x + half_x,
                pos.z - half_z,
                pos.z + half_z,
                sty,
            )
        } else {
            match self.cell(pos.x, pos.z) {
                Some((col, row)) => self.put(col, row, sty),
                None => Ok(()),
            }
        }
    }

    fn draw_text(&mut self, text: &str, col: u16, row: u16) -> io::Result<()> {
        self.out.queue(cursor::MoveTo(col, row))?;
        self.out.queue(SetForegroundColor(C_TEXT))?;
        self.out.queue(Print(text))?;
        Ok(())
    }

    fn present(&mut self) -> io::Result<()> {
        self.out.queue(ResetColor)?;
        // Park the cursor in a harmless spot before flushing the frame.
        self.out.queue(cursor::MoveTo(0, self.height - 1))?;
        self.out.flush()
    }
}
