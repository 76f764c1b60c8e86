//! The seam between the scene and the engine, plus the frame sequencer.
//!
//! The engine proper (command lists, rasterization, font rendering) lives
//! behind two narrow traits. The scene promises to call [`TextureLoader`]
//! once at initialization and then, per frame, exactly one [`tick`] followed
//! by exactly one [`draw_scene`].
//!
//! [`tick`]: crate::compute::tick

use std::io;

use log::debug;

use crate::entities::{Camera, SceneState, Transform};

/// Opaque handle to a loaded texture, minted by a [`TextureLoader`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextureHandle(pub u32);

/// Maps asset names to handles at initialization time.
pub trait TextureLoader {
    fn load(&mut self, name: &str) -> TextureHandle;
}

/// One frame's worth of draw services.
///
/// `begin_frame` and `present` bracket the frame the way a command-list
/// acquire/submit pair would; everything in between queues draw work in the
/// order it is called.
pub trait Renderer {
    fn begin_frame(&mut self) -> io::Result<()>;
    /// Full-screen backdrop, drawn behind everything.
    fn draw_sprite(&mut self, texture: TextureHandle) -> io::Result<()>;
    /// Reset depth so the 3D pass is not occluded by the backdrop.
    fn clear_depth(&mut self) -> io::Result<()>;
    fn draw_model(
        &mut self,
        transform: &Transform,
        camera: &Camera,
        texture: TextureHandle,
    ) -> io::Result<()>;
    /// Overlay text at a column/row cell, on top of the 3D pass.
    fn draw_text(&mut self, text: &str, col: u16, row: u16) -> io::Result<()>;
    fn present(&mut self) -> io::Result<()>;
}

// ── Scene textures ───────────────────────────────────────────────────────────

/// The five handles the scene draws with, loaded once at initialization.
#[derive(Clone, Copy, Debug)]
pub struct SceneTextures {
    pub bg: TextureHandle,
    pub stage: TextureHandle,
    pub player: TextureHandle,
    pub beam: TextureHandle,
    pub enemy: TextureHandle,
}

impl SceneTextures {
    pub fn load(loader: &mut impl TextureLoader) -> Self {
        let textures = Self {
            bg: loader.load("bg"),
            stage: loader.load("stage"),
            player: loader.load("player"),
            beam: loader.load("beam"),
            enemy: loader.load("enemy"),
        };
        debug!("scene textures loaded");
        textures
    }
}

// ── Frame sequencer ──────────────────────────────────────────────────────────

/// Fixed label shown in the overlay next to the score.
pub const OVERLAY_LABEL: &str = "STARLANE";

/// Issue one frame's draw calls in fixed back-to-front order: backdrop,
/// depth clear, stage, player, beam and enemy while present, overlay text.
///
/// The order is a correctness requirement. The backdrop must not occlude
/// the 3D pass and the overlay must land on top of it, so callers get no
/// say in the sequence.
pub fn draw_scene<R: Renderer>(
    renderer: &mut R,
    state: &SceneState,
    textures: &SceneTextures,
) -> io::Result<()> {
    renderer.begin_frame()?;

    renderer.draw_sprite(textures.bg)?;
    renderer.clear_depth()?;

    renderer.draw_model(&state.stage, &state.camera, textures.stage)?;
    renderer.draw_model(&state.player.transform, &state.camera, textures.player)?;
    if state.beam.presence.is_active() {
        renderer.draw_model(&state.beam.transform, &state.camera, textures.beam)?;
    }
    if state.enemy.presence.is_active() {
        renderer.draw_model(&state.enemy.transform, &state.camera, textures.enemy)?;
    }

    renderer.draw_text(OVERLAY_LABEL, 2, 0)?;
    renderer.draw_text(&format!("SCORE {}", state.score), 14, 0)?;

    renderer.present()
}
