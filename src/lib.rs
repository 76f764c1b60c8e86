//! A single-scene 3D lane shooter.
//!
//! The player strafes along X at the near end of a 40-unit lane, fires a
//! beam up the lane, and enemies drop in at the far end and fly back toward
//! the player. One beam and one enemy exist at a time; presence is a
//! two-state flag, not allocation.
//!
//! The gameplay core is engine-agnostic: [`entities`] holds pure data,
//! [`compute`] advances it one frame at a time, and [`render`] defines the
//! narrow traits the scene draws through. [`display`] implements those
//! traits for a terminal, projecting the XZ plane top-down.

pub mod compute;
pub mod display;
pub mod entities;
pub mod logging;
pub mod render;
