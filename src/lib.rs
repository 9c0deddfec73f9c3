//! Bird Flop: a side-scrolling flap-through-the-pipes game.
//!
//! The core ([`Game`]) is surface-agnostic: it simulates in logical pixels
//! and draws through the [`Surface`] trait. The terminal host in [`app`]
//! rasterizes onto a half-block [`Canvas`], and tests record draw calls
//! with [`DrawList`].

pub mod app;
pub mod audio;
pub mod clock;
pub mod color;
pub mod config;
pub mod daycycle;
pub mod error;
pub mod hud;
pub mod raster;
pub mod render;
pub mod session;
pub mod surface;
pub mod world;

pub use color::Rgb;
pub use config::{GameConfig, Host, Physics, Theme};
pub use daycycle::{DayCycle, Phase, SkyPalette};
pub use error::{Error, Result};
pub use raster::Canvas;
pub use session::{Game, State, TickOutcome, Transition};
pub use surface::{DrawCall, DrawList, Paint, Shape, Surface};
pub use world::{Bird, Pipe, StepEvents, Viewport, World};
