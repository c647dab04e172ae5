//! Simulation core for a tile-based side-scrolling platformer.
//!
//! The library owns no window, clock or speaker.  A shell feeds
//! [`session::GameSession::advance`] the actions held each fixed tick and
//! receives events to play and draw commands to render.

pub mod assets;
pub mod config;
pub mod entities;
pub mod geometry;
pub mod levels;
pub mod mobile;
pub mod player;
pub mod render;
pub mod session;
pub mod world;
