//! Sky Voyager simulation core.
//!
//! [`session::GameSession`] owns one play session and is driven by
//! [`game_loop::run_game_loop`], which talks to collaborators over channels.

pub mod autopilot;
pub mod boost;
pub mod collaborators;
pub mod collision;
pub mod config;
pub mod demo;
pub mod entity;
pub mod events;
pub mod game_loop;
pub mod input;
pub mod physics;
pub mod registry;
pub mod session;
pub mod spawn;
