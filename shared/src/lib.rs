//! Types shared between the simulation core and its collaborators:
//! world configuration, vector helpers and the host wire protocol.

pub mod config;
pub mod protocol;
pub mod vec3;
