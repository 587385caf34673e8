//! Decision core for one team of simulated soccer agents.
//!
//! Each agent is an independent task that reads self/field/match snapshots
//! from a [`perception::Perception`] source every tick and issues motor
//! commands (turn, dash, kick, move, catch) through a
//! [`commander::Commander`] sink. A small shared state machine
//! (attack / return-home / follow / pass) drives the outfield roles; the
//! goalkeeper and center-back add a zone-defense hook. Network transport,
//! physics and rendering live outside this crate.

pub mod behavior;
pub mod commander;
pub mod config;
pub mod math;
pub mod perception;
pub mod team;

pub use behavior::machine::AgentState;
pub use behavior::roles::{PhaseAction, RoleConfig, RoleKind};
pub use behavior::Agent;
pub use commander::Commander;
pub use config::{ConfigError, PlayerSlot, TeamConfig};
pub use math::{Rect, Vec2};
pub use perception::{
    BallSnapshot, FieldSnapshot, MatchPhase, MatchSnapshot, Perception, PlayerSnapshot, Side,
};
