//! The command sink, an external collaborator. The transport that carries
//! turn/dash/kick/move/catch to the simulated body lives outside this crate;
//! the behavior layer only depends on this trait.
//!
//! Methods that return a future are acknowledged commands: the caller
//! suspends until the simulated action resolved, which paces the agent loop
//! to the simulation's tick cadence. `kick` is the one fire-and-forget
//! variant the roles use.

use async_trait::async_trait;

use crate::math::Vec2;

#[async_trait]
pub trait Commander: Send {
    /// False once the simulated body is gone. The sole loop-termination
    /// condition for an agent.
    fn is_active(&self) -> bool;

    /// Turn the body to face the given direction vector.
    async fn turn_to_direction(&self, direction: Vec2);

    /// Turn the body to face the given field point.
    async fn turn_to_point(&self, point: Vec2);

    /// Accelerate along the current facing.
    async fn dash(&self, power: f64);

    /// Kick without waiting for the acknowledgement.
    fn kick(&self, power: f64, direction_deg: f64);

    async fn kick_blocking(&self, power: f64, direction_deg: f64);

    /// Kick toward a field point with the given power.
    async fn kick_to_point(&self, power: f64, point: Vec2);

    /// Teleport move, only legal during reset phases.
    async fn move_to(&self, x: f64, y: f64);

    /// Goalkeeper catch at the given direction.
    async fn catch_ball(&self, direction_deg: f64);
}
