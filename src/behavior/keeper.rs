//! Zone defense, shared by the goalkeeper and the center-back: hold a home
//! coordinate near the own goal, contest the ball inside a rectangular
//! zone, clear it when in control. The goalkeeper additionally catches
//! before clearing and handles its own side's goal kicks.

use crate::commander::Commander;
use crate::math::Vec2;
use crate::perception::Perception;

use super::roles::RoleKind;
use super::{Agent, BALL_DASH_POWER, ERROR_RADIUS, FULL_KICK_POWER, HOME_DASH_POWER, KICK_RADIUS};

const FIELD_CENTER: Vec2 = Vec2 { x: 0.0, y: 0.0 };

impl<C: Commander, P: Perception> Agent<C, P> {
    /// Open-play defense for the roles with a defensive zone. Falls back to
    /// tracking the ball with the eyes when there is nothing to contest.
    pub(crate) async fn defend_zone(&mut self) {
        let ball = self.ball();
        if self.arrived_at_ball() {
            if self.role.kind == RoleKind::Goalkeeper {
                // Face the field before catching so the clearance goes
                // upfield instead of into the own net.
                self.turn_to(FIELD_CENTER).await;
                self.commander.catch_ball(0.0).await;
            }
            self.commander.kick_blocking(FULL_KICK_POWER, 0.0).await;
        } else if self.zone.map(|zone| zone.contains(ball)).unwrap_or(false) {
            self.dash_toward(ball, KICK_RADIUS, BALL_DASH_POWER).await;
        } else if !self.is_close_to(self.home) {
            self.dash_toward(self.home, ERROR_RADIUS, HOME_DASH_POWER).await;
        } else {
            self.turn_to(ball).await;
        }
    }

    /// Own goal kick: walk the ball in and launch it toward the field
    /// center at full power.
    pub(crate) async fn clear_ball(&mut self) {
        if self.arrived_at_ball() {
            self.commander.turn_to_point(FIELD_CENTER).await;
            self.commander.kick_blocking(FULL_KICK_POWER, 0.0).await;
        } else {
            self.dash_toward(self.ball(), KICK_RADIUS, BALL_DASH_POWER).await;
        }
    }
}
