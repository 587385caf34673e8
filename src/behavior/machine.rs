//! The shared attack/defense state machine run by every outfield role
//! during open play and restarts. One state's logic is evaluated per tick,
//! with at most one transition.

use tracing::warn;

use crate::commander::Commander;
use crate::math::Vec2;
use crate::perception::Perception;

use super::roles::RoleKind;
use super::{
    Agent, ADVANCE_KICK_POWER, ATTACK_DASH_POWER, FULL_KICK_POWER, GOAL_X, KICK_FACTOR,
    PASSING_DASH_POWER, PASS_LEAD, RETURN_DASH_POWER, SETTLE_PAUSE, STRIKE_LINE_X, TICK_PAUSE,
};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum AgentState {
    /// Heading back to the role's home position.
    ReturnToHome,
    /// Chasing the ball as the designated ball carrier.
    Attacking,
    /// Shadowing the ball laterally while a teammate attacks.
    Follow,
    /// Taking a restart for the own side.
    PassingBall,
}

impl<C: Commander, P: Perception> Agent<C, P> {
    pub(crate) async fn evaluate(&mut self) {
        match self.state {
            AgentState::ReturnToHome => self.state_return_to_home().await,
            AgentState::Attacking => self.state_attacking().await,
            AgentState::Follow => self.state_follow().await,
            AgentState::PassingBall => self.state_passing().await,
        }
    }

    async fn state_return_to_home(&mut self) {
        if self.is_nearest_to_ball() {
            self.set_state(AgentState::Attacking);
            return;
        }
        if !self.is_close_to(self.home) {
            if self.is_aligned_to(self.home) {
                self.commander.dash(RETURN_DASH_POWER).await;
            } else {
                self.turn_to(self.home).await;
            }
        } else {
            // Already home, nothing to do until the ball comes our way.
            self.pause(TICK_PAUSE).await;
        }
    }

    async fn state_attacking(&mut self) {
        if !self.is_nearest_to_ball() {
            // The center-back holds its position instead of trailing the
            // new ball carrier.
            let next = if self.role.kind == RoleKind::CenterBack {
                AgentState::ReturnToHome
            } else {
                AgentState::Follow
            };
            self.set_state(next);
            return;
        }

        let s = self.side.factor();
        let ball = self.ball();

        if self.arrived_at_ball() {
            let goal = Vec2::new(GOAL_X * s, 0.0);
            if self.me.position.x * s > STRIKE_LINE_X {
                // Deep in the attacking half: one-shot strike on goal.
                if !self.is_aligned_to(goal) {
                    self.turn_to(goal).await;
                }
                self.commander.kick_blocking(FULL_KICK_POWER, 0.0).await;
            } else {
                match self.nearest_teammate() {
                    Some(mate) if self.me.position.x * s > mate.position.x * s => {
                        // Self is the furthest forward: push on toward the
                        // goal with a medium kick.
                        self.turn_to(goal).await;
                        self.pause(TICK_PAUSE).await;
                        self.commander.kick(ADVANCE_KICK_POWER, 0.0);
                    }
                    Some(mate) => {
                        // Pass, biased ahead of the receiver.
                        let lead = Vec2::new(mate.position.x + PASS_LEAD * s, mate.position.y);
                        let power = self.me.position.distance_to(mate.position) * KICK_FACTOR;
                        self.commander.turn_to_point(lead).await;
                        self.commander.kick_blocking(power, 0.0).await;
                        self.pause(SETTLE_PAUSE).await;
                    }
                    None => {
                        warn!(number = self.role.number, "no teammate to pass to, clearing");
                        if !self.is_aligned_to(goal) {
                            self.turn_to(goal).await;
                        }
                        self.commander.kick_blocking(FULL_KICK_POWER, 0.0).await;
                    }
                }
            }
        } else if self.is_aligned_to(ball) && self.me.position.x * s < ball.x * s {
            self.commander.dash(ATTACK_DASH_POWER).await;
        } else {
            self.turn_to(ball).await;
        }
    }

    async fn state_follow(&mut self) {
        if self.is_nearest_to_ball() {
            self.set_state(AgentState::Attacking);
            return;
        }
        let target = Vec2::new(self.ball().x, self.role.follow_offset * self.side.factor());
        if self.is_aligned_to(target) {
            self.commander.dash(ATTACK_DASH_POWER).await;
        } else {
            self.commander.turn_to_point(target).await;
        }
    }

    async fn state_passing(&mut self) {
        let ball = self.ball();
        if self.arrived_at_ball() {
            match self.nearest_teammate() {
                Some(mate) => {
                    let power = self.me.position.distance_to(mate.position) * KICK_FACTOR;
                    self.turn_to(mate.position).await;
                    self.pause(SETTLE_PAUSE).await;
                    self.commander.kick_to_point(power, mate.position).await;
                    self.pause(SETTLE_PAUSE).await;
                }
                None => {
                    warn!(number = self.role.number, "restart with no teammate, clearing");
                    self.commander.kick_blocking(FULL_KICK_POWER, 0.0).await;
                }
            }
            self.set_state(AgentState::Follow);
        } else if self.is_aligned_to(ball) {
            self.commander.dash(PASSING_DASH_POWER).await;
        } else {
            self.turn_to(ball).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::super::harness::*;
    use super::*;
    use crate::behavior::roles::RoleConfig;
    use crate::perception::{MatchPhase, PlayerSnapshot, Side};

    const EAST: Vec2 = Vec2 { x: 1.0, y: 0.0 };
    const WEST: Vec2 = Vec2 { x: -1.0, y: 0.0 };

    fn me_at(number: u8, side: Side, position: Vec2, facing: Vec2) -> PlayerSnapshot {
        player(number, side, position, Some(facing))
    }

    /// Scenario A: aligned with the ball and behind it, not yet arrived.
    #[tokio::test]
    async fn attacking_dashes_when_aligned_and_behind_ball() {
        let me = me_at(5, Side::Left, Vec2::ZERO, EAST);
        let field = field(Vec2::new(5.0, 0.0), vec![me.clone()]);
        let mut agent = agent(RoleConfig::for_number(5), me, field, MatchPhase::PlayOn);
        agent.force_state(AgentState::Attacking);
        agent.evaluate().await;
        assert_eq!(agent.issued(), vec![Issued::Dash(100.0)]);
        assert_eq!(agent.state(), AgentState::Attacking);
    }

    #[tokio::test]
    async fn attacking_turns_when_not_aligned() {
        let me = me_at(5, Side::Left, Vec2::ZERO, Vec2::new(0.0, 1.0));
        let field = field(Vec2::new(5.0, 0.0), vec![me.clone()]);
        let mut agent = agent(RoleConfig::for_number(5), me, field, MatchPhase::PlayOn);
        agent.force_state(AgentState::Attacking);
        agent.evaluate().await;
        assert_eq!(
            agent.issued(),
            vec![Issued::TurnToDirection(Vec2::new(5.0, 0.0))]
        );
    }

    /// The dash condition is side-mirrored: a right-side player behind the
    /// ball on its attacking axis has a *smaller* mirrored x.
    #[tokio::test]
    async fn attacking_dash_condition_mirrors_for_right_side() {
        let me = me_at(5, Side::Right, Vec2::ZERO, WEST);
        let field = field(Vec2::new(-5.0, 0.0), vec![me.clone()]);
        let mut agent = agent(RoleConfig::for_number(5), me, field, MatchPhase::PlayOn);
        agent.force_state(AgentState::Attacking);
        agent.evaluate().await;
        assert_eq!(agent.issued(), vec![Issued::Dash(100.0)]);
    }

    /// Scenario B: deep in the attacking half with the ball: strike on goal.
    #[tokio::test]
    async fn attacking_strikes_at_goal_when_deep() {
        let me = me_at(5, Side::Left, Vec2::new(40.0, 0.0), EAST);
        let field = field(Vec2::new(40.2, 0.0), vec![me.clone()]);
        let mut agent = agent(RoleConfig::for_number(5), me, field, MatchPhase::PlayOn);
        agent.force_state(AgentState::Attacking);
        agent.evaluate().await;
        // Already facing the goal: no turn, straight full-power kick.
        assert_eq!(
            agent.issued(),
            vec![Issued::KickBlocking { power: 100.0, direction: 0.0 }]
        );
        assert_eq!(agent.state(), AgentState::Attacking);
    }

    #[tokio::test]
    async fn attacking_turns_to_goal_before_deep_strike() {
        let me = me_at(5, Side::Left, Vec2::new(40.0, 0.0), Vec2::new(0.0, 1.0));
        let field = field(Vec2::new(40.2, 0.0), vec![me.clone()]);
        let mut agent = agent(RoleConfig::for_number(5), me, field, MatchPhase::PlayOn);
        agent.force_state(AgentState::Attacking);
        agent.evaluate().await;
        assert_eq!(
            agent.issued(),
            vec![
                Issued::TurnToDirection(Vec2::new(10.0, 0.0)),
                Issued::KickBlocking { power: 100.0, direction: 0.0 },
            ]
        );
    }

    /// Scenario C: shallow with the ball, nearest teammate ahead: pass with
    /// a forward lead and distance-scaled power.
    #[tokio::test]
    async fn attacking_passes_to_teammate_ahead() {
        let me = me_at(5, Side::Left, Vec2::new(20.0, 0.0), EAST);
        let mate = player(4, Side::Left, Vec2::new(25.0, 0.0), None);
        let field = field(Vec2::new(20.3, 0.0), vec![me.clone(), mate]);
        let mut agent = agent(RoleConfig::for_number(5), me, field, MatchPhase::PlayOn);
        agent.force_state(AgentState::Attacking);
        agent.evaluate().await;
        let issued = agent.issued();
        assert_eq!(issued.len(), 2);
        assert_eq!(issued[0], Issued::TurnToPoint(Vec2::new(40.0, 0.0)));
        match issued[1] {
            Issued::KickBlocking { power, direction } => {
                assert_relative_eq!(power, 5.0 * 4.5);
                assert_eq!(direction, 0.0);
            }
            ref other => panic!("expected a kick, got {other:?}"),
        }
        assert_eq!(agent.state(), AgentState::Attacking);
    }

    #[tokio::test]
    async fn attacking_advances_with_medium_kick_when_ahead_of_mates() {
        let me = me_at(5, Side::Left, Vec2::new(20.0, 0.0), EAST);
        let mate = player(4, Side::Left, Vec2::new(10.0, 0.0), None);
        let field = field(Vec2::new(20.3, 0.0), vec![me.clone(), mate]);
        let mut agent = agent(RoleConfig::for_number(5), me, field, MatchPhase::PlayOn);
        agent.force_state(AgentState::Attacking);
        agent.evaluate().await;
        assert_eq!(
            agent.issued(),
            vec![
                Issued::TurnToDirection(Vec2::new(30.0, 0.0)),
                Issued::Kick { power: 45.0, direction: 0.0 },
            ]
        );
    }

    /// Scenario D: losing the ball sends the center-back home and everyone
    /// else into FOLLOW.
    #[tokio::test]
    async fn losing_the_ball_branches_on_role() {
        for (number, expected) in [(2, AgentState::ReturnToHome), (4, AgentState::Follow)] {
            let me = me_at(number, Side::Left, Vec2::new(-30.0, 0.0), EAST);
            let mate = player(5, Side::Left, Vec2::new(1.0, 0.0), None);
            let field = field(Vec2::ZERO, vec![me.clone(), mate]);
            let mut agent =
                agent(RoleConfig::for_number(number), me, field, MatchPhase::PlayOn);
            agent.force_state(AgentState::Attacking);
            agent.evaluate().await;
            assert_eq!(agent.state(), expected, "uniform {number}");
            assert!(agent.issued().is_empty());
        }
    }

    #[tokio::test]
    async fn return_to_home_dashes_when_aligned_and_far() {
        // A teammate owns the ball; home for uniform 4 is (-25, -10).
        let me = me_at(4, Side::Left, Vec2::new(-25.0, 20.0), Vec2::new(0.0, -1.0));
        let mate = player(5, Side::Left, Vec2::new(1.0, 0.0), None);
        let field = field(Vec2::ZERO, vec![me.clone(), mate]);
        let mut agent = agent(RoleConfig::for_number(4), me, field, MatchPhase::PlayOn);
        agent.force_state(AgentState::ReturnToHome);
        agent.evaluate().await;
        assert_eq!(agent.issued(), vec![Issued::Dash(50.0)]);
        assert_eq!(agent.state(), AgentState::ReturnToHome);
    }

    #[tokio::test]
    async fn return_to_home_turns_when_misaligned() {
        let me = me_at(4, Side::Left, Vec2::new(-25.0, 20.0), Vec2::new(0.0, 1.0));
        let mate = player(5, Side::Left, Vec2::new(1.0, 0.0), None);
        let field = field(Vec2::ZERO, vec![me.clone(), mate]);
        let mut agent = agent(RoleConfig::for_number(4), me, field, MatchPhase::PlayOn);
        agent.force_state(AgentState::ReturnToHome);
        agent.evaluate().await;
        assert_eq!(
            agent.issued(),
            vec![Issued::TurnToDirection(Vec2::new(0.0, -30.0))]
        );
    }

    #[tokio::test]
    async fn return_to_home_takes_the_ball_when_nearest() {
        let me = me_at(4, Side::Left, Vec2::new(-5.0, 0.0), EAST);
        let mate = player(5, Side::Left, Vec2::new(30.0, 0.0), None);
        let field = field(Vec2::ZERO, vec![me.clone(), mate]);
        let mut agent = agent(RoleConfig::for_number(4), me, field, MatchPhase::PlayOn);
        agent.force_state(AgentState::ReturnToHome);
        agent.evaluate().await;
        assert_eq!(agent.state(), AgentState::Attacking);
        assert!(agent.issued().is_empty());
    }

    #[tokio::test]
    async fn follow_tracks_ball_laterally_with_role_offset() {
        let me = me_at(3, Side::Left, Vec2::new(0.0, 0.0), Vec2::new(0.0, 1.0));
        let mate = player(5, Side::Left, Vec2::new(11.0, 0.0), None);
        let field = field(Vec2::new(10.0, 0.0), vec![me.clone(), mate]);
        let mut agent = agent(RoleConfig::for_number(3), me, field, MatchPhase::PlayOn);
        agent.force_state(AgentState::Follow);
        agent.evaluate().await;
        // Uniform 3 shadows at +20 laterally: target (ball.x, 20).
        assert_eq!(
            agent.issued(),
            vec![Issued::TurnToPoint(Vec2::new(10.0, 20.0))]
        );
        assert_eq!(agent.state(), AgentState::Follow);
    }

    #[tokio::test]
    async fn follow_offset_mirrors_for_right_side() {
        let me = me_at(3, Side::Right, Vec2::new(0.0, 0.0), Vec2::new(0.0, 1.0));
        let mate = player(5, Side::Right, Vec2::new(-11.0, 0.0), None);
        let field = field(Vec2::new(-10.0, 0.0), vec![me.clone(), mate]);
        let mut agent = agent(RoleConfig::for_number(3), me, field, MatchPhase::PlayOn);
        agent.force_state(AgentState::Follow);
        agent.evaluate().await;
        assert_eq!(
            agent.issued(),
            vec![Issued::TurnToPoint(Vec2::new(-10.0, -20.0))]
        );
    }

    #[tokio::test]
    async fn follow_promotes_to_attacking_when_nearest() {
        let me = me_at(3, Side::Left, Vec2::new(9.0, 0.0), EAST);
        let mate = player(5, Side::Left, Vec2::new(-20.0, 0.0), None);
        let field = field(Vec2::new(10.0, 0.0), vec![me.clone(), mate]);
        let mut agent = agent(RoleConfig::for_number(3), me, field, MatchPhase::PlayOn);
        agent.force_state(AgentState::Follow);
        agent.evaluate().await;
        assert_eq!(agent.state(), AgentState::Attacking);
    }

    #[tokio::test]
    async fn passing_kicks_to_nearest_teammate_then_follows() {
        let me = me_at(4, Side::Left, Vec2::ZERO, EAST);
        let mate = player(5, Side::Left, Vec2::new(0.0, 10.0), None);
        let field = field(Vec2::new(0.3, 0.0), vec![me.clone(), mate]);
        let mut agent = agent(RoleConfig::for_number(4), me, field, MatchPhase::KickOffLeft);
        agent.force_state(AgentState::PassingBall);
        agent.evaluate().await;
        let issued = agent.issued();
        assert_eq!(issued.len(), 2);
        assert_eq!(issued[0], Issued::TurnToDirection(Vec2::new(0.0, 10.0)));
        match issued[1] {
            Issued::KickToPoint { power, point } => {
                assert_relative_eq!(power, 10.0 * 4.5);
                assert_eq!(point, Vec2::new(0.0, 10.0));
            }
            ref other => panic!("expected a kick to the receiver, got {other:?}"),
        }
        assert_eq!(agent.state(), AgentState::Follow);
    }

    #[tokio::test]
    async fn passing_closes_in_on_the_ball_first() {
        let me = me_at(4, Side::Left, Vec2::ZERO, Vec2::new(0.0, 1.0));
        let field = field(Vec2::new(10.0, 0.0), vec![me.clone()]);
        let mut agent = agent(RoleConfig::for_number(4), me, field, MatchPhase::KickOffLeft);
        agent.force_state(AgentState::PassingBall);
        agent.evaluate().await;
        assert_eq!(
            agent.issued(),
            vec![Issued::TurnToDirection(Vec2::new(10.0, 0.0))]
        );
        assert_eq!(agent.state(), AgentState::PassingBall);
    }

    /// Same snapshots, same prior state: two evaluations issue identical
    /// commands and land in the same state.
    #[tokio::test]
    async fn evaluation_is_deterministic() {
        let me = me_at(5, Side::Left, Vec2::new(20.0, 0.0), EAST);
        let mate = player(4, Side::Left, Vec2::new(25.0, 0.0), None);
        let field = field(Vec2::new(20.3, 0.0), vec![me.clone(), mate]);
        let mut agent = agent(RoleConfig::for_number(5), me, field, MatchPhase::PlayOn);

        agent.force_state(AgentState::Attacking);
        agent.evaluate().await;
        let first = agent.issued();
        let first_state = agent.state();

        agent.clear_issued();
        agent.force_state(AgentState::Attacking);
        agent.evaluate().await;
        assert_eq!(agent.issued(), first);
        assert_eq!(agent.state(), first_state);
    }
}
