//! Per-uniform role parameters and the match-phase dispatch table.
//!
//! A single table maps (phase, side, role) to a small enumerated action
//! executed by the generic agent loop, so no role carries its own copy
//! of the phase switch.

use std::time::Duration;

use crate::math::{Rect, Vec2};
use crate::perception::{MatchPhase, Side};

use super::machine::AgentState;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum RoleKind {
    Goalkeeper,
    /// Zone defender that holds position instead of chasing a lost ball.
    CenterBack,
    Midfielder,
    Forward,
}

/// What the agent does this tick for the current match phase.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum PhaseAction {
    /// Blocking move to the mirrored home coordinate.
    MoveHome,
    /// Run the state machine, optionally forcing a state first.
    Evaluate(Option<AgentState>),
    /// Zone defense (goalkeeper and center-back open play).
    Defend,
    /// Goalkeeper clearing its own goal kick.
    ClearBall,
    /// Nothing to do this tick.
    Idle,
}

/// Fixed per-agent parameters, set at construction. `home` and `zone` are
/// authored in left-side coordinates and mirrored once the side is known.
#[derive(Debug, PartialEq, Clone)]
pub struct RoleConfig {
    pub number: u8,
    pub kind: RoleKind,
    pub home: Vec2,
    pub zone: Option<Rect>,
    /// Lateral offset the role keeps while shadowing the ball in FOLLOW.
    pub follow_offset: f64,
    /// Delay before the loop starts, lets the simulation settle.
    pub startup_delay: Duration,
    /// The one forward that drops back to RETURN_TO_HOME on its side's
    /// goal kicks instead of resuming its previous state.
    pub goal_kick_home: bool,
}

const FORWARD_STARTUP_DELAY: Duration = Duration::from_secs(5);

impl RoleConfig {
    /// Role parameters for a uniform number. Numbers above 7 get the
    /// supporting-forward configuration so rosters can grow to eleven.
    pub fn for_number(number: u8) -> RoleConfig {
        match number {
            1 => RoleConfig {
                number,
                kind: RoleKind::Goalkeeper,
                home: Vec2::new(-48.0, 0.0),
                zone: Some(Rect::new(-62.0, -30.0, 26.0, 50.0)),
                follow_offset: 0.0,
                startup_delay: Duration::ZERO,
                goal_kick_home: false,
            },
            2 => RoleConfig {
                number,
                kind: RoleKind::CenterBack,
                home: Vec2::new(-38.0, 0.0),
                zone: Some(Rect::new(-52.0, -25.0, 32.0, 50.0)),
                follow_offset: 0.0,
                startup_delay: Duration::ZERO,
                goal_kick_home: false,
            },
            3 => RoleConfig {
                number,
                kind: RoleKind::Midfielder,
                home: Vec2::new(-25.0, 10.0),
                zone: None,
                follow_offset: 20.0,
                startup_delay: Duration::ZERO,
                goal_kick_home: false,
            },
            4 => RoleConfig {
                number,
                kind: RoleKind::Midfielder,
                home: Vec2::new(-25.0, -10.0),
                zone: None,
                follow_offset: -20.0,
                startup_delay: Duration::ZERO,
                goal_kick_home: false,
            },
            5 => RoleConfig {
                number,
                kind: RoleKind::Forward,
                home: Vec2::new(-10.0, 8.0),
                zone: None,
                follow_offset: 8.0,
                startup_delay: FORWARD_STARTUP_DELAY,
                goal_kick_home: false,
            },
            6 | 7 => RoleConfig {
                number,
                kind: RoleKind::Forward,
                home: Vec2::new(-10.0, -8.0),
                zone: None,
                follow_offset: -8.0,
                startup_delay: FORWARD_STARTUP_DELAY,
                goal_kick_home: true,
            },
            _ => RoleConfig {
                number,
                kind: RoleKind::Forward,
                home: Vec2::new(-10.0, 8.0),
                zone: None,
                follow_offset: 8.0,
                startup_delay: FORWARD_STARTUP_DELAY,
                goal_kick_home: false,
            },
        }
    }

    pub fn with_home(mut self, home: Vec2) -> RoleConfig {
        self.home = home;
        self
    }

    /// The dispatch table. The goalkeeper only reacts to kickoff
    /// positioning, open play and its own goal kicks; outfield roles add
    /// restart passing and the after-goal reset.
    pub fn phase_action(&self, phase: MatchPhase, side: Side) -> PhaseAction {
        if self.kind == RoleKind::Goalkeeper {
            return match phase {
                MatchPhase::BeforeKickOff => PhaseAction::MoveHome,
                MatchPhase::PlayOn => PhaseAction::Defend,
                _ if phase.goal_kick_owner() == Some(side) => PhaseAction::ClearBall,
                _ => PhaseAction::Idle,
            };
        }

        if phase.is_reset() {
            return PhaseAction::MoveHome;
        }
        if phase == MatchPhase::PlayOn {
            return match self.kind {
                RoleKind::CenterBack => PhaseAction::Defend,
                RoleKind::Midfielder => PhaseAction::Evaluate(Some(AgentState::Attacking)),
                _ => PhaseAction::Evaluate(None),
            };
        }
        if phase.restart_owner() == Some(side) {
            return PhaseAction::Evaluate(Some(AgentState::PassingBall));
        }
        if phase.goal_kick_owner() == Some(side) {
            return if self.goal_kick_home {
                PhaseAction::Evaluate(Some(AgentState::ReturnToHome))
            } else {
                PhaseAction::Evaluate(None)
            };
        }
        PhaseAction::Idle
    }
}
