//! Snapshot types produced by the external perception source, one read per
//! tick. The behavior layer never mutates a snapshot, it only replaces its
//! cached copy wholesale when a fresh one is available.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::math::Vec2;

/// Which half of the field the team defends. Carries the ±1 multiplier used
/// to mirror every left-side coordinate for right-side teams.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn factor(&self) -> f64 {
        match self {
            Side::Left => 1.0,
            Side::Right => -1.0,
        }
    }

    pub fn opposite(&self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// Match phase as reported by the referee, roughly the rcssserver play modes.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum MatchPhase {
    BeforeKickOff,
    PlayOn,
    KickOffLeft,
    KickOffRight,
    CornerKickLeft,
    CornerKickRight,
    KickInLeft,
    KickInRight,
    FreeKickLeft,
    FreeKickRight,
    FreeKickFaultLeft,
    FreeKickFaultRight,
    GoalKickLeft,
    GoalKickRight,
    AfterGoalLeft,
    AfterGoalRight,
    IndirectFreeKickLeft,
    IndirectFreeKickRight,
    /// Anything the referee reports that the behavior core has no rule for.
    Other,
}

impl MatchPhase {
    /// Side that gets to take a restart (kickoff, corner, throw-in, free
    /// kick, indirect free kick). `None` for phases that are not restarts.
    /// Goal kicks are reported separately, they get their own handling.
    pub fn restart_owner(&self) -> Option<Side> {
        use MatchPhase::*;
        match self {
            KickOffLeft | CornerKickLeft | KickInLeft | FreeKickLeft | FreeKickFaultLeft
            | IndirectFreeKickLeft => Some(Side::Left),
            KickOffRight | CornerKickRight | KickInRight | FreeKickRight | FreeKickFaultRight
            | IndirectFreeKickRight => Some(Side::Right),
            _ => None,
        }
    }

    pub fn goal_kick_owner(&self) -> Option<Side> {
        match self {
            MatchPhase::GoalKickLeft => Some(Side::Left),
            MatchPhase::GoalKickRight => Some(Side::Right),
            _ => None,
        }
    }

    /// Phases where players are repositioned to their home coordinates:
    /// before kickoff and right after either team scores.
    pub fn is_reset(&self) -> bool {
        matches!(
            self,
            MatchPhase::BeforeKickOff | MatchPhase::AfterGoalLeft | MatchPhase::AfterGoalRight
        )
    }
}

/// One player as seen this tick. `facing` may be missing when the
/// perception source could not estimate the body direction.
#[derive(Debug, Clone)]
pub struct PlayerSnapshot {
    pub number: u8,
    pub side: Side,
    pub team: String,
    pub position: Vec2,
    pub facing: Option<Vec2>,
}

#[derive(Debug, Clone)]
pub struct BallSnapshot {
    pub position: Vec2,
}

/// Ball and both teams as seen this tick.
#[derive(Debug, Clone)]
pub struct FieldSnapshot {
    pub ball: BallSnapshot,
    pub players: Vec<PlayerSnapshot>,
}

impl FieldSnapshot {
    pub fn side_players(&self, side: Side) -> impl Iterator<Item = &PlayerSnapshot> {
        self.players.iter().filter(move |p| p.side == side)
    }

    /// Same-side players other than the given one.
    pub fn teammates_of<'a>(
        &'a self,
        me: &'a PlayerSnapshot,
    ) -> impl Iterator<Item = &'a PlayerSnapshot> {
        self.side_players(me.side).filter(|p| p.number != me.number)
    }
}

#[derive(Debug, Clone)]
pub struct MatchSnapshot {
    pub phase: MatchPhase,
}

/// The perception source, an external collaborator. Poll variants return
/// `None` when no new snapshot arrived since the last read; the wait
/// variants block and are used once at startup.
#[async_trait]
pub trait Perception: Send {
    fn poll_self(&mut self) -> Option<PlayerSnapshot>;
    fn poll_field(&mut self) -> Option<FieldSnapshot>;
    fn poll_match(&mut self) -> Option<MatchSnapshot>;

    async fn wait_self(&mut self) -> PlayerSnapshot;
    async fn wait_field(&mut self) -> FieldSnapshot;
    async fn wait_match(&mut self) -> MatchSnapshot;
}
