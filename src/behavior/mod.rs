//! The per-agent decision loop: snapshot cache, geometric decision
//! primitives and the match-phase dispatch. The state machine itself lives
//! in [`machine`], the role table in [`roles`] and the zone-defense hook
//! shared by the goalkeeper and the center-back in [`keeper`].

pub mod keeper;
pub mod machine;
pub mod roles;

use std::cmp::Ordering;
use std::time::Duration;

use tokio::sync::broadcast::Receiver;
use tokio::time;
use tracing::{debug, trace};

use crate::commander::Commander;
use crate::math::{Rect, Vec2};
use crate::perception::{FieldSnapshot, MatchSnapshot, Perception, PlayerSnapshot, Side};
use machine::AgentState;
use roles::{PhaseAction, RoleConfig};

/// Arrival radius for waypoints (home position and follow targets).
pub const ERROR_RADIUS: f64 = 2.0;
/// Ball control range: within this distance the agent can kick or catch.
pub const KICK_RADIUS: f64 = 0.6;
/// Pass power per unit of distance to the receiver, tuned so the ball
/// arrives with roughly zero residual speed.
pub const KICK_FACTOR: f64 = 4.5;

/// Facing is considered aligned when the angle to the target is strictly
/// inside this many degrees on either side.
const ALIGN_TOLERANCE_DEG: f64 = 15.0;

/// x-coordinate of the opponent goal mouth, left-side frame.
const GOAL_X: f64 = 50.0;
/// Beyond this |x| on the attacking side the agent shoots instead of passing.
const STRIKE_LINE_X: f64 = 30.0;
/// Passes are aimed this far ahead of the receiver along the attacking axis.
const PASS_LEAD: f64 = 15.0;

const RETURN_DASH_POWER: f64 = 50.0;
const ATTACK_DASH_POWER: f64 = 100.0;
const PASSING_DASH_POWER: f64 = 70.0;
const HOME_DASH_POWER: f64 = 90.0;
const BALL_DASH_POWER: f64 = 80.0;

const FULL_KICK_POWER: f64 = 100.0;
const ADVANCE_KICK_POWER: f64 = 45.0;

/// Settle pause after releasing a pass, lets the kick resolve before the
/// loop issues the next command.
const SETTLE_PAUSE: Duration = Duration::from_millis(1000);
/// Short pause used for idle ticks and pre-kick settling.
const TICK_PAUSE: Duration = Duration::from_millis(100);

pub(crate) fn within_alignment(angle_deg: f64) -> bool {
    angle_deg > -ALIGN_TOLERANCE_DEG && angle_deg < ALIGN_TOLERANCE_DEG
}

/// One simulated player's decision loop. Owns its snapshot cache and state
/// machine; shares nothing with the other agents.
pub struct Agent<C: Commander, P: Perception> {
    commander: C,
    perception: P,
    role: RoleConfig,
    side: Side,
    state: AgentState,
    /// Home position, already mirrored for `side`.
    home: Vec2,
    /// Defensive zone, already mirrored for `side`.
    zone: Option<Rect>,
    me: PlayerSnapshot,
    field: FieldSnapshot,
    match_state: MatchSnapshot,
    drop_rx: Receiver<()>,
}

impl<C: Commander, P: Perception> Agent<C, P> {
    /// Blocks until the first self/field/match snapshots arrive, then
    /// mirrors the role's fixed coordinates for the observed side.
    pub async fn startup(
        commander: C,
        mut perception: P,
        role: RoleConfig,
        drop_rx: Receiver<()>,
    ) -> Agent<C, P> {
        debug!(number = role.number, "waiting for initial perceptions");
        let me = perception.wait_self().await;
        let field = perception.wait_field().await;
        let match_state = perception.wait_match().await;

        let side = me.side;
        let home = role.home * side.factor();
        let zone = role.zone.map(|z| z.mirrored(side));

        Agent {
            commander,
            perception,
            role,
            side,
            state: AgentState::ReturnToHome,
            home,
            zone,
            me,
            field,
            match_state,
            drop_rx,
        }
    }

    /// Runs until the body goes inactive. One snapshot refresh and one
    /// phase-dispatched step per iteration; blocking commands pace the loop
    /// to the simulation's tick cadence.
    pub async fn run(mut self) {
        let delay = self.role.startup_delay;
        if !delay.is_zero() {
            self.pause(delay).await;
        }
        while self.commander.is_active() {
            self.refresh();
            self.step().await;
        }
        debug!(number = self.role.number, "body inactive, agent loop done");
    }

    /// Pulls the latest snapshots, keeping the previous ones when the
    /// source has nothing new this tick.
    fn refresh(&mut self) {
        if let Some(me) = self.perception.poll_self() {
            self.me = me;
        }
        if let Some(field) = self.perception.poll_field() {
            self.field = field;
        }
        if let Some(match_state) = self.perception.poll_match() {
            self.match_state = match_state;
        }
    }

    async fn step(&mut self) {
        let phase = self.match_state.phase;
        match self.role.phase_action(phase, self.side) {
            PhaseAction::MoveHome => {
                self.commander.move_to(self.home.x, self.home.y).await;
            }
            PhaseAction::Evaluate(forced) => {
                if let Some(next) = forced {
                    self.set_state(next);
                }
                self.evaluate().await;
            }
            PhaseAction::Defend => self.defend_zone().await,
            PhaseAction::ClearBall => self.clear_ball().await,
            PhaseAction::Idle => {
                trace!(number = self.role.number, ?phase, "no rule for phase, idling");
                self.pause(TICK_PAUSE).await;
            }
        }
    }

    pub(crate) fn set_state(&mut self, next: AgentState) {
        if self.state != next {
            debug!(number = self.role.number, from = ?self.state, to = ?next, "state transition");
        }
        self.state = next;
    }

    // ---- decision primitives -------------------------------------------

    fn ball(&self) -> Vec2 {
        self.field.ball.position
    }

    /// True iff the facing direction is strictly within ±15° of the vector
    /// to `target`. False when the facing direction is unknown.
    fn is_aligned_to(&self, target: Vec2) -> bool {
        let facing = match self.me.facing {
            Some(facing) => facing,
            None => return false,
        };
        within_alignment(facing.angle_to_deg(target - self.me.position))
    }

    fn is_close_to(&self, position: Vec2) -> bool {
        self.me.position.distance_to(position) <= ERROR_RADIUS
    }

    fn arrived_at_ball(&self) -> bool {
        self.me.position.distance_to(self.ball()) <= KICK_RADIUS
    }

    /// Closest same-side teammate, excluding self. Distance ties broken by
    /// uniform number so the choice is deterministic.
    fn nearest_teammate(&self) -> Option<PlayerSnapshot> {
        self.field
            .teammates_of(&self.me)
            .min_by(|a, b| self.ordering_by_distance(a, b, self.me.position))
            .cloned()
    }

    /// True iff no same-side player ranks ahead of self in (distance to
    /// ball, uniform number) order. Ties on distance are broken by the
    /// lower uniform number so all agents agree on who claims the ball.
    fn is_nearest_to_ball(&self) -> bool {
        let ball = self.ball();
        !self
            .field
            .teammates_of(&self.me)
            .any(|p| self.ordering_by_distance(p, &self.me, ball) == Ordering::Less)
    }

    fn ordering_by_distance(
        &self,
        a: &PlayerSnapshot,
        b: &PlayerSnapshot,
        to: Vec2,
    ) -> Ordering {
        let da = a.position.distance_to(to);
        let db = b.position.distance_to(to);
        da.partial_cmp(&db)
            .unwrap_or(Ordering::Equal)
            .then(a.number.cmp(&b.number))
    }

    // ---- command helpers -----------------------------------------------

    /// Turn to face a field point (issued as a direction command, the way
    /// the body expects it).
    pub(crate) async fn turn_to(&self, target: Vec2) {
        self.commander
            .turn_to_direction(target - self.me.position)
            .await;
    }

    /// Close in on a point: no-op once within `radius`, otherwise align
    /// first if needed and dash.
    pub(crate) async fn dash_toward(&self, point: Vec2, radius: f64, power: f64) {
        if self.me.position.distance_to(point) <= radius {
            return;
        }
        if !self.is_aligned_to(point) {
            self.commander.turn_to_point(point).await;
        }
        self.commander.dash(power).await;
    }

    /// Timed wait that aborts early when the drop signal fires; an
    /// interrupted pause is non-fatal and execution simply resumes.
    pub(crate) async fn pause(&mut self, duration: Duration) {
        tokio::select! {
            _ = self.drop_rx.recv() => {
                debug!(number = self.role.number, "pause interrupted by drop signal");
            }
            _ = time::sleep(duration) => {}
        }
    }
}
