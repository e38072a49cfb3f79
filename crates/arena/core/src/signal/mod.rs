//! Signals: the unit of world mutation and of replay history.
//!
//! Every change to robots, trees, occupancy or ledgers is expressed as a
//! [`Signal`] and handed to [`apply`]. The engine records each applied signal
//! in the round buffer, so replaying the log over a pristine world
//! reproduces the live state exactly.
mod apply;
mod log;
mod replay;

pub use apply::{ApplyError, ApplyOutcome, Casualty, apply};
pub use log::{LogRecord, MapSummary, MatchFooter, MatchHeader, MatchLog, RoundRecord};
pub use replay::{ReplayError, Replayer};

use crate::catalog::RobotType;
use crate::state::{Buff, Direction, EntityId, Level, Message, Position, Team};

/// Indicator colour.
pub type Rgb = [u8; 3];

/// Resolved damage against one target.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hit {
    pub target: EntityId,
    /// Final damage after buff multipliers.
    pub damage: f64,
    /// Buff attached to a robot target by this hit.
    pub buff: Option<Buff>,
}

/// Why an entity was removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeathCause {
    Attack,
    SelfDestruct,
    /// Blast of another robot's self-destruct.
    Blast,
    Disconnected,
    Decay,
}

/// Reason attached to an absolute health update.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HealthCause {
    /// Queued regeneration; clears the regen flag.
    Regeneration,
    /// End-of-round damage to towers cut off from supply.
    Disconnected,
    /// End-of-round report for robots that changed; clears dirty flags.
    Report,
}

/// Economy operation behind a flux or ledger change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EconomyOp {
    Production,
    Spend,
    /// Upkeep paid. Marks the robot as running at full budget.
    Upkeep,
    /// Upkeep could not be paid. Carries no delta.
    UpkeepMissed,
    /// Payload released by a destroyed tree.
    Release,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HealthEntry {
    pub id: EntityId,
    pub health: f64,
}

/// One game event.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Signal {
    /// Move or turn in place (`to == from`). Deferred to end of turn.
    Movement {
        robot: EntityId,
        from: Position,
        to: Position,
        direction: Direction,
        delay: u32,
        cost: f64,
    },
    Attack {
        attacker: EntityId,
        target: Position,
        level: Level,
        hits: Vec<Hit>,
    },
    Broadcast {
        sender: EntityId,
        message: Message,
        recipients: Vec<EntityId>,
        cost: f64,
    },
    /// Mobile unit created. `parent` is `None` for units released by trees.
    Spawn {
        parent: Option<EntityId>,
        robot: EntityId,
        robot_type: RobotType,
        team: Team,
        location: Position,
        direction: Direction,
        cost: f64,
        wake_delay: u32,
    },
    Death {
        victim: EntityId,
        team: Team,
        killer: Option<EntityId>,
        cause: DeathCause,
    },
    /// Structure created; its cost is a separate ledger spend.
    Build {
        builder: EntityId,
        robot: EntityId,
        robot_type: RobotType,
        team: Team,
        location: Position,
    },
    SelfDestruct {
        robot: EntityId,
        location: Position,
        hits: Vec<Hit>,
    },
    HealthChange {
        entries: Vec<HealthEntry>,
        cause: HealthCause,
    },
    ControlBitsChange {
        robot: EntityId,
        bits: u64,
    },
    BytecodesUsed {
        robot: EntityId,
        bytecodes: u32,
    },
    IndicatorDot {
        robot: EntityId,
        location: Position,
        color: Rgb,
    },
    IndicatorLine {
        robot: EntityId,
        from: Position,
        to: Position,
        color: Rgb,
    },
    IndicatorString {
        robot: EntityId,
        index: usize,
        text: String,
    },
    TeamResourceChange {
        team: Team,
        delta: f64,
        op: EconomyOp,
    },
    /// Flux change on one robot outside of an action.
    FluxChange {
        robot: EntityId,
        delta: f64,
        op: EconomyOp,
    },
    MatchObservation {
        robot: EntityId,
        observation: String,
    },
    /// Externally forced relocation. Idle timers are untouched.
    MovementOverride {
        robot: EntityId,
        to: Position,
    },
    TreeGrowth {
        tree: EntityId,
        amount: f64,
    },
    TreeDecay {
        tree: EntityId,
        amount: f64,
    },
    TreeWater {
        robot: EntityId,
        tree: EntityId,
        amount: f64,
    },
    /// Queue regeneration on nearby friendly robots.
    Regen {
        source: EntityId,
        targets: Vec<EntityId>,
        cost: f64,
    },
    TeamMemory {
        team: Team,
        index: usize,
        value: i64,
        mask: i64,
    },
    /// End-of-turn snapshot; also clears the broadcast flag and the inbox.
    RobotInfo {
        robot: EntityId,
        flux: f64,
        movement_idle: u32,
        attack_idle: u32,
        upkeep_paid: bool,
    },
}

impl Signal {
    /// Short variant label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Signal::Movement { .. } => "movement",
            Signal::Attack { .. } => "attack",
            Signal::Broadcast { .. } => "broadcast",
            Signal::Spawn { .. } => "spawn",
            Signal::Death { .. } => "death",
            Signal::Build { .. } => "build",
            Signal::SelfDestruct { .. } => "self_destruct",
            Signal::HealthChange { .. } => "health_change",
            Signal::ControlBitsChange { .. } => "control_bits",
            Signal::BytecodesUsed { .. } => "bytecodes_used",
            Signal::IndicatorDot { .. } => "indicator_dot",
            Signal::IndicatorLine { .. } => "indicator_line",
            Signal::IndicatorString { .. } => "indicator_string",
            Signal::TeamResourceChange { .. } => "team_resource",
            Signal::FluxChange { .. } => "flux_change",
            Signal::MatchObservation { .. } => "match_observation",
            Signal::MovementOverride { .. } => "movement_override",
            Signal::TreeGrowth { .. } => "tree_growth",
            Signal::TreeDecay { .. } => "tree_decay",
            Signal::TreeWater { .. } => "tree_water",
            Signal::Regen { .. } => "regen",
            Signal::TeamMemory { .. } => "team_memory",
            Signal::RobotInfo { .. } => "robot_info",
        }
    }
}
