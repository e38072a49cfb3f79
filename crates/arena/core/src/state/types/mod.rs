mod buffs;
mod common;
mod entities;
mod ledger;
mod robot;
mod schedule;
mod tree;
mod world;

pub use buffs::{Buff, BuffKind, Buffs};
pub use common::{Direction, EntityId, Level, Position, Round, Team};
pub use entities::EntitiesState;
pub use ledger::{TeamLedger, TeamMemory};
pub use robot::{DirtyFlags, Envelope, Message, Robot};
pub use schedule::{ActiveTurn, MatchPhase, RoundSchedule};
pub use tree::Tree;
pub use world::{TileMap, TileSlots, WorldState};
