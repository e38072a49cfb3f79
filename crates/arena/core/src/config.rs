/// Rule constants and tunable parameters for a match.
///
/// Every field has a default; content files only need to override what they
/// change. The struct is copied into the engine at setup and never mutated
/// afterwards.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Match ends after this round regardless of state.
    pub max_rounds: u32,
    /// From this round on towers no longer accept regeneration.
    pub time_limit_round: u32,
    /// Bytecode budget handed to programs whose upkeep is paid.
    pub bytecode_limit: u32,

    /// Idle rounds applied to both timers of freshly spawned robots.
    pub wake_delay: u32,
    /// Health restored by one queued regeneration.
    pub regen_amount: f64,
    /// Flux spent by a regenerating robot.
    pub regen_cost: f64,
    pub regen_radius_squared: i32,

    /// Flux charged to every upkeep-paying robot at the start of its turn.
    pub unit_upkeep: f64,
    pub min_production: f64,
    pub max_production: f64,
    /// Squared radius beyond which a neighbouring archon no longer reduces production.
    pub production_penalty_radius_squared: i32,

    /// End-of-round damage for towers cut off from their team's supply network.
    pub disconnected_node_damage: f64,

    pub broadcast_cost: f64,
    pub broadcast_radius_squared: i32,

    pub self_destruct_base_damage: f64,
    /// Fraction of the exploding robot's remaining health added to the blast.
    pub self_destruct_damage_factor: f64,

    /// Damage-received bonus of the buff applied by disrupter hits.
    pub disrupted_damage_bonus: f64,
    pub disrupted_duration: u32,

    pub tree_max_health: f64,
    pub neutral_tree_health_rate: f64,
    /// Owned trees start at this fraction of `tree_max_health`.
    pub tree_initial_fraction: f64,
    /// Trees grow while their age is at most this many rounds.
    pub tree_growth_rounds: u32,
    pub tree_growth: f64,
    pub tree_decay: f64,
    pub tree_water_amount: f64,
    /// Fraction of a decaying owned tree's health credited to its team each round.
    pub tree_yield_rate: f64,
}

impl GameConfig {
    // ===== compile-time limits used as container capacities =====
    pub const MAX_BUFFS: usize = 4;
    pub const NUMBER_OF_INDICATOR_STRINGS: usize = 3;
    pub const TEAM_MEMORY_SIZE: usize = 32;

    // ===== fixed rule geometry =====
    /// Trees must be adjacent (orthogonal or diagonal) to be watered.
    pub const WATER_RADIUS_SQUARED: i32 = 2;
    pub const SELF_DESTRUCT_RADIUS_SQUARED: i32 = 2;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_MAX_ROUNDS: u32 = 3000;
    pub const DEFAULT_TIME_LIMIT_ROUND: u32 = 2500;
    pub const DEFAULT_BYTECODE_LIMIT: u32 = 10_000;
    pub const DEFAULT_WAKE_DELAY: u32 = 20;

    pub fn new() -> Self {
        Self {
            max_rounds: Self::DEFAULT_MAX_ROUNDS,
            time_limit_round: Self::DEFAULT_TIME_LIMIT_ROUND,
            bytecode_limit: Self::DEFAULT_BYTECODE_LIMIT,
            wake_delay: Self::DEFAULT_WAKE_DELAY,
            regen_amount: 0.2,
            regen_cost: 1.0,
            regen_radius_squared: 9,
            unit_upkeep: 0.15,
            min_production: 0.5,
            max_production: 1.0,
            production_penalty_radius_squared: 16,
            disconnected_node_damage: 1.0,
            broadcast_cost: 0.05,
            broadcast_radius_squared: 64,
            self_destruct_base_damage: 6.0,
            self_destruct_damage_factor: 0.5,
            disrupted_damage_bonus: 0.25,
            disrupted_duration: 5,
            tree_max_health: 100.0,
            neutral_tree_health_rate: 10.0,
            tree_initial_fraction: 0.2,
            tree_growth_rounds: 80,
            tree_growth: 1.0,
            tree_decay: 1.0,
            tree_water_amount: 10.0,
            tree_yield_rate: 0.1,
        }
    }

    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    #[inline]
    pub fn time_limit_reached(&self, round: u32) -> bool {
        round >= self.time_limit_round
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
