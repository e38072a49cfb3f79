//! Match log: header, one record per round, footer.

use crate::engine::{DominationFactor, MatchOutcome};
use crate::state::{GameState, MatchSetup, Round, Team, TeamMemory};

use super::Signal;

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapSummary {
    pub name: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchHeader {
    pub map: MapSummary,
    pub seed: u64,
    pub team_memory: [TeamMemory; 2],
    pub match_index: u32,
    pub total_matches: u32,
}

impl MatchHeader {
    pub fn from_setup(setup: &MatchSetup) -> Self {
        use crate::env::MapOracle;

        let dims = setup.map.dimensions();
        Self {
            map: MapSummary {
                name: setup.map.name().to_string(),
                width: dims.width,
                height: dims.height,
            },
            seed: setup.seed,
            team_memory: setup.team_memory,
            match_index: setup.match_index,
            total_matches: setup.total_matches,
        }
    }
}

/// Signals of one round in application order.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoundRecord {
    pub round: Round,
    pub signals: Vec<Signal>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchFooter {
    pub winner: Team,
    pub factor: DominationFactor,
    pub final_round: Round,
    pub final_resources: [f64; 2],
    pub team_memory: [TeamMemory; 2],
}

impl MatchFooter {
    pub fn new(outcome: &MatchOutcome, state: &GameState) -> Self {
        Self {
            winner: outcome.winner,
            factor: outcome.factor,
            final_round: outcome.round,
            final_resources: state.ledger().balances(),
            team_memory: state.ledger().memories(),
        }
    }
}

/// Framing unit written by persistence sinks.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LogRecord {
    Header(MatchHeader),
    Round(RoundRecord),
    Footer(MatchFooter),
}

/// A complete in-memory match log.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchLog {
    pub header: MatchHeader,
    pub rounds: Vec<RoundRecord>,
    pub footer: Option<MatchFooter>,
}

impl MatchLog {
    pub fn new(header: MatchHeader) -> Self {
        Self {
            header,
            rounds: Vec::new(),
            footer: None,
        }
    }

    /// Appends a record. Headers after the first are ignored.
    pub fn push(&mut self, record: LogRecord) {
        match record {
            LogRecord::Header(_) => {}
            LogRecord::Round(round) => self.rounds.push(round),
            LogRecord::Footer(footer) => self.footer = Some(footer),
        }
    }

    /// Rebuilds a log from framed records. The first record must be a header.
    pub fn from_records(records: impl IntoIterator<Item = LogRecord>) -> Option<Self> {
        let mut records = records.into_iter();
        let LogRecord::Header(header) = records.next()? else {
            return None;
        };
        let mut log = Self::new(header);
        for record in records {
            log.push(record);
        }
        Some(log)
    }

    pub fn records(&self) -> impl Iterator<Item = LogRecord> + '_ {
        std::iter::once(LogRecord::Header(self.header.clone()))
            .chain(self.rounds.iter().cloned().map(LogRecord::Round))
            .chain(self.footer.iter().cloned().map(LogRecord::Footer))
    }

    pub fn signal_count(&self) -> usize {
        self.rounds.iter().map(|r| r.signals.len()).sum()
    }

    /// SHA-256 over the bincode encoding of the whole log.
    #[cfg(feature = "serde")]
    pub fn digest(&self) -> [u8; 32] {
        use sha2::{Digest, Sha256};

        // Every record is derived plain data; see `GameState::digest`.
        let bytes = bincode::serialize(self).expect("match log serialization should not fail");
        Sha256::digest(&bytes).into()
    }
}
