//! Read-only collaborators consulted by the kernel.
//!
//! Oracles expose terrain, the supply network and random draws. The [`Env`]
//! aggregate bundles them so the engine never depends on a concrete source.
mod error;
mod map;
mod network;
mod rng;

pub use error::OracleError;
pub use map::{GridMap, MapDimensions, MapOracle, TerrainTile};
pub use network::{NodeGraph, SupplyNetwork};
pub use rng::{DrawPurpose, PcgRng, RngOracle, compute_seed};

/// Aggregates the oracles required by the engine and by signal application.
pub struct Env<'a, M, N, R>
where
    M: MapOracle + ?Sized,
    N: SupplyNetwork + ?Sized,
    R: RngOracle + ?Sized,
{
    map: Option<&'a M>,
    network: Option<&'a N>,
    rng: Option<&'a R>,
}

impl<M, N, R> Clone for Env<'_, M, N, R>
where
    M: MapOracle + ?Sized,
    N: SupplyNetwork + ?Sized,
    R: RngOracle + ?Sized,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<M, N, R> Copy for Env<'_, M, N, R>
where
    M: MapOracle + ?Sized,
    N: SupplyNetwork + ?Sized,
    R: RngOracle + ?Sized,
{
}

pub type GameEnv<'a> = Env<'a, dyn MapOracle + 'a, dyn SupplyNetwork + 'a, dyn RngOracle + 'a>;

impl<'a, M, N, R> Env<'a, M, N, R>
where
    M: MapOracle + ?Sized,
    N: SupplyNetwork + ?Sized,
    R: RngOracle + ?Sized,
{
    pub fn new(map: Option<&'a M>, network: Option<&'a N>, rng: Option<&'a R>) -> Self {
        Self { map, network, rng }
    }

    pub fn with_all(map: &'a M, network: &'a N, rng: &'a R) -> Self {
        Self::new(Some(map), Some(network), Some(rng))
    }

    pub fn empty() -> Self {
        Self {
            map: None,
            network: None,
            rng: None,
        }
    }

    /// # Errors
    ///
    /// Returns `OracleError::MapNotAvailable` if no map oracle was provided.
    pub fn map(&self) -> Result<&'a M, OracleError> {
        self.map.ok_or(OracleError::MapNotAvailable)
    }

    /// The supply network, if the match has one. Without a network every
    /// tower counts as connected.
    pub fn network(&self) -> Option<&'a N> {
        self.network
    }

    /// # Errors
    ///
    /// Returns `OracleError::RngNotAvailable` if no rng oracle was provided.
    pub fn rng(&self) -> Result<&'a R, OracleError> {
        self.rng.ok_or(OracleError::RngNotAvailable)
    }
}

impl<'a, M, N, R> Env<'a, M, N, R>
where
    M: MapOracle + 'a,
    N: SupplyNetwork + 'a,
    R: RngOracle + 'a,
{
    /// Converts this environment into the trait-object based [`GameEnv`].
    pub fn into_game_env(self) -> GameEnv<'a> {
        let map: Option<&'a dyn MapOracle> = self.map.map(|map| map as _);
        let network: Option<&'a dyn SupplyNetwork> = self.network.map(|network| network as _);
        let rng: Option<&'a dyn RngOracle> = self.rng.map(|rng| rng as _);
        Env::new(map, network, rng)
    }
}
