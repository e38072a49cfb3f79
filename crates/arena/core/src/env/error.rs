/// Errors raised when a required oracle is missing from the environment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum OracleError {
    #[error("map oracle not available")]
    MapNotAvailable,

    #[error("rng oracle not available")]
    RngNotAvailable,
}
