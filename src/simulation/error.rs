use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while loading parameters or building the initial state.
#[derive(Debug, Error)]
pub enum Error {
    /// A simulation parameter is outside of its valid range.
    #[error("invalid parameter: {0}")]
    InvalidParam(String),

    /// An override file names a parameter that does not exist.
    #[error("unknown parameter `{0}`")]
    UnknownParam(String),

    /// The particle count makes a buffer size overflow `usize`.
    #[error("buffer sizes overflow for {num_particles} particles")]
    CapacityOverflow { num_particles: usize },

    /// The allocator refused to provide a buffer.
    #[error("failed to allocate {len} elements for `{buffer}`")]
    AllocationFailed { buffer: &'static str, len: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}
