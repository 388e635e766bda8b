use thiserror::Error;

/// Invalid startup configuration.
///
/// Raised once at construction; a running simulation never fails.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config JSON could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("world size must be positive, got {width}x{height}")]
    WorldSize { width: f32, height: f32 },

    #[error("particle count must be positive")]
    NoParticles,

    #[error("player particle count {players} exceeds total particle count {total}")]
    TooManyPlayers { players: usize, total: usize },

    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f32 },

    #[error("grid cell size {cell_size} is smaller than interaction radius {radius}")]
    CellSmallerThanRadius { cell_size: f32, radius: f32 },

    #[error("density scale must be at least 1")]
    DensityScale,
}

/// Failure to construct a simulation
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to spawn force worker thread: {0}")]
    WorkerSpawn(#[from] std::io::Error),

    #[error("particle ids must be exactly 0..{count}")]
    ParticleIds { count: usize },
}
