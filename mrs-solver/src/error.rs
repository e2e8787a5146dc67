//! `OptionsError`: the CLI/config/loader diagnostic codes, and `SolverError`,
//! the top-level error `mrs-solver::solve::run` returns.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum OptionsError {
    #[error("no instance file given (pass --minrank=FILE)")]
    MissingInstance,

    #[error("instance file {path:?} not found or unreadable")]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed instance file header: {detail}")]
    MalformedHeader { detail: String },

    #[error("target rank {r} out of range for a {n}x{m} instance")]
    RankOutOfRange { r: u32, n: u32, m: u32 },

    #[error("--thread must be a positive integer, got `{raw}`")]
    InvalidThreadCount { raw: String },

    #[error("malformed --mdeg/--combi-mdeg argument: {detail}")]
    MalformedMultiDegree { detail: String },

    #[error("--mac-row value {value} out of range")]
    MacRowOutOfRange { value: u64 },

    #[error("--mdeg and --combi-mdeg cannot both be given")]
    ConflictingMultiDegreeFlags,

    #[error("unrecognized command-line flag: {flag}")]
    UnrecognizedFlag { flag: String },
}

impl OptionsError {
    /// The `opt_parse_*` diagnostic code table's numbering (1..9).
    pub fn code(&self) -> u8 {
        match self {
            OptionsError::MissingInstance => 1,
            OptionsError::FileNotFound { .. } => 2,
            OptionsError::MalformedHeader { .. } => 3,
            OptionsError::RankOutOfRange { .. } => 4,
            OptionsError::InvalidThreadCount { .. } => 5,
            OptionsError::MalformedMultiDegree { .. } => 6,
            OptionsError::MacRowOutOfRange { .. } => 7,
            OptionsError::ConflictingMultiDegreeFlags => 8,
            OptionsError::UnrecognizedFlag { .. } => 9,
        }
    }

    pub fn exit_code(&self) -> i32 {
        10 + self.code() as i32
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    #[error(transparent)]
    Options(#[from] OptionsError),
    #[error(transparent)]
    Ks(#[from] mrs_ks::KsError),
    #[error(transparent)]
    Sparse(#[from] mrs_sparse::SparseError),
    #[error(transparent)]
    Lanczos(#[from] mrs_lanczos::LanczosError),
}

impl SolverError {
    pub fn exit_code(&self) -> i32 {
        match self {
            SolverError::Options(e) => e.exit_code(),
            SolverError::Ks(_) | SolverError::Sparse(_) | SolverError::Lanczos(_) => 1,
        }
    }
}
