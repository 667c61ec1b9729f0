//! Scan error types.

use thiserror::Error;

use crate::pos::BlockPos;
use crate::report::Notice;

/// Everything that can end a scan invocation early.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    /// The requester has no complete selection.
    #[error("no active selection")]
    NoActiveVolume,

    /// The raw type input did not resolve to a known block.
    #[error("unknown block type: {0:?}")]
    UnknownType(String),

    /// A volume whose minimum corner exceeds its maximum on some axis.
    #[error("invalid volume: min {min} is not <= max {max}")]
    InvalidVolume { min: BlockPos, max: BlockPos },

    /// The block source could not answer for a cell inside the volume.
    #[error("block at {pos} is unavailable")]
    Unavailable { pos: BlockPos },

    /// The scan was cancelled before it finished.
    #[error("scan cancelled")]
    Cancelled,

    /// The worker panicked (e.g. inside a block source).
    #[error("scan worker panicked")]
    WorkerPanicked,
}

impl ScanError {
    /// The fixed requester-facing notice for this error.
    #[must_use]
    pub fn notice(&self) -> Notice {
        match self {
            Self::NoActiveVolume => Notice::SelectionRequired,
            Self::UnknownType(input) => Notice::UnknownType {
                input: input.clone(),
            },
            Self::InvalidVolume { .. } | Self::Unavailable { .. } | Self::WorkerPanicked => {
                Notice::ScanFailed
            }
            Self::Cancelled => Notice::Cancelled,
        }
    }
}

/// Result type for scan operations.
pub type ScanResult<T> = Result<T, ScanError>;
