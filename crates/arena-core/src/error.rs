//! Error type shared by every simulation crate.
//!
//! Nothing here is fatal: callers isolate a failing entity or collision pair,
//! log it, and keep the tick going.

use std::fmt;

#[derive(Debug)]
pub enum SimError {
    /// A position, heading or timer became NaN/infinite.
    NonFiniteState { what: &'static str, tick: u64 },
    /// A shape with zero area or non-finite bounds took part in a collision check.
    DegenerateGeometry { what: &'static str },
    /// A referenced entity vanished mid-update.
    MissingEntity { what: &'static str },
    /// A tuning value failed validation.
    InvalidConfig(String),
    /// A tuning file could not be parsed.
    Config(serde_json::Error),
    /// A tuning file could not be read.
    Io(std::io::Error),
}

pub type SimResult<T> = Result<T, SimError>;

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::NonFiniteState { what, tick } => {
                write!(f, "non-finite {what} at tick {tick}")
            }
            SimError::DegenerateGeometry { what } => write!(f, "degenerate geometry: {what}"),
            SimError::MissingEntity { what } => write!(f, "missing entity: {what}"),
            SimError::InvalidConfig(msg) => write!(f, "invalid tuning: {msg}"),
            SimError::Config(err) => write!(f, "tuning parse error: {err}"),
            SimError::Io(err) => write!(f, "tuning read error: {err}"),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::Config(err) => Some(err),
            SimError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for SimError {
    fn from(err: serde_json::Error) -> Self {
        SimError::Config(err)
    }
}

impl From<std::io::Error> for SimError {
    fn from(err: std::io::Error) -> Self {
        SimError::Io(err)
    }
}

/// Reject NaN/infinite vectors before they poison the rest of the tick.
pub fn ensure_finite(v: glam::Vec2, what: &'static str, tick: u64) -> SimResult<()> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(SimError::NonFiniteState { what, tick })
    }
}
