//! Error type for the fallible edges of the engine (config loading).
//!
//! The tick itself never fails: cap pressure is a `bool` from
//! `create_agent` and stale targets fall back to idle.

use crate::config::ConfigIssue;

#[derive(Debug)]
pub enum SimError {
    Io(std::io::Error),
    Json(serde_json::Error),
    InvalidConfig(Vec<ConfigIssue>),
}

impl From<std::io::Error> for SimError {
    fn from(e: std::io::Error) -> Self {
        SimError::Io(e)
    }
}

impl From<serde_json::Error> for SimError {
    fn from(e: serde_json::Error) -> Self {
        SimError::Json(e)
    }
}

impl std::fmt::Display for SimError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimError::Io(e) => write!(f, "IO error: {}", e),
            SimError::Json(e) => write!(f, "Config parse error: {}", e),
            SimError::InvalidConfig(issues) => {
                write!(f, "Invalid config: ")?;
                for (i, issue) in issues.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{}", issue)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::Io(e) => Some(e),
            SimError::Json(e) => Some(e),
            SimError::InvalidConfig(_) => None,
        }
    }
}
