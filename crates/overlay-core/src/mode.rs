//! Merge mode selection
//!
//! The mode is chosen once by whichever entry point runs and passed down
//! explicitly. It decides where the merged tree is written and whether it is
//! kept live afterwards.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// How the merged output will be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// One-shot merge into the build output before packaging.
    #[default]
    Build,

    /// Merge into the served public directory, then reconcile changes live.
    ///
    /// The output is marked ignored since it is regenerated on every start.
    Serve,
}

impl Mode {
    /// Whether the output should carry an ignore marker.
    pub fn writes_marker(&self) -> bool {
        matches!(self, Mode::Serve)
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "build" => Ok(Mode::Build),
            "serve" | "dev" | "watch" => Ok(Mode::Serve),
            _ => Err(Error::InvalidMode {
                mode: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Build => write!(f, "build"),
            Mode::Serve => write!(f, "serve"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_aliases() {
        assert_eq!("BUILD".parse::<Mode>().unwrap(), Mode::Build);
        assert_eq!("dev".parse::<Mode>().unwrap(), Mode::Serve);
        assert_eq!("watch".parse::<Mode>().unwrap(), Mode::Serve);
        assert!(matches!(
            "package".parse::<Mode>(),
            Err(Error::InvalidMode { .. })
        ));
    }

    #[test]
    fn only_serve_writes_marker() {
        assert!(Mode::Serve.writes_marker());
        assert!(!Mode::Build.writes_marker());
    }
}
