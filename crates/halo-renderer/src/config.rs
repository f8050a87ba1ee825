//! Shared configuration enums and defaults.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Selector used when no canvas (or an empty selector) is supplied.
pub const DEFAULT_CANVAS_SELECTOR: &str = "canvas[data-halo-renderer]";

/// Pixel format used when neither the caller nor the runtime names one.
pub const FALLBACK_FORMAT: &str = "bgra8unorm";

/// Context kind requested from canvas targets.
pub const SURFACE_CONTEXT_KIND: &str = "webgpu";

/// Adapter power preference.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum PowerPreference {
    #[default]
    HighPerformance,
    LowPower,
}

impl PowerPreference {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HighPerformance => "high-performance",
            Self::LowPower => "low-power",
        }
    }
}

/// Surface compositing mode.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum AlphaMode {
    #[default]
    Premultiplied,
    Opaque,
}

impl AlphaMode {
    /// Maps the boolean `alpha` creation option.
    pub fn from_alpha(alpha: bool) -> Self {
        if alpha { Self::Premultiplied } else { Self::Opaque }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Premultiplied => "premultiplied",
            Self::Opaque => "opaque",
        }
    }
}

/// Returned when a configuration string names no known variant.
#[derive(Debug, Clone, Error, Eq, PartialEq)]
#[error("unknown {kind} `{value}`")]
pub struct ParseConfigError {
    pub kind: &'static str,
    pub value: String,
}

impl FromStr for PowerPreference {
    type Err = ParseConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "high-performance" => Ok(Self::HighPerformance),
            "low-power" => Ok(Self::LowPower),
            other => Err(ParseConfigError {
                kind: "power preference",
                value: other.to_string(),
            }),
        }
    }
}

impl FromStr for AlphaMode {
    type Err = ParseConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "premultiplied" => Ok(Self::Premultiplied),
            "opaque" => Ok(Self::Opaque),
            other => Err(ParseConfigError {
                kind: "alpha mode",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for PowerPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for AlphaMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alpha_flag_maps_to_compositing_mode() {
        assert_eq!(AlphaMode::from_alpha(true), AlphaMode::Premultiplied);
        assert_eq!(AlphaMode::from_alpha(false), AlphaMode::Opaque);
    }

    #[test]
    fn power_preference_parses_webgpu_names() {
        assert_eq!("low-power".parse(), Ok(PowerPreference::LowPower));
        assert_eq!(" high-performance ".parse(), Ok(PowerPreference::HighPerformance));
        assert_eq!(PowerPreference::default(), PowerPreference::HighPerformance);

        let err = "turbo".parse::<PowerPreference>().unwrap_err();
        assert_eq!(err.to_string(), "unknown power preference `turbo`");
    }

    #[test]
    fn display_round_trips_through_parse() {
        for mode in [AlphaMode::Premultiplied, AlphaMode::Opaque] {
            assert_eq!(mode.to_string().parse(), Ok(mode));
        }
    }
}
