//! Engine configuration: cost bound, time limit, verbosity, cost type.
//!
//! Every block deserializes from JSON with `serde`. Bounds and time limits
//! accept either a number or the string `"infinity"`. Negative values parse
//! fine; the engine rejects them before the first search step.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize, Serializer};
use tracing::level_filters::LevelFilter;
use waypoint_kernel::cost::OperatorCost;

const INFINITY: &str = "infinity";

/// How much the search reports.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    Silent,
    #[default]
    Normal,
    Verbose,
    Debug,
}

impl Verbosity {
    /// The `tracing` level that shows exactly what this verbosity prints.
    /// Warnings and errors are never silenced.
    #[must_use]
    pub fn level_filter(self) -> LevelFilter {
        match self {
            Self::Silent => LevelFilter::WARN,
            Self::Normal => LevelFilter::INFO,
            Self::Verbose => LevelFilter::DEBUG,
            Self::Debug => LevelFilter::TRACE,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrInfinity<T> {
    Number(T),
    Named(String),
}

/// Exclusive limit on accepted real path cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(try_from = "NumberOrInfinity<i64>")]
pub struct Bound(i32);

impl Bound {
    pub const INFINITE: Self = Self(i32::MAX);

    #[must_use]
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    #[must_use]
    pub fn value(self) -> i32 {
        self.0
    }

    #[must_use]
    pub fn is_infinite(self) -> bool {
        self == Self::INFINITE
    }
}

impl Default for Bound {
    fn default() -> Self {
        Self::INFINITE
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_infinite() {
            f.write_str(INFINITY)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl TryFrom<NumberOrInfinity<i64>> for Bound {
    type Error = String;

    fn try_from(repr: NumberOrInfinity<i64>) -> Result<Self, Self::Error> {
        match repr {
            NumberOrInfinity::Number(n) => i32::try_from(n)
                .map(Self)
                .map_err(|_| format!("bound {n} does not fit in 32 bits")),
            NumberOrInfinity::Named(name) if name == INFINITY => Ok(Self::INFINITE),
            NumberOrInfinity::Named(name) => {
                Err(format!("bound must be an integer or \"{INFINITY}\", got \"{name}\""))
            }
        }
    }
}

impl Serialize for Bound {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_infinite() {
            serializer.serialize_str(INFINITY)
        } else {
            serializer.serialize_i32(self.0)
        }
    }
}

/// Wall-clock limit in seconds; `None` is infinite.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(try_from = "NumberOrInfinity<f64>")]
pub struct MaxTime(Option<f64>);

impl MaxTime {
    pub const INFINITE: Self = Self(None);

    #[must_use]
    pub const fn seconds(seconds: f64) -> Self {
        Self(Some(seconds))
    }

    /// Seconds, or `None` when infinite.
    #[must_use]
    pub fn as_seconds(self) -> Option<f64> {
        self.0
    }

    /// Negative and NaN limits are invalid.
    #[must_use]
    pub fn is_valid(self) -> bool {
        match self.0 {
            Some(seconds) => seconds >= 0.0,
            None => true,
        }
    }

    /// The limit as a duration; `None` when infinite or too large to
    /// represent, which never expires either.
    #[must_use]
    pub fn duration(self) -> Option<Duration> {
        self.0
            .and_then(|seconds| Duration::try_from_secs_f64(seconds).ok())
    }
}

impl fmt::Display for MaxTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(seconds) => write!(f, "{seconds}s"),
            None => f.write_str(INFINITY),
        }
    }
}

impl TryFrom<NumberOrInfinity<f64>> for MaxTime {
    type Error = String;

    fn try_from(repr: NumberOrInfinity<f64>) -> Result<Self, Self::Error> {
        match repr {
            NumberOrInfinity::Number(seconds) => Ok(Self(Some(seconds))),
            NumberOrInfinity::Named(name) if name == INFINITY => Ok(Self::INFINITE),
            NumberOrInfinity::Named(name) => Err(format!(
                "max_time must be a number or \"{INFINITY}\", got \"{name}\""
            )),
        }
    }
}

impl Serialize for MaxTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Some(seconds) => serializer.serialize_f64(seconds),
            None => serializer.serialize_str(INFINITY),
        }
    }
}

/// Options shared by every search algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchEngineOptions {
    /// Exclusive bound on real path cost, used for pruning.
    pub bound: Bound,
    /// Checked only between search steps, so one slow step can overrun it.
    pub max_time: MaxTime,
    pub verbosity: Verbosity,
    /// Cost transformation seen by the search (not by the bound).
    pub cost_type: OperatorCost,
}
