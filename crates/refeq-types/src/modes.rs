use std::fmt;

use serde::{Deserialize, Serialize};

/// A single leniency switch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonMode {
    /// Sequences are compared as multisets instead of index by index.
    LenientOrder,
    /// Default values on the expected side match anything.
    IgnoreDefaults,
    /// Temporal values only need to be present on both sides.
    LenientDates,
}

impl ComparisonMode {
    pub const ALL: [ComparisonMode; 3] = [
        ComparisonMode::LenientOrder,
        ComparisonMode::IgnoreDefaults,
        ComparisonMode::LenientDates,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LenientOrder => "lenient_order",
            Self::IgnoreDefaults => "ignore_defaults",
            Self::LenientDates => "lenient_dates",
        }
    }
}

/// The set of active leniency modes for one top-level comparison.
///
/// Modes are independent flags; every combination is valid. The set is
/// fixed for the whole traversal of a comparison.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonModes {
    pub lenient_order: bool,
    pub ignore_defaults: bool,
    pub lenient_dates: bool,
}

impl ComparisonModes {
    /// No leniency at all.
    pub const fn strict() -> Self {
        Self {
            lenient_order: false,
            ignore_defaults: false,
            lenient_dates: false,
        }
    }

    /// Lenient order plus ignored defaults.
    pub const fn lenient() -> Self {
        Self {
            lenient_order: true,
            ignore_defaults: true,
            lenient_dates: false,
        }
    }

    pub fn contains(&self, mode: ComparisonMode) -> bool {
        match mode {
            ComparisonMode::LenientOrder => self.lenient_order,
            ComparisonMode::IgnoreDefaults => self.ignore_defaults,
            ComparisonMode::LenientDates => self.lenient_dates,
        }
    }

    /// A copy of this set with `mode` switched on.
    #[must_use]
    pub fn with(mut self, mode: ComparisonMode) -> Self {
        self.insert(mode);
        self
    }

    pub fn insert(&mut self, mode: ComparisonMode) {
        match mode {
            ComparisonMode::LenientOrder => self.lenient_order = true,
            ComparisonMode::IgnoreDefaults => self.ignore_defaults = true,
            ComparisonMode::LenientDates => self.lenient_dates = true,
        }
    }

    /// Union of two mode sets.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self {
            lenient_order: self.lenient_order || other.lenient_order,
            ignore_defaults: self.ignore_defaults || other.ignore_defaults,
            lenient_dates: self.lenient_dates || other.lenient_dates,
        }
    }

    pub fn is_strict(&self) -> bool {
        *self == Self::strict()
    }

    /// Active modes in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = ComparisonMode> + '_ {
        ComparisonMode::ALL
            .into_iter()
            .filter(move |mode| self.contains(*mode))
    }
}

impl FromIterator<ComparisonMode> for ComparisonModes {
    fn from_iter<I: IntoIterator<Item = ComparisonMode>>(iter: I) -> Self {
        let mut modes = Self::strict();
        for mode in iter {
            modes.insert(mode);
        }
        modes
    }
}

impl From<&[ComparisonMode]> for ComparisonModes {
    fn from(modes: &[ComparisonMode]) -> Self {
        modes.iter().copied().collect()
    }
}

impl fmt::Display for ComparisonModes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_strict() {
            return f.write_str("strict");
        }
        let names: Vec<_> = self.iter().map(|m| m.as_str()).collect();
        f.write_str(&names.join("+"))
    }
}
