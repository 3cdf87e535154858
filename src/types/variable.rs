//! Defines the measured quantities that can be charted, and how each one is requested
//! from the archive and displayed.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A daily quantity available from the weather archive.
///
/// The order of [`Variable::ALL`] is the catalogue order, so a variable can also be
/// addressed by its index (as a dropdown selection would).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Variable {
    /// Daily minimum air temperature at 2 m.
    TemperatureMin,
    /// Daily maximum air temperature at 2 m.
    TemperatureMax,
    /// Daily precipitation total, accumulated over the year when charted.
    Precipitation,
}

/// Describes how a [`Variable`] is fetched, aggregated and displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VariableSpec {
    /// Human-readable title of the chart.
    pub description: &'static str,
    /// Name of the daily field in the archive API (`daily=<field>`).
    pub api_field: &'static str,
    /// `true` for quantities summed over the year (rainfall), `false` for
    /// instantaneous ones (temperature).
    pub cumulative: bool,
    /// Appended to axis ticks and tooltip values.
    pub unit_suffix: &'static str,
}

impl VariableSpec {
    /// Formats a value for an axis tick or tooltip.
    ///
    /// ```
    /// use climate_archive::Variable;
    ///
    /// assert_eq!(Variable::TemperatureMax.spec().format_tick(12.5), "12.5°");
    /// assert_eq!(Variable::Precipitation.spec().format_tick(300.0), "300mm");
    /// ```
    pub fn format_tick(&self, value: f64) -> String {
        format!("{}{}", value, self.unit_suffix)
    }
}

impl Variable {
    pub const ALL: [Variable; 3] = [
        Variable::TemperatureMin,
        Variable::TemperatureMax,
        Variable::Precipitation,
    ];

    pub fn spec(&self) -> VariableSpec {
        match self {
            Variable::TemperatureMin => VariableSpec {
                description: "Température Min",
                api_field: "temperature_2m_min",
                cumulative: false,
                unit_suffix: "°",
            },
            Variable::TemperatureMax => VariableSpec {
                description: "Température Max",
                api_field: "temperature_2m_max",
                cumulative: false,
                unit_suffix: "°",
            },
            Variable::Precipitation => VariableSpec {
                description: "Cumul Précipitations",
                api_field: "precipitation_sum",
                cumulative: true,
                unit_suffix: "mm",
            },
        }
    }

    /// Position of this variable in [`Variable::ALL`].
    pub fn index(&self) -> usize {
        match self {
            Variable::TemperatureMin => 0,
            Variable::TemperatureMax => 1,
            Variable::Precipitation => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Variable> {
        Self::ALL.get(index).copied()
    }

    pub fn is_cumulative(&self) -> bool {
        self.spec().cumulative
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.spec().api_field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trip() {
        for variable in Variable::ALL {
            assert_eq!(Variable::from_index(variable.index()), Some(variable));
        }
        assert_eq!(Variable::from_index(3), None);
    }

    #[test]
    fn test_only_precipitation_is_cumulative() {
        assert!(!Variable::TemperatureMin.is_cumulative());
        assert!(!Variable::TemperatureMax.is_cumulative());
        assert!(Variable::Precipitation.is_cumulative());
    }

    #[test]
    fn test_display_uses_api_field() {
        assert_eq!(Variable::Precipitation.to_string(), "precipitation_sum");
    }
}
