use serde::{Deserialize, Serialize};
use thiserror::Error;

fn default_speed_multiplier() -> f64 {
    1.0
}

fn default_herb_move_cost() -> f64 {
    0.5
}

fn default_herb_grass_gain() -> f64 {
    3.0
}

fn default_herb_reproduce_energy() -> f64 {
    10.0
}

fn default_herb_reproduce_cooldown() -> u32 {
    5
}

fn default_grass_regrow_time() -> u32 {
    10
}

fn default_carn_move_cost() -> f64 {
    1.0
}

fn default_carn_prey_gain() -> f64 {
    8.0
}

fn default_carn_reproduce_energy() -> f64 {
    30.0
}

fn default_initial_herbivores() -> u32 {
    100
}

fn default_initial_carnivores() -> u32 {
    20
}

/// Tunable rates for one tick. The driver samples one snapshot before each
/// tick and the engine reads nothing else, so live edits land on a tick
/// boundary and never mid-pass.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Params {
    /// Ticks accumulated per displayed frame by the pacer. Zero freezes
    /// simulated time while rendering continues.
    #[serde(default = "default_speed_multiplier")]
    pub speed_multiplier: f64,
    /// Energy every herbivore pays at the start of its turn, moving or not.
    #[serde(default = "default_herb_move_cost")]
    pub herb_move_cost: f64,
    /// Energy gained by eating a grass cell.
    #[serde(default = "default_herb_grass_gain")]
    pub herb_grass_gain: f64,
    /// Strict threshold a herbivore's energy must exceed to reproduce.
    #[serde(default = "default_herb_reproduce_energy")]
    pub herb_reproduce_energy: f64,
    /// Ticks a herbivore (and its offspring) waits between reproductions.
    #[serde(default = "default_herb_reproduce_cooldown")]
    pub herb_reproduce_cooldown: u32,
    /// Updates a consumed cell stays empty before regrowing.
    #[serde(default = "default_grass_regrow_time")]
    pub grass_regrow_time: u32,
    /// Energy every carnivore pays at the start of its turn.
    #[serde(default = "default_carn_move_cost")]
    pub carn_move_cost: f64,
    /// Energy gained per herbivore killed.
    #[serde(default = "default_carn_prey_gain")]
    pub carn_prey_gain: f64,
    /// Strict threshold a carnivore's energy must exceed to reproduce.
    #[serde(default = "default_carn_reproduce_energy")]
    pub carn_reproduce_energy: f64,
    /// Herbivore headcount on reset.
    #[serde(default = "default_initial_herbivores")]
    pub initial_herbivores: u32,
    /// Carnivore headcount on reset.
    #[serde(default = "default_initial_carnivores")]
    pub initial_carnivores: u32,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            speed_multiplier: default_speed_multiplier(),
            herb_move_cost: default_herb_move_cost(),
            herb_grass_gain: default_herb_grass_gain(),
            herb_reproduce_energy: default_herb_reproduce_energy(),
            herb_reproduce_cooldown: default_herb_reproduce_cooldown(),
            grass_regrow_time: default_grass_regrow_time(),
            carn_move_cost: default_carn_move_cost(),
            carn_prey_gain: default_carn_prey_gain(),
            carn_reproduce_energy: default_carn_reproduce_energy(),
            initial_herbivores: default_initial_herbivores(),
            initial_carnivores: default_initial_carnivores(),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ParamsError {
    #[error("{field} must be finite, got {value}")]
    NotFinite { field: &'static str, value: f64 },
    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },
}

/// Shared check for rate values arriving from any boundary (scenario files,
/// the control surface). Rejects rather than clamps, so a bad value never
/// silently turns into a different simulation.
pub(crate) fn validate_rates(fields: &[(&'static str, f64)]) -> Result<(), ParamsError> {
    for &(field, value) in fields {
        if !value.is_finite() {
            return Err(ParamsError::NotFinite { field, value });
        }
        if value < 0.0 {
            return Err(ParamsError::Negative { field, value });
        }
    }
    Ok(())
}

impl Params {
    pub fn validate(&self) -> Result<(), ParamsError> {
        validate_rates(&[
            ("speed_multiplier", self.speed_multiplier),
            ("herb_move_cost", self.herb_move_cost),
            ("herb_grass_gain", self.herb_grass_gain),
            ("herb_reproduce_energy", self.herb_reproduce_energy),
            ("carn_move_cost", self.carn_move_cost),
            ("carn_prey_gain", self.carn_prey_gain),
            ("carn_reproduce_energy", self.carn_reproduce_energy),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert_eq!(Params::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_negative_rates() {
        let params = Params {
            herb_move_cost: -0.5,
            ..Params::default()
        };
        let err = params.validate().unwrap_err();
        assert_eq!(
            err,
            ParamsError::Negative {
                field: "herb_move_cost",
                value: -0.5
            }
        );
    }

    #[test]
    fn rejects_non_finite_rates() {
        let params = Params {
            carn_prey_gain: f64::NAN,
            ..Params::default()
        };
        assert!(matches!(
            params.validate(),
            Err(ParamsError::NotFinite {
                field: "carn_prey_gain",
                ..
            })
        ));
    }

    #[test]
    fn zero_rates_are_legal() {
        let params = Params {
            speed_multiplier: 0.0,
            herb_move_cost: 0.0,
            herb_grass_gain: 0.0,
            ..Params::default()
        };
        assert_eq!(params.validate(), Ok(()));
    }

    #[test]
    fn empty_yaml_mapping_yields_defaults() {
        let params: Params = serde_yaml::from_str("{}").unwrap();
        assert_eq!(params, Params::default());
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let params: Params = serde_yaml::from_str("herb_grass_gain: 4.5\ngrass_regrow_time: 3").unwrap();
        assert_eq!(params.herb_grass_gain, 4.5);
        assert_eq!(params.grass_regrow_time, 3);
        assert_eq!(params.herb_move_cost, 0.5);
        assert_eq!(params.initial_carnivores, 20);
    }
}
