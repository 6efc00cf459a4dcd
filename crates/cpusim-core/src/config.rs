use crate::error::ConfigError;
use crate::policy::Algorithm;
use crate::types::Tick;
use core::str::FromStr;

pub const DEFAULT_CONTEXT_SWITCH: Tick = 8;
pub const DEFAULT_TIME_SLICE: Tick = 80;

/// Which end of the round robin ready queue newly ready processes join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddSide {
    Beginning,
    #[default]
    End,
}

impl FromStr for AddSide {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "BEGINNING" => Ok(AddSide::Beginning),
            "END" => Ok(AddSide::End),
            _ => Err(ConfigError::InvalidAddSide(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimConfig {
    /// Full cost of a context switch; charged as two equal halves.
    pub context_switch: Tick,
    /// Round robin quantum.
    pub time_slice: Tick,
    pub rr_add: AddSide,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            context_switch: DEFAULT_CONTEXT_SWITCH,
            time_slice: DEFAULT_TIME_SLICE,
            rr_add: AddSide::End,
        }
    }
}

impl SimConfig {
    pub fn half_switch(&self) -> Tick {
        self.context_switch / 2
    }

    /// Checks the settings `algorithm` depends on.
    pub fn validate(&self, algorithm: Algorithm) -> Result<(), ConfigError> {
        if self.context_switch % 2 != 0 {
            return Err(ConfigError::OddContextSwitch(self.context_switch));
        }
        if algorithm == Algorithm::RoundRobin && self.time_slice == 0 {
            return Err(ConfigError::ZeroTimeSlice);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_add_side_case_insensitively() {
        assert_eq!("BEGINNING".parse::<AddSide>(), Ok(AddSide::Beginning));
        assert_eq!("end".parse::<AddSide>(), Ok(AddSide::End));
        assert_eq!(
            "middle".parse::<AddSide>(),
            Err(ConfigError::InvalidAddSide("middle".into()))
        );
    }

    #[test]
    fn odd_switch_cost_is_rejected_for_every_algorithm() {
        let config = SimConfig {
            context_switch: 5,
            ..SimConfig::default()
        };
        for algorithm in Algorithm::ALL {
            assert_eq!(
                config.validate(algorithm),
                Err(ConfigError::OddContextSwitch(5))
            );
        }
    }

    #[test]
    fn zero_time_slice_only_matters_for_round_robin() {
        let config = SimConfig {
            time_slice: 0,
            ..SimConfig::default()
        };
        assert!(config.validate(Algorithm::Fcfs).is_ok());
        assert!(config.validate(Algorithm::Srt).is_ok());
        assert_eq!(
            config.validate(Algorithm::RoundRobin),
            Err(ConfigError::ZeroTimeSlice)
        );
    }
}
