//! Tunables for the engine: animation rates, fade speed, palette size and seed.

use crate::grid::MAX_COLORS;
use thiserror::Error;

/// Slowest accepted animation rate. Below this a step near the far edge of the
/// board can round to nothing in `f32` and the token never arrives.
pub const MIN_RATE: f32 = 0.01;

/// Engine options. Built from the command line by the binary.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Fraction of the remaining distance covered per tick while swapping.
    pub swap_rate: f32,
    /// Fraction of the remaining distance covered per tick while falling.
    pub fall_rate: f32,
    /// Opacity removed per tick while disappearing.
    pub fade_step: u8,
    /// Number of colour classes in play (3..=6).
    pub colors: u8,
    /// RNG seed; `None` picks one at random.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            swap_rate: 0.3,
            fall_rate: 0.25,
            fade_step: 15,
            colors: MAX_COLORS,
            seed: None,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be in (0, 1], got {value}")]
    RateOutOfRange { name: &'static str, value: f32 },
    #[error("{name} must be at least 0.01, got {value}")]
    RateTooSlow { name: &'static str, value: f32 },
    #[error("swap rate {swap} is slower than fall rate {fall}")]
    SwapSlowerThanFall { swap: f32, fall: f32 },
    #[error("fade step must be at least 1")]
    ZeroFadeStep,
    #[error("colour count must be between 3 and 6, got {0}")]
    ColorCount(u8),
}

impl GameConfig {
    /// Check the values that keep animations converging and boards generatable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [("swap rate", self.swap_rate), ("fall rate", self.fall_rate)] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(ConfigError::RateOutOfRange { name, value });
            }
            if value < MIN_RATE {
                return Err(ConfigError::RateTooSlow { name, value });
            }
        }
        if self.swap_rate < self.fall_rate {
            return Err(ConfigError::SwapSlowerThanFall {
                swap: self.swap_rate,
                fall: self.fall_rate,
            });
        }
        if self.fade_step == 0 {
            return Err(ConfigError::ZeroFadeStep);
        }
        if !(3..=MAX_COLORS).contains(&self.colors) {
            return Err(ConfigError::ColorCount(self.colors));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(GameConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_rejects_bad_values() {
        let bad_rate = GameConfig { fall_rate: 0.0, ..GameConfig::default() };
        assert!(matches!(bad_rate.validate(), Err(ConfigError::RateOutOfRange { .. })));

        let nan = GameConfig { swap_rate: f32::NAN, ..GameConfig::default() };
        assert!(matches!(nan.validate(), Err(ConfigError::RateOutOfRange { .. })));

        let tiny = GameConfig { swap_rate: 1e-8, fall_rate: 1e-8, ..GameConfig::default() };
        assert!(matches!(
            tiny.validate(),
            Err(ConfigError::RateTooSlow { name: "swap rate", .. })
        ));

        let slow_swap = GameConfig { swap_rate: 0.2, ..GameConfig::default() };
        assert!(matches!(slow_swap.validate(), Err(ConfigError::SwapSlowerThanFall { .. })));

        let no_fade = GameConfig { fade_step: 0, ..GameConfig::default() };
        assert_eq!(no_fade.validate(), Err(ConfigError::ZeroFadeStep));

        let two = GameConfig { colors: 2, ..GameConfig::default() };
        assert_eq!(two.validate(), Err(ConfigError::ColorCount(2)));
    }

    #[test]
    fn test_slowest_rate_still_arrives() {
        use crate::anim::{Motion, Point};
        use crate::grid::{CELL_SIZE, GRID_SIZE};
        let far = CELL_SIZE * GRID_SIZE as f32;
        let mut m = Motion::from_to(Point::new(far, -far), Point::new(far - CELL_SIZE, far));
        let mut steps = 0;
        while !m.arrived() {
            m.advance(MIN_RATE);
            steps += 1;
            assert!(steps < 10_000, "stalled at {m:?}");
        }
        assert_eq!(m.current, m.target);
    }
}
