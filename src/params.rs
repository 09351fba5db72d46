use thiserror::Error;

/// Tunables of the bot archetypes.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AiParams {
    /// Edge length in cells of the tiles bounding turret targeting and wandering.
    pub tile_size: i32,
    /// Minimum time a turret keeps its target before rescanning.
    pub target_switch_interval_micros: u64,
    /// Largest turret error, in radians, at which a bot pulls the trigger.
    pub aim_tolerance: f64,
    /// Straight-line distance within which a closing-in bot locks its enemy.
    pub max_targeting_range: f64,
    pub max_sample_attempts: usize,
    /// Half extent of the square a tutorial bot wanders in around its own cell.
    pub tutorial_half_extent: i32,
}

impl Default for AiParams {
    fn default() -> Self {
        Self {
            tile_size: 6,
            target_switch_interval_micros: 5_000_000,
            aim_tolerance: 0.05,
            max_targeting_range: 10.,
            max_sample_attempts: 50,
            tutorial_half_extent: 3,
        }
    }
}

#[derive(Debug, Error)]
pub enum ParamsError {
    #[error("tile_size must be positive, got {0}")]
    TileSize(i32),
    #[error("max_sample_attempts must be at least 1")]
    SampleAttempts,
    #[error("{name} must be a positive finite number, got {value}")]
    NotPositive { name: &'static str, value: f64 },
    #[error("tutorial_half_extent must not be negative, got {0}")]
    HalfExtent(i32),
    #[error("failed to parse parameters: {0}")]
    Parse(String),
}

impl AiParams {
    pub fn validate(self) -> Result<Self, ParamsError> {
        if self.tile_size <= 0 {
            return Err(ParamsError::TileSize(self.tile_size));
        }
        if self.max_sample_attempts == 0 {
            return Err(ParamsError::SampleAttempts);
        }
        for (name, value) in [
            ("aim_tolerance", self.aim_tolerance),
            ("max_targeting_range", self.max_targeting_range),
        ] {
            if !value.is_finite() || value <= 0. {
                return Err(ParamsError::NotPositive { name, value });
            }
        }
        if self.tutorial_half_extent < 0 {
            return Err(ParamsError::HalfExtent(self.tutorial_half_extent));
        }
        Ok(self)
    }

    /// Parse a RON document, e.g. `(tile_size: 8, aim_tolerance: 0.1)`. Omitted fields keep
    /// their defaults.
    #[cfg(feature = "serde")]
    pub fn from_ron_str(source: &str) -> Result<Self, ParamsError> {
        let params: Self =
            ron::from_str(source).map_err(|err| ParamsError::Parse(err.to_string()))?;
        params.validate()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let params = AiParams::default().validate().unwrap();
        assert_eq!(params.tile_size, 6);
        assert_eq!(params.target_switch_interval_micros, 5_000_000);
        assert_eq!(params.max_sample_attempts, 50);
    }

    #[test]
    fn test_rejects_bad_values() {
        let params = AiParams {
            tile_size: 0,
            ..AiParams::default()
        };
        assert!(matches!(params.validate(), Err(ParamsError::TileSize(0))));
        let params = AiParams {
            aim_tolerance: f64::NAN,
            ..AiParams::default()
        };
        assert!(matches!(
            params.validate(),
            Err(ParamsError::NotPositive {
                name: "aim_tolerance",
                ..
            })
        ));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_from_ron_keeps_defaults() {
        let params = AiParams::from_ron_str("(tile_size: 8, aim_tolerance: 0.1)").unwrap();
        assert_eq!(params.tile_size, 8);
        assert_eq!(params.aim_tolerance, 0.1);
        assert_eq!(params.max_sample_attempts, 50);
        assert!(matches!(
            AiParams::from_ron_str("(tile_size: -1)"),
            Err(ParamsError::TileSize(-1))
        ));
        assert!(matches!(
            AiParams::from_ron_str("(tile_size: "),
            Err(ParamsError::Parse(_))
        ));
    }
}
