use crate::error::PatternError;
use crate::window::window_capacity;

/// One target resolution and the neighborhood radius used at it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResolutionLevel {
    /// Side of the square grid the flow is resampled to.
    pub resolution: usize,
    /// Chebyshev radius of the spatial window around each point.
    pub window_radius: usize,
}

impl ResolutionLevel {
    /// Creates a level from a grid side and window radius.
    pub const fn new(resolution: usize, window_radius: usize) -> Self {
        Self {
            resolution,
            window_radius,
        }
    }

    /// Number of sequence slots reserved for the spatial window.
    pub const fn window_capacity(&self) -> usize {
        window_capacity(self.window_radius)
    }
}

/// Configuration of a multi-resolution sampling run.
///
/// The default mirrors the reference setup for 512x512 flow: four levels in
/// descending order, a wider window at the finest grid. Levels are
/// independent; order only decides the order of the output.
///
/// # Example
///
/// ```
/// use strand_attn::{ResolutionLevel, SamplerConfig};
///
/// let config = SamplerConfig::default()
///     .with_levels(vec![ResolutionLevel::new(16, 1)])
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.base_resolution, 512);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SamplerConfig {
    /// Grid side of the estimator's flow output.
    pub base_resolution: usize,
    /// Target levels, conventionally in descending resolution order.
    pub levels: Vec<ResolutionLevel>,
    /// Seed for conflict resolution; `None` draws from the OS.
    pub seed: Option<u64>,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            base_resolution: 512,
            levels: vec![
                ResolutionLevel::new(64, 2),
                ResolutionLevel::new(32, 1),
                ResolutionLevel::new(16, 1),
                ResolutionLevel::new(8, 1),
            ],
            seed: None,
        }
    }
}

impl SamplerConfig {
    /// Creates a configuration with the given base resolution and no levels.
    pub fn new(base_resolution: usize) -> Self {
        Self {
            base_resolution,
            levels: Vec::new(),
            seed: None,
        }
    }

    /// Replaces the resolution levels.
    pub fn with_levels(mut self, levels: Vec<ResolutionLevel>) -> Self {
        self.levels = levels;
        self
    }

    /// Fixes the conflict-resolution seed for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Checks the configuration for degenerate values.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::InvalidBaseResolution`] or
    /// [`PatternError::InvalidLevel`] when a resolution is zero. An empty
    /// level list is valid and produces an empty result.
    pub fn validate(&self) -> Result<(), PatternError> {
        if self.base_resolution == 0 {
            return Err(PatternError::InvalidBaseResolution);
        }
        for (index, level) in self.levels.iter().enumerate() {
            if level.resolution == 0 {
                return Err(PatternError::InvalidLevel {
                    index,
                    resolution: level.resolution,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_the_reference_setup() {
        let config = SamplerConfig::default();
        assert_eq!(config.base_resolution, 512);
        assert_eq!(config.levels.len(), 4);
        assert_eq!(config.levels[0], ResolutionLevel::new(64, 2));
        assert_eq!(config.levels[0].window_capacity(), 25);
        assert_eq!(config.levels[3], ResolutionLevel::new(8, 1));
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_resolutions_are_rejected() {
        let config = SamplerConfig::new(0);
        assert_eq!(
            config.validate().unwrap_err(),
            crate::PatternError::InvalidBaseResolution
        );

        let config = SamplerConfig::new(512).with_levels(vec![
            ResolutionLevel::new(8, 1),
            ResolutionLevel::new(0, 1),
        ]);
        assert_eq!(
            config.validate().unwrap_err(),
            crate::PatternError::InvalidLevel {
                index: 1,
                resolution: 0,
            }
        );
    }

    #[test]
    fn radius_zero_still_reserves_the_self_slot() {
        assert_eq!(ResolutionLevel::new(8, 0).window_capacity(), 1);
        assert_eq!(ResolutionLevel::new(8, 1).window_capacity(), 9);
    }
}
