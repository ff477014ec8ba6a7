//! Player configuration.
//!
//! # Example
//!
//! ```
//! use spark_remote::config::PlayerConfig;
//! use spark_remote::profile::CORE_V2;
//!
//! let config = PlayerConfig::default()
//!     .with_profile(&CORE_V2)
//!     .with_max_depth(16);
//! assert_eq!(config.profile.api_level, 2);
//! ```

use taffy::geometry::Size;

use crate::profile::{Profile, CORE_V3};

/// Default component nesting limit.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Default cap on operations in one document.
pub const DEFAULT_MAX_OPERATIONS: usize = 65_536;

/// Limits and capabilities a player runs with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerConfig {
    /// Runtime capability. Documents whose profile is not contained in it are rejected.
    pub profile: &'static Profile,
    /// Maximum container nesting depth.
    pub max_depth: usize,
    /// Maximum number of operations decoded from one buffer.
    pub max_operations: usize,
    /// Initial viewport. Replaced by every `update`.
    pub viewport: Size<f32>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            profile: &CORE_V3,
            max_depth: DEFAULT_MAX_DEPTH,
            max_operations: DEFAULT_MAX_OPERATIONS,
            viewport: Size { width: 0.0, height: 0.0 },
        }
    }
}

impl PlayerConfig {
    pub fn with_profile(mut self, profile: &'static Profile) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_operations(mut self, max_operations: usize) -> Self {
        self.max_operations = max_operations;
        self
    }

    pub fn with_viewport(mut self, width: f32, height: f32) -> Self {
        self.viewport = Size { width, height };
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::CORE_V1;

    #[test]
    fn test_defaults() {
        let config = PlayerConfig::default();
        assert_eq!(config.profile.id, 3);
        assert_eq!(config.max_depth, 64);
        assert_eq!(config.max_operations, 65_536);
        assert_eq!(config.viewport.width, 0.0);
    }

    #[test]
    fn test_builder() {
        let config = PlayerConfig::default()
            .with_profile(&CORE_V1)
            .with_max_operations(10)
            .with_viewport(80.0, 24.0);
        assert_eq!(config.profile.id, 0);
        assert_eq!(config.max_operations, 10);
        assert_eq!(config.viewport.height, 24.0);
    }
}
