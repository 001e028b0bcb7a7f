use derive_with::With;

use crate::error::{BufferError, BufferResult};

/// Slot count of a freshly created buffer: one live element plus the slack slot.
pub const DEFAULT_INITIAL_CAPACITY: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, With)]
pub struct BufferConfig {
    /// Number of slots allocated up front. Must be non-zero.
    pub initial_capacity: usize,
    /// Emit a `debug` log record every time the block doubles.
    pub log_growth: bool,
    /// Growth stops here; `try_*` calls report `CapacityOverflow` past it.
    pub max_capacity: usize,
}

impl BufferConfig {
    pub fn validate(&self) -> BufferResult<()> {
        if self.initial_capacity == 0 {
            return Err(BufferError::InvalidConfig(
                "initial_capacity must be greater than 0".to_string(),
            ));
        }
        if self.max_capacity < self.initial_capacity {
            return Err(BufferError::InvalidConfig(format!(
                "max_capacity {} is below initial_capacity {}",
                self.max_capacity, self.initial_capacity
            )));
        }
        Ok(())
    }
}

impl Default for BufferConfig {
    fn default() -> Self {
        BufferConfig {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            log_growth: true,
            max_capacity: usize::MAX,
        }
    }
}
