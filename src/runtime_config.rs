//! Environment-based runtime configuration.
//!
//! `SWYD_STACK_SIZE` sets the coroutine stack size in bytes, as a decimal
//! value or `0x`-prefixed hex. The default is 16 KB; tune it up for
//! handlers with deep call chains, down when running very large numbers of
//! concurrent coroutines.
//!
//! ```bash
//! export SWYD_STACK_SIZE=0x8000   # 32 KB
//! ```

use std::env;

const DEFAULT_STACK_SIZE: usize = 0x4000;

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone, Copy)]
pub struct RuntimeConfig {
    /// Stack size for request coroutines in bytes.
    pub stack_size: usize,
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let stack_size = match env::var("SWYD_STACK_SIZE") {
            Ok(val) => {
                if let Some(hex) = val.strip_prefix("0x") {
                    usize::from_str_radix(hex, 16).unwrap_or(DEFAULT_STACK_SIZE)
                } else {
                    val.parse().unwrap_or(DEFAULT_STACK_SIZE)
                }
            }
            Err(_) => DEFAULT_STACK_SIZE,
        };
        RuntimeConfig { stack_size }
    }
}
