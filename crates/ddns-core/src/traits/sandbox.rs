//! Process sandboxing
//!
//! Platform hardening (OpenBSD `pledge(2)` and the like) is applied once at
//! start-up through this trait. The core never calls it, so tests and
//! platforms without such primitives use [`NoopSandbox`].

use crate::error::Result;

/// Restricts what the running process may do
pub trait Sandbox {
    /// Apply the restriction to the current process
    ///
    /// # Returns
    ///
    /// - `Ok(())`: The process is restricted (or nothing had to be done)
    /// - `Err(Error::Config)`: The restriction could not be applied
    fn restrict(&self) -> Result<()>;

    /// Name of the mechanism (for logging)
    fn name(&self) -> &'static str;
}

/// Sandbox that does nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSandbox;

impl Sandbox for NoopSandbox {
    fn restrict(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "none"
    }
}
