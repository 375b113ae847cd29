//! Machine identity
//!
//! The refresh targets the machine's own hostname unless one is given
//! explicitly. Looking it up goes through [`HostnameSource`] so the
//! resolver can be exercised without touching the host.

use crate::error::{Error, Result};

/// Source of the local machine's network hostname
pub trait HostnameSource: Send + Sync {
    /// Return the machine hostname
    ///
    /// Errors are fatal for the run: without a hostname there is no target.
    fn hostname(&self) -> Result<String>;
}

/// The operating system's hostname (`gethostname(2)` and equivalents)
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemHostname;

impl HostnameSource for SystemHostname {
    fn hostname(&self) -> Result<String> {
        let name = ::hostname::get()
            .map_err(|e| Error::resolution(format!("Failed to get hostname: {}", e)))?;

        name.into_string()
            .map_err(|raw| Error::resolution(format!("Hostname is not valid UTF-8: {:?}", raw)))
    }
}
