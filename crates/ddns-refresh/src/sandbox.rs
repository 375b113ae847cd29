//! Platform sandbox selection

use ddns_core::traits::Sandbox;

/// The sandbox for the platform this binary was built for
pub fn platform_sandbox() -> Box<dyn Sandbox> {
    #[cfg(target_os = "openbsd")]
    {
        Box::new(openbsd::PledgeSandbox)
    }

    #[cfg(not(target_os = "openbsd"))]
    {
        Box::new(ddns_core::traits::NoopSandbox)
    }
}

#[cfg(target_os = "openbsd")]
mod openbsd {
    use ddns_core::traits::Sandbox;
    use ddns_core::{Error, Result};

    /// Promises needed for a refresh: DNS resolution, HTTPS and reading
    /// the CA bundle
    const PROMISES: &std::ffi::CStr = c"stdio rpath inet dns";

    /// `pledge(2)` restricted to [`PROMISES`]
    pub struct PledgeSandbox;

    impl Sandbox for PledgeSandbox {
        fn restrict(&self) -> Result<()> {
            // SAFETY: PROMISES is a valid NUL-terminated string and a null
            // execpromises leaves exec promises unchanged.
            let rc = unsafe { libc::pledge(PROMISES.as_ptr(), std::ptr::null()) };
            if rc != 0 {
                return Err(Error::config(format!(
                    "pledge failed: {}",
                    std::io::Error::last_os_error()
                )));
            }
            Ok(())
        }

        fn name(&self) -> &'static str {
            "pledge"
        }
    }
}
