// # ddns-core
//
// Core library for the single-shot dynamic DNS refresh.
//
// ## Architecture Overview
//
// This library provides the core functionality for one refresh run:
// - **IpSource**: Trait for looking up the public address of one family
// - **DnsProvider**: Trait for reading and changing DNS records via provider APIs
// - **HostnameSource**: Trait for the machine identity used as default target
// - **Sandbox**: Trait for optional process hardening
// - **RefreshEngine**: Orchestrates target → token → addresses → zone → reconcile
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Core logic is separate from implementations
// 2. **Single-Shot**: No state survives a run; an external scheduler re-runs the tool
// 3. **Library-First**: All core functionality can be used as a library
// 4. **Idempotency**: Reconciling twice with the same address changes nothing

pub mod traits;
pub mod engine;
pub mod config;
pub mod error;
pub mod target;
pub mod types;

// Re-export core types for convenience
pub use config::{IpSourceConfig, ProviderConfig, RefreshConfig, TargetConfig};
pub use engine::{ReconcileOutcome, RefreshEngine, RefreshReport};
pub use error::{Error, Result};
pub use traits::{
    DnsProvider, HostnameSource, IpSource, IpVersion, NoopSandbox, Sandbox, SystemHostname,
};
pub use types::{
    DesiredState, DnsRecord, NewRecord, RecordType, RecordUpdate, RefreshTarget, Zone,
};
