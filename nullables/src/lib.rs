//! Nullable infrastructure for deterministic testing.
//!
//! Each host collaborator the engine consumes has a controllable stand-in
//! here. They return deterministic values and never touch anything outside
//! the process.
//!
//! Usage: swap host implementations for nullables in tests.

pub mod chain;
pub mod executor;
pub mod permissions;

pub use chain::NullChain;
pub use executor::NullExecutor;
pub use permissions::NullPermissions;
