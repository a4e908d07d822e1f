//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Call to the segment service:
//!     → retries.rs (per-attempt deadline, bounded attempts)
//!     → backoff.rs (jittered delay between attempts)
//!     → final error handed back to the caller, who degrades gracefully
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - Only transient failures are retried
//! - Jittered backoff prevents thundering herd

pub mod backoff;
pub mod retries;

pub use retries::RetryPolicy;
