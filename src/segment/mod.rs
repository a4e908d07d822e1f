//! User segmentation.
//!
//! # Data Flow
//! ```text
//! user_id
//!     → resolver.rs (SegmentResolver capability)
//!         → rules.rs (in-process rule), or
//!         → remote.rs (HTTP segment service, timeout + retries)
//!     → Segment, or SegmentError for the caller to degrade on
//! ```

pub mod remote;
pub mod resolver;
pub mod rules;
pub mod types;

pub use remote::HttpSegmentResolver;
pub use resolver::{LocalSegmentResolver, SegmentResolver};
pub use rules::resolve_segment;
pub use types::{Segment, SegmentError, SegmentResponse, SegmentResult};
