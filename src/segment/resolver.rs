//! The segment resolution capability.

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{SegmentConfig, SegmentMode};
use crate::segment::remote::HttpSegmentResolver;
use crate::segment::rules::resolve_segment;
use crate::segment::types::{Segment, SegmentResult};

/// Anything that can classify a user into a segment.
///
/// The matcher only sees this trait, so it can run against the in-process
/// rule, a remote service, or a test fake.
#[async_trait]
pub trait SegmentResolver: Send + Sync {
    async fn resolve(&self, user_id: i64) -> SegmentResult<Segment>;

    /// Label used in logs and metrics.
    fn name(&self) -> &'static str;
}

/// Evaluates the segment rule in-process. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalSegmentResolver;

#[async_trait]
impl SegmentResolver for LocalSegmentResolver {
    async fn resolve(&self, user_id: i64) -> SegmentResult<Segment> {
        Ok(resolve_segment(user_id))
    }

    fn name(&self) -> &'static str {
        "local"
    }
}

/// Build the resolver selected by configuration.
pub fn from_config(config: &SegmentConfig) -> SegmentResult<Arc<dyn SegmentResolver>> {
    match config.mode {
        SegmentMode::Local => Ok(Arc::new(LocalSegmentResolver)),
        SegmentMode::Remote => Ok(Arc::new(HttpSegmentResolver::new(config)?)),
    }
}
