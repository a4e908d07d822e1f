//! The segment rule.

use crate::segment::types::Segment;

/// Classify a user. Even ids are `p2`, other multiples of three are `p3`,
/// everything else is `p1`.
///
/// The even check runs first, so 6 is `p2`. Total over all of `i64`.
pub fn resolve_segment(user_id: i64) -> Segment {
    let label = if user_id % 2 == 0 {
        "p2"
    } else if user_id % 3 == 0 {
        "p3"
    } else {
        "p1"
    };
    Segment::from(label)
}
