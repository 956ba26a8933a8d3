//! # Score normalization
//!
//! Rescales the raw scores gathered for one pod into `[0, max_scale]`,
//! keeping the relative order of the nodes.

use shared::models::{MIN_NODE_SCORE, NodeScore};

use crate::errors::PluginError;

/// Rewrites `scores` in place so the best node ends up at `max_scale`.
///
/// Uses floor division, so two close raw scores may collapse onto the same
/// value but never swap order. Raw scores below [`MIN_NODE_SCORE`] are
/// raised to it. When no score is positive there is nothing to scale against
/// and the list is left as is (apart from the clamping).
pub fn normalize(scores: &mut [NodeScore], max_scale: i64) -> Result<(), PluginError> {
    if scores.is_empty() {
        return Err(PluginError::EmptyInput);
    }

    for s in scores.iter_mut() {
        s.score = s.score.max(MIN_NODE_SCORE);
    }

    let max_score = scores.iter().map(|s| s.score).max().unwrap_or(MIN_NODE_SCORE);
    if max_score <= 0 {
        return Ok(());
    }

    for s in scores.iter_mut() {
        // i128 so `score * max_scale` cannot overflow
        s.score = (s.score as i128 * max_scale as i128 / max_score as i128) as i64;
    }
    Ok(())
}
