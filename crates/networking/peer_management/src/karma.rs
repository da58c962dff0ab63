use crate::rating::Rating;

/// Conservative score of a peer: the lower confidence bound of its rating, scaled down.
///
/// Peers with a high uncertainty are not trusted just because their mean looks good.
pub fn karma(rating: &Rating) -> f64 {
    (rating.mu() - 2.0 * rating.sigma()) / 10.0
}

/// Karma floored at zero, usable as a selection weight.
pub fn selection_weight(karma: f64) -> f64 {
    karma.max(0.0)
}
