use rand::{
    Rng,
    distr::{Distribution, weighted::WeightedIndex},
};
use tracing::trace;

use crate::{errors::PeerManagementError, karma::selection_weight};

/// Pick one of `candidates` at random, weighted by karma floored at zero.
///
/// Candidates are left untouched. When no candidate has positive karma, or the weights cannot
/// be sampled from, the first one is returned.
pub fn select_weighted<'a, S, F, R>(
    candidates: &'a [S],
    karma: F,
    rng: &mut R,
) -> Result<&'a S, PeerManagementError>
where
    S: AsRef<str>,
    F: Fn(&str) -> f64,
    R: Rng + ?Sized,
{
    let Some(first) = candidates.first() else {
        return Err(PeerManagementError::NoCandidates);
    };

    let weights = candidates
        .iter()
        .map(|candidate| selection_weight(karma(candidate.as_ref())));
    match WeightedIndex::new(weights) {
        Ok(index) => Ok(&candidates[index.sample(rng)]),
        Err(err) => {
            trace!(?err, "Falling back to the first candidate");
            Ok(first)
        }
    }
}
