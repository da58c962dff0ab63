use serde::{Deserialize, Serialize};
use statrs::distribution::{Continuous, ContinuousCDF, Normal};

/// Mean assigned to a peer the first time it is referenced.
pub const DEFAULT_MU: f64 = 100.0;

/// Uncertainty assigned to a peer the first time it is referenced.
pub const DEFAULT_SIGMA: f64 = DEFAULT_MU / 3.0;

/// Probability of a draw assumed by the rating model. Draws are never observed, but the draw
/// margin keeps the update from over-reacting to a single comparison.
pub const DEFAULT_DRAW_PROBABILITY: f64 = 0.10;

/// Below this the normal CDF is treated as having underflowed.
const CDF_UNDERFLOW: f64 = 2.222758749e-162;

/// A belief about how trustworthy a peer is.
///
/// `sigma` is never negative, however the rating was built or deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RatingFields")]
pub struct Rating {
    mu: f64,
    sigma: f64,
}

#[derive(Deserialize)]
struct RatingFields {
    mu: f64,
    sigma: f64,
}

impl From<RatingFields> for Rating {
    fn from(fields: RatingFields) -> Self {
        Self::new(fields.mu, fields.sigma)
    }
}

impl Rating {
    /// A rating with `sigma` clamped at zero.
    pub const fn new(mu: f64, sigma: f64) -> Self {
        let sigma = if sigma >= 0.0 { sigma } else { 0.0 };
        Self { mu, sigma }
    }

    /// Mean skill estimate.
    pub const fn mu(&self) -> f64 {
        self.mu
    }

    /// Uncertainty of the estimate.
    pub const fn sigma(&self) -> f64 {
        self.sigma
    }
}

impl Default for Rating {
    fn default() -> Self {
        Self::new(DEFAULT_MU, DEFAULT_SIGMA)
    }
}

/// Parameters of the pairwise rating model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingEnvironment {
    pub mu: f64,
    pub sigma: f64,
    /// Distance in skill that gives roughly a 76% chance of winning.
    pub beta: f64,
    /// Dynamics factor added to every sigma before an update.
    pub tau: f64,
    pub draw_probability: f64,
}

impl Default for RatingEnvironment {
    fn default() -> Self {
        Self {
            mu: DEFAULT_MU,
            sigma: DEFAULT_SIGMA,
            beta: DEFAULT_SIGMA / 2.0,
            tau: DEFAULT_SIGMA / 100.0,
            draw_probability: DEFAULT_DRAW_PROBABILITY,
        }
    }
}

impl RatingEnvironment {
    /// The prior every unseen peer starts from.
    pub fn prior(&self) -> Rating {
        Rating::new(self.mu, self.sigma)
    }

    fn draw_margin(&self, normal: &Normal) -> f64 {
        normal.inverse_cdf((self.draw_probability + 1.0) / 2.0) * 2f64.sqrt() * self.beta
    }

    /// Updates two ratings after `winner` beat `loser`.
    ///
    /// The winner's mean rises, the loser's falls, and both uncertainties shrink. The result is
    /// deterministic for the same inputs.
    pub fn rate_1vs1(&self, winner: Rating, loser: Rating) -> (Rating, Rating) {
        let normal = Normal::standard();

        let winner_variance = winner.sigma.powi(2) + self.tau.powi(2);
        let loser_variance = loser.sigma.powi(2) + self.tau.powi(2);

        let c_squared = 2.0 * self.beta.powi(2) + winner_variance + loser_variance;
        let c = c_squared.sqrt();
        let t = (winner.mu - loser.mu) / c;
        let epsilon = self.draw_margin(&normal) / c;

        let v = v_win(&normal, t, epsilon);
        let w = v * (v + t - epsilon);

        let new_winner = Rating::new(
            winner.mu + winner_variance / c * v,
            shrink(winner_variance, c_squared, w),
        );
        let new_loser = Rating::new(
            loser.mu - loser_variance / c * v,
            shrink(loser_variance, c_squared, w),
        );

        (new_winner, new_loser)
    }
}

/// Additive correction to the mean of a truncated Gaussian for a win.
fn v_win(normal: &Normal, t: f64, epsilon: f64) -> f64 {
    let x = t - epsilon;
    let denominator = normal.cdf(x);
    if denominator < CDF_UNDERFLOW {
        return -x;
    }
    normal.pdf(x) / denominator
}

fn shrink(variance: f64, c_squared: f64, w: f64) -> f64 {
    (variance * (1.0 - variance / c_squared * w)).max(0.0).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prior_matches_defaults() {
        let prior = RatingEnvironment::default().prior();
        assert_eq!(prior, Rating::default());
        assert_eq!(prior.mu(), 100.0);
    }

    #[test]
    fn test_negative_sigma_is_clamped() {
        assert_eq!(Rating::new(10.0, -3.0).sigma(), 0.0);
        assert_eq!(Rating::new(10.0, f64::NAN).sigma(), 0.0);
    }

    #[test]
    fn test_deserialized_negative_sigma_is_clamped() -> Result<(), serde_json::Error> {
        let rating: Rating = serde_json::from_str(r#"{"mu":50.0,"sigma":-20.0}"#)?;
        assert_eq!(rating, Rating::new(50.0, 0.0));

        let json = serde_json::to_value(Rating::new(120.0, 7.5))?;
        assert_eq!(json["mu"], 120.0);
        assert_eq!(json["sigma"], 7.5);
        Ok(())
    }

    #[test]
    fn test_winner_rises_and_loser_falls() {
        let environment = RatingEnvironment::default();
        let winner = Rating::default();
        let loser = Rating::default();

        let (new_winner, new_loser) = environment.rate_1vs1(winner, loser);

        assert!(new_winner.mu() > winner.mu());
        assert!(new_loser.mu() < loser.mu());
        assert!(new_winner.sigma() < winner.sigma());
        assert!(new_loser.sigma() < loser.sigma());
    }

    #[test]
    fn test_update_is_symmetric_for_equal_ratings() {
        let environment = RatingEnvironment::default();
        let (winner, loser) = environment.rate_1vs1(Rating::default(), Rating::default());

        assert!(((winner.mu() - DEFAULT_MU) - (DEFAULT_MU - loser.mu())).abs() < 1e-9);
        assert!((winner.sigma() - loser.sigma()).abs() < 1e-9);
    }

    #[test]
    fn test_update_is_deterministic() {
        let environment = RatingEnvironment::default();
        let first = environment.rate_1vs1(Rating::new(120.0, 10.0), Rating::new(90.0, 20.0));
        let second = environment.rate_1vs1(Rating::new(120.0, 10.0), Rating::new(90.0, 20.0));
        assert_eq!(first, second);
    }

    #[test]
    fn test_upset_moves_more_than_expected_win() {
        let environment = RatingEnvironment::default();
        let strong = Rating::new(150.0, 5.0);

        let (upset_winner, _) = environment.rate_1vs1(Rating::default(), strong);
        let (expected_winner, _) = environment.rate_1vs1(strong, Rating::default());

        assert!(upset_winner.mu() - DEFAULT_MU > expected_winner.mu() - strong.mu());
    }

    #[test]
    fn test_extreme_mismatch_stays_finite() {
        let environment = RatingEnvironment::default();
        let (winner, loser) =
            environment.rate_1vs1(Rating::new(-10_000.0, 1.0), Rating::new(10_000.0, 1.0));

        assert!(winner.mu().is_finite() && winner.sigma().is_finite());
        assert!(loser.mu().is_finite() && loser.sigma().is_finite());
        assert!(winner.mu() > -10_000.0);
    }
}
