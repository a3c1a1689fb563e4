//! Reward tiers earned by the final score
//!
//! Fixed five-band table. The bottom band exists so every score maps to a
//! tier; it carries no discount.

use serde::{Deserialize, Serialize};

/// Reward band, ordered from lowest to highest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RewardTier {
    Novice,
    Bronze,
    Silver,
    Gold,
    Diamond,
}

impl RewardTier {
    /// All tiers in ascending order
    pub const ALL: [RewardTier; 5] = [
        RewardTier::Novice,
        RewardTier::Bronze,
        RewardTier::Silver,
        RewardTier::Gold,
        RewardTier::Diamond,
    ];

    /// Lowest score that earns this tier
    pub fn min_score(self) -> u64 {
        match self {
            RewardTier::Novice => 0,
            RewardTier::Bronze => 3_500,
            RewardTier::Silver => 7_500,
            RewardTier::Gold => 10_500,
            RewardTier::Diamond => 15_000,
        }
    }

    pub fn discount(self) -> &'static str {
        match self {
            RewardTier::Novice => "0%",
            RewardTier::Bronze => "5%",
            RewardTier::Silver => "10%",
            RewardTier::Gold => "20%",
            RewardTier::Diamond => "FREE DRINK",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            RewardTier::Novice => "NOVICE",
            RewardTier::Bronze => "BRONZE",
            RewardTier::Silver => "SILVER",
            RewardTier::Gold => "GOLD",
            RewardTier::Diamond => "DIAMOND",
        }
    }

    /// Highest tier whose threshold the score reaches
    pub fn for_score(score: u64) -> Self {
        Self::ALL
            .iter()
            .rev()
            .copied()
            .find(|tier| score >= tier.min_score())
            .unwrap_or(RewardTier::Novice)
    }

    pub fn next(self) -> Option<Self> {
        match self {
            RewardTier::Novice => Some(RewardTier::Bronze),
            RewardTier::Bronze => Some(RewardTier::Silver),
            RewardTier::Silver => Some(RewardTier::Gold),
            RewardTier::Gold => Some(RewardTier::Diamond),
            RewardTier::Diamond => None,
        }
    }

    /// Voucher for a finished run in this tier
    pub fn reward(self, score: u64) -> Reward {
        Reward {
            tier: self,
            discount: self.discount().to_string(),
            code: format!("MOMON-{}-{}", self.name(), score),
        }
    }
}

/// Voucher handed to the reward screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    pub tier: RewardTier,
    pub discount: String,
    pub code: String,
}

/// Progress toward the next tier, for the HUD bar
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierProgress {
    pub tier: RewardTier,
    /// Score needed to reach `tier`
    pub target: u64,
    /// Share of the current band already covered, 0..=100
    pub percent: f32,
}

/// `None` once the top tier is reached
pub fn next_tier_progress(score: u64) -> Option<TierProgress> {
    let current = RewardTier::for_score(score);
    let tier = current.next()?;
    let floor = current.min_score();
    let target = tier.min_score();
    let percent = (score.saturating_sub(floor) as f32 / (target - floor) as f32 * 100.0).clamp(0.0, 100.0);
    Some(TierProgress { tier, target, percent })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_tier_thresholds() {
        assert_eq!(RewardTier::for_score(0), RewardTier::Novice);
        assert_eq!(RewardTier::for_score(3_499), RewardTier::Novice);
        assert_eq!(RewardTier::for_score(3_500), RewardTier::Bronze);
        assert_eq!(RewardTier::for_score(7_500), RewardTier::Silver);
        assert_eq!(RewardTier::for_score(10_499), RewardTier::Silver);
        assert_eq!(RewardTier::for_score(10_500), RewardTier::Gold);
        assert_eq!(RewardTier::for_score(15_000), RewardTier::Diamond);
        assert_eq!(RewardTier::for_score(u64::MAX), RewardTier::Diamond);
    }

    #[test]
    fn test_reward_code() {
        let reward = RewardTier::for_score(8_120).reward(8_120);
        assert_eq!(reward.tier, RewardTier::Silver);
        assert_eq!(reward.discount, "10%");
        assert_eq!(reward.code, "MOMON-SILVER-8120");

        assert_eq!(RewardTier::Diamond.reward(20_000).discount, "FREE DRINK");
        assert_eq!(RewardTier::Novice.reward(0).discount, "0%");
    }

    #[test]
    fn test_progress_within_band() {
        let p = next_tier_progress(1_750).unwrap();
        assert_eq!(p.tier, RewardTier::Bronze);
        assert_eq!(p.target, 3_500);
        assert!((p.percent - 50.0).abs() < 1e-4);

        // Bands measure from the previous threshold
        let p = next_tier_progress(9_000).unwrap();
        assert_eq!(p.tier, RewardTier::Gold);
        assert!((p.percent - 50.0).abs() < 1e-4);
    }

    #[test]
    fn test_progress_resets_on_promotion() {
        let p = next_tier_progress(3_500).unwrap();
        assert_eq!(p.tier, RewardTier::Silver);
        assert_eq!(p.percent, 0.0);
    }

    #[test]
    fn test_no_progress_at_top() {
        assert_eq!(next_tier_progress(15_000), None);
        assert_eq!(next_tier_progress(99_999), None);
    }

    proptest! {
        #[test]
        fn prop_progress_percent_in_range(score in 0u64..20_000) {
            if let Some(p) = next_tier_progress(score) {
                prop_assert!((0.0..=100.0).contains(&p.percent));
                prop_assert!(p.target > score);
                prop_assert!(p.tier > RewardTier::for_score(score));
            }
        }
    }
}
