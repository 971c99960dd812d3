//! `SeaORM` Entity prelude

pub use super::donations::Entity as Donations;
pub use super::memberships::Entity as Memberships;
pub use super::nft_rewards::Entity as NftRewards;
pub use super::pending_rewards::Entity as PendingRewards;
pub use super::presales::Entity as Presales;
pub use super::reward_distributions::Entity as RewardDistributions;
pub use super::user_reward_claims::Entity as UserRewardClaims;
