use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{Id, ParseEnumError};

/// Property cap on the free tier.
pub const FREE_TIER_MAX_PROPERTIES: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionTier {
    #[default]
    Free,
    Pro,
}

impl SubscriptionTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionTier::Free => "free",
            SubscriptionTier::Pro => "pro",
        }
    }
}

impl fmt::Display for SubscriptionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubscriptionTier {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "free" => Ok(SubscriptionTier::Free),
            "pro" => Ok(SubscriptionTier::Pro),
            _ => Err(ParseEnumError::new("subscription tier", s)),
        }
    }
}

/// The account a portfolio belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Id,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subscription_tier: SubscriptionTier,
}

impl UserProfile {
    pub fn new(id: Id, email: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
            subscription_tier: SubscriptionTier::Free,
        }
    }

    pub fn is_pro(&self) -> bool {
        self.subscription_tier == SubscriptionTier::Pro
    }

    /// Whether another property fits under `limit` given `current_count`.
    /// Pro accounts are never limited.
    pub fn can_add_property(&self, current_count: usize, limit: usize) -> bool {
        self.is_pro() || current_count < limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_tier_is_capped() {
        let user = UserProfile::new(Id::from("u1"), "a@example.com");
        assert!(user.can_add_property(0, FREE_TIER_MAX_PROPERTIES));
        assert!(user.can_add_property(1, FREE_TIER_MAX_PROPERTIES));
        assert!(!user.can_add_property(2, FREE_TIER_MAX_PROPERTIES));
    }

    #[test]
    fn pro_tier_is_unlimited() {
        let mut user = UserProfile::new(Id::from("u1"), "a@example.com");
        user.subscription_tier = SubscriptionTier::Pro;
        assert!(user.can_add_property(50, FREE_TIER_MAX_PROPERTIES));
    }

    #[test]
    fn missing_tier_defaults_to_free() {
        let user: UserProfile = serde_json::from_str(r#"{"id":"u1"}"#).unwrap();
        assert_eq!(user.subscription_tier, SubscriptionTier::Free);
    }
}
