//! Community API payloads
//!
//! Upstream uses camelCase JSON and omits fields freely, so every upstream
//! field is optional.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Entry of `data.userDetailsWithTokenCount`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityUser {
    pub display_name: Option<String>,
    pub email: Option<String>,
    /// Usually an object with `walletAddress` / `walletProvider`
    pub wallet_details: Option<Value>,
    /// Older accounts carry the address at the top level
    pub wallet_address: Option<String>,
    /// Sent as a number or a string depending on the account
    pub dit_token_balance: Option<Value>,
}

impl CommunityUser {
    fn wallet_field(&self, key: &str) -> Option<&str> {
        self.wallet_details
            .as_ref()
            .and_then(|details| details.get(key))
            .and_then(Value::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn wallet_address(&self) -> Option<&str> {
        match self.wallet_details {
            Some(Value::Object(_)) => self.wallet_field("walletAddress"),
            _ => self.wallet_address.as_deref().filter(|v| !v.is_empty()),
        }
    }

    pub fn wallet_provider(&self) -> Option<&str> {
        self.wallet_field("walletProvider")
    }

    pub fn balance_display(&self) -> String {
        match &self.dit_token_balance {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => "0".to_string(),
        }
    }
}

/// Entry of `data.eventDetails`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityEvent {
    pub title: Option<String>,
    pub link: Option<String>,
    pub is_active: Option<bool>,
    pub time: Option<String>,
}

/// Row of `GET /api/external-users`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalUser {
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub wallet_address: Option<String>,
    pub dit_token_balance: String,
}

impl From<&CommunityUser> for ExternalUser {
    fn from(user: &CommunityUser) -> Self {
        Self {
            display_name: user.display_name.clone(),
            email: user.email.clone(),
            wallet_address: user.wallet_address().map(str::to_string),
            dit_token_balance: user.balance_display(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_parses_upstream_shape() {
        let user: CommunityUser = serde_json::from_str(
            r#"{
                "displayName": "gem",
                "email": "gem@diora.io",
                "walletDetails": {"walletAddress": "0xabc", "walletProvider": "metamask"},
                "ditTokenBalance": 42.5
            }"#,
        )
        .unwrap();
        assert_eq!(user.wallet_address(), Some("0xabc"));
        assert_eq!(user.wallet_provider(), Some("metamask"));
        assert_eq!(user.balance_display(), "42.5");

        let row = ExternalUser::from(&user);
        assert_eq!(row.display_name.as_deref(), Some("gem"));
        assert_eq!(row.dit_token_balance, "42.5");
    }

    #[test]
    fn test_user_top_level_wallet_fallback() {
        let user: CommunityUser = serde_json::from_str(
            r#"{"displayName": "old", "walletDetails": null, "walletAddress": "0xdef"}"#,
        )
        .unwrap();
        assert_eq!(user.wallet_address(), Some("0xdef"));
        assert_eq!(user.wallet_provider(), None);
    }

    #[test]
    fn test_user_missing_fields() {
        let user: CommunityUser = serde_json::from_str("{}").unwrap();
        assert_eq!(user.wallet_address(), None);
        assert_eq!(user.balance_display(), "0");
    }

    #[test]
    fn test_event_parses() {
        let event: CommunityEvent = serde_json::from_str(
            r#"{"title": "AMA", "link": "https://x.io", "isActive": true, "time": "18:00"}"#,
        )
        .unwrap();
        assert_eq!(event.is_active, Some(true));
    }
}
