use serde::Deserialize;

use super::common::PageQuery;

/// Rows per admin page when `page_size` is not given
pub const ADMIN_PAGE_SIZE: u64 = 50;

/// Query string shared by the database-backed admin tables.
///
/// Each page reads only the filters that apply to its table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    /// Case-insensitive substring over the table's address and hash columns
    pub search: Option<String>,
    pub nft_type: Option<String>,
    pub tokens_delivered: Option<bool>,
    pub membership_added: Option<bool>,
    pub has_dragon: Option<bool>,
    pub dragon_delivered: Option<bool>,
    pub reward_sent: Option<bool>,
}

impl AdminQuery {
    pub fn pagination(&self) -> PageQuery {
        let page_size = self
            .page_size
            .filter(|size| *size > 0)
            .unwrap_or(ADMIN_PAGE_SIZE);
        PageQuery::new(self.page, Some(page_size))
    }

    /// Query string carrying the active filters, without `page`
    pub fn filter_string(&self) -> String {
        let mut params: Vec<String> = Vec::new();
        if let Some(size) = self.page_size.filter(|size| *size > 0) {
            params.push(format!("page_size={}", size));
        }
        for (name, value) in [("search", &self.search), ("nft_type", &self.nft_type)] {
            if let Some(value) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                params.push(format!("{}={}", name, encode_component(value)));
            }
        }
        for (name, flag) in [
            ("tokens_delivered", self.tokens_delivered),
            ("membership_added", self.membership_added),
            ("has_dragon", self.has_dragon),
            ("dragon_delivered", self.dragon_delivered),
            ("reward_sent", self.reward_sent),
        ] {
            if let Some(flag) = flag {
                params.push(format!("{}={}", name, flag));
            }
        }
        params.join("&")
    }
}

fn encode_component(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}
