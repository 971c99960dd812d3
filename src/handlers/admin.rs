//! Server-rendered admin dashboards
//!
//! Plain HTML tables for support staff. Every cell goes through
//! [`escape_html`]. Community pages render an empty table when the upstream
//! API fails. Database tables are paginated and filtered by [`AdminQuery`].

use axum::{
    extract::{Query, State},
    response::Html,
};
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder};
use tracing::error;

use super::{bad_request, contains_ci, filter_value, paginate, ApiError};
use crate::entities::{
    donations, memberships, nft_rewards, prelude::*, presales, reward_distributions,
    sea_orm_active_enums::NftRewardKind, user_reward_claims,
};
use crate::models::admin::AdminQuery;
use crate::models::common::Paginated;
use crate::models::reward::parse_tier_filter;
use crate::AppState;

const COMMUNITY_PAGE_LIMIT: u32 = 100;

const STYLE: &str = "body{font-family:sans-serif;margin:2rem;color:#222}\
table{border-collapse:collapse;width:100%;font-size:14px}\
th,td{border:1px solid #ddd;padding:6px 8px;text-align:left}\
th{background:#f4f4f4}tr:nth-child(even){background:#fafafa}\
.empty{color:#888;font-style:italic}";

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// `first10…last8` for long hashes and addresses
pub fn short_display(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 18 {
        return value.to_string();
    }
    let head: String = chars[..10].iter().collect();
    let tail: String = chars[chars.len() - 8..].iter().collect();
    format!("{}…{}", head, tail)
}

fn render_table(
    title: &str,
    headers: &[&str],
    rows: &[Vec<String>],
    pager: Option<String>,
) -> Html<String> {
    let head: String = headers
        .iter()
        .map(|h| format!("<th>{}</th>", escape_html(h)))
        .collect();

    let body: String = if rows.is_empty() {
        format!(
            "<tr><td class=\"empty\" colspan=\"{}\">No records</td></tr>",
            headers.len()
        )
    } else {
        rows.iter()
            .map(|row| {
                let cells: String = row
                    .iter()
                    .map(|cell| format!("<td>{}</td>", escape_html(cell)))
                    .collect();
                format!("<tr>{}</tr>", cells)
            })
            .collect()
    };

    let title = escape_html(title);
    let summary = pager.unwrap_or_else(|| format!("<p>{} rows</p>", rows.len()));
    Html(format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{title}</title>\
<style>{STYLE}</style></head><body><h1>{title}</h1>\
{summary}<table><thead><tr>{head}</tr></thead><tbody>{body}</tbody></table>\
</body></html>"
    ))
}

/// Page position plus previous/next links that keep the active filters
fn render_pager<T>(path: &str, query: &AdminQuery, page: &Paginated<T>) -> String {
    let filters = query.filter_string();
    let link = |target: u64, label: &str| {
        let href = if filters.is_empty() {
            format!("/admin{}?page={}", path, target)
        } else {
            format!("/admin{}?page={}&{}", path, target, filters)
        };
        format!(" <a href=\"{}\">{}</a>", escape_html(&href), label)
    };

    let mut out = format!(
        "<p>Page {} of {} ({} rows)",
        page.page,
        page.total_pages,
        page.count
    );
    if page.page > 1 {
        out.push_str(&link(page.page - 1, "Previous"));
    }
    if page.page < page.total_pages {
        out.push_str(&link(page.page + 1, "Next"));
    }
    out.push_str("</p>");
    out
}

fn optional(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}

fn yes_no(flag: bool) -> String {
    if flag { "Yes" } else { "No" }.to_string()
}

pub async fn community_members(State(state): State<AppState>) -> Html<String> {
    let users = state
        .community
        .fetch_users(Some(COMMUNITY_PAGE_LIMIT))
        .await
        .unwrap_or_else(|e| {
            error!(error = %e, "Failed to fetch community members");
            Vec::new()
        });

    let rows: Vec<Vec<String>> = users
        .iter()
        .enumerate()
        .map(|(i, user)| {
            vec![
                (i + 1).to_string(),
                optional(user.display_name.as_deref()),
                optional(user.email.as_deref()),
                user.wallet_address().map(short_display).unwrap_or_else(|| "-".to_string()),
                user.balance_display(),
                optional(user.wallet_provider()),
            ]
        })
        .collect();

    render_table(
        "Community Members",
        &["ID", "Display Name", "Email", "Wallet Address", "DIT Token Balance", "Wallet provider"],
        &rows,
        None,
    )
}

pub async fn community_events(State(state): State<AppState>) -> Html<String> {
    let events = state.community.fetch_events().await.unwrap_or_else(|e| {
        error!(error = %e, "Failed to fetch community events");
        Vec::new()
    });

    let rows: Vec<Vec<String>> = events
        .iter()
        .enumerate()
        .map(|(i, event)| {
            vec![
                (i + 1).to_string(),
                optional(event.title.as_deref()),
                optional(event.time.as_deref()),
                optional(event.link.as_deref()),
                yes_no(event.is_active.unwrap_or(false)),
            ]
        })
        .collect();

    render_table(
        "Community Events",
        &["ID", "Title", "Time", "Link", "Is Active"],
        &rows,
        None,
    )
}

pub async fn reward_distributions_page(
    State(state): State<AppState>,
    Query(query): Query<AdminQuery>,
) -> Result<Html<String>, ApiError> {
    let tier = parse_tier_filter(query.nft_type.as_deref()).map_err(bad_request)?;

    let mut select = RewardDistributions::find();
    if let Some(tier) = tier {
        select = select.filter(reward_distributions::Column::NftType.eq(tier));
    }
    if let Some(search) = filter_value(&query.search) {
        select = select.filter(
            Condition::any()
                .add(contains_ci(reward_distributions::Column::TransactionHash, search))
                .add(contains_ci(reward_distributions::Column::NftType, search)),
        );
    }
    let select = select
        .order_by_desc(reward_distributions::Column::DistributedAt)
        .order_by_desc(reward_distributions::Column::Id);

    let page = paginate(&state.db, select, &query.pagination()).await?;
    let rows: Vec<Vec<String>> = page
        .results
        .iter()
        .map(|d| {
            vec![
                d.id.to_string(),
                d.nft_type.to_string(),
                d.total_amount.to_string(),
                d.per_wallet_amount.to_string(),
                d.wallet_count.to_string(),
                short_display(&d.transaction_hash),
                d.block_number.to_string(),
                d.distributed_at.format("%Y-%m-%d %H:%M").to_string(),
            ]
        })
        .collect();

    Ok(render_table(
        "Reward Distributions",
        &[
            "ID",
            "NFT Type",
            "Total Amount",
            "Per Wallet",
            "Wallets",
            "Transaction",
            "Block",
            "Distributed At",
        ],
        &rows,
        Some(render_pager("/reward-distributions", &query, &page)),
    ))
}

pub async fn reward_claims_page(
    State(state): State<AppState>,
    Query(query): Query<AdminQuery>,
) -> Result<Html<String>, ApiError> {
    let mut select = UserRewardClaims::find();
    if let Some(search) = filter_value(&query.search) {
        select = select.filter(
            Condition::any()
                .add(contains_ci(user_reward_claims::Column::WalletAddress, search))
                .add(contains_ci(user_reward_claims::Column::TransactionHash, search)),
        );
    }
    let select = select
        .order_by_desc(user_reward_claims::Column::ClaimedAt)
        .order_by_desc(user_reward_claims::Column::Id);

    let page = paginate(&state.db, select, &query.pagination()).await?;
    let rows: Vec<Vec<String>> = page
        .results
        .iter()
        .map(|c| {
            vec![
                c.id.to_string(),
                short_display(&c.wallet_address),
                c.amount.to_string(),
                short_display(&c.transaction_hash),
                c.block_number.to_string(),
                c.claimed_at.format("%Y-%m-%d %H:%M").to_string(),
            ]
        })
        .collect();

    Ok(render_table(
        "Reward Claims",
        &["ID", "Wallet", "Amount", "Transaction", "Block", "Claimed At"],
        &rows,
        Some(render_pager("/reward-claims", &query, &page)),
    ))
}

pub async fn presales_page(
    State(state): State<AppState>,
    Query(query): Query<AdminQuery>,
) -> Result<Html<String>, ApiError> {
    let mut select = Presales::find();
    if let Some(search) = filter_value(&query.search) {
        select = select.filter(contains_ci(presales::Column::ReceiverAddress, search));
    }
    if let Some(delivered) = query.tokens_delivered {
        select = select.filter(presales::Column::TokensDelivered.eq(delivered));
    }
    let select = select
        .order_by_desc(presales::Column::PurchaseDate)
        .order_by_desc(presales::Column::Id);

    let page = paginate(&state.db, select, &query.pagination()).await?;
    let rows: Vec<Vec<String>> = page
        .results
        .iter()
        .map(|p| {
            vec![
                p.id.to_string(),
                p.dit_amount.to_string(),
                p.usdt_amount.to_string(),
                p.crypto_currency.clone(),
                short_display(&p.receiver_address),
                p.purchase_date.format("%Y-%m-%d %H:%M").to_string(),
                yes_no(p.tokens_delivered),
            ]
        })
        .collect();

    Ok(render_table(
        "Presale Purchases",
        &["ID", "DIT", "USDT", "Currency", "Receiver", "Purchased", "Delivered"],
        &rows,
        Some(render_pager("/presales", &query, &page)),
    ))
}

pub async fn memberships_page(
    State(state): State<AppState>,
    Query(query): Query<AdminQuery>,
) -> Result<Html<String>, ApiError> {
    let mut select = Memberships::find();
    if let Some(search) = filter_value(&query.search) {
        select = select.filter(contains_ci(memberships::Column::ReceiverAddress, search));
    }
    if let Some(added) = query.membership_added {
        select = select.filter(memberships::Column::MembershipAdded.eq(added));
    }
    let select = select
        .order_by_desc(memberships::Column::PurchaseDate)
        .order_by_desc(memberships::Column::Id);

    let page = paginate(&state.db, select, &query.pagination()).await?;
    let rows: Vec<Vec<String>> = page
        .results
        .iter()
        .map(|m| {
            vec![
                m.id.to_string(),
                m.usdt_amount.to_string(),
                m.crypto_currency.clone(),
                optional(m.email.as_deref()),
                m.quantity.map(|q| q.to_string()).unwrap_or_else(|| "-".to_string()),
                short_display(&m.receiver_address),
                m.purchase_date.format("%Y-%m-%d %H:%M").to_string(),
                yes_no(m.membership_added),
            ]
        })
        .collect();

    Ok(render_table(
        "Memberships",
        &["ID", "USDT", "Currency", "Email", "Quantity", "Receiver", "Purchased", "Added"],
        &rows,
        Some(render_pager("/memberships", &query, &page)),
    ))
}

pub async fn donations_page(
    State(state): State<AppState>,
    Query(query): Query<AdminQuery>,
) -> Result<Html<String>, ApiError> {
    let mut select = Donations::find();
    if let Some(search) = filter_value(&query.search) {
        select = select.filter(contains_ci(donations::Column::ReceiverAddress, search));
    }
    if let Some(has_dragon) = query.has_dragon {
        select = select.filter(donations::Column::HasDragon.eq(has_dragon));
    }
    if let Some(delivered) = query.dragon_delivered {
        select = select.filter(donations::Column::DragonDelivered.eq(delivered));
    }
    let select = select
        .order_by_desc(donations::Column::PurchaseDate)
        .order_by_desc(donations::Column::Id);

    let page = paginate(&state.db, select, &query.pagination()).await?;
    let rows: Vec<Vec<String>> = page
        .results
        .iter()
        .map(|d| {
            vec![
                d.id.to_string(),
                d.amount.to_string(),
                d.usdt_amount.to_string(),
                short_display(&d.receiver_address),
                optional(d.email_address.as_deref()),
                d.purchase_date.format("%Y-%m-%d %H:%M").to_string(),
                yes_no(d.has_dragon),
                yes_no(d.dragon_delivered),
            ]
        })
        .collect();

    Ok(render_table(
        "Donations",
        &["ID", "Amount", "USDT", "Receiver", "Email", "Donated", "Dragon", "Dragon Delivered"],
        &rows,
        Some(render_pager("/donations", &query, &page)),
    ))
}

pub async fn nft_rewards_page(
    State(state): State<AppState>,
    Query(query): Query<AdminQuery>,
) -> Result<Html<String>, ApiError> {
    let kind = match filter_value(&query.nft_type) {
        None => None,
        Some(raw) => Some(
            NftRewardKind::parse(raw)
                .ok_or_else(|| bad_request(format!("Invalid nft_type: {}", raw)))?,
        ),
    };

    let mut select = NftRewards::find();
    if let Some(kind) = kind {
        select = select.filter(nft_rewards::Column::NftType.eq(kind));
    }
    if let Some(search) = filter_value(&query.search) {
        select = select.filter(
            Condition::any()
                .add(contains_ci(nft_rewards::Column::WalletAddress, search))
                .add(contains_ci(nft_rewards::Column::Email, search)),
        );
    }
    if let Some(sent) = query.reward_sent {
        select = select.filter(nft_rewards::Column::RewardSent.eq(sent));
    }
    let select = select
        .order_by_desc(nft_rewards::Column::RewardCollectionDate)
        .order_by_desc(nft_rewards::Column::Id);

    let page = paginate(&state.db, select, &query.pagination()).await?;
    let rows: Vec<Vec<String>> = page
        .results
        .iter()
        .map(|r| {
            vec![
                r.id.to_string(),
                r.email.clone(),
                short_display(&r.wallet_address),
                r.nft_type.as_str().to_string(),
                r.dit_amount.to_string(),
                r.reward_collection_date.format("%Y-%m-%d %H:%M").to_string(),
                yes_no(r.reward_sent),
            ]
        })
        .collect();

    Ok(render_table(
        "NFT Rewards",
        &["ID", "Email", "Wallet", "NFT Type", "DIT", "Collected", "Sent"],
        &rows,
        Some(render_pager("/nft-rewards", &query, &page)),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<script>alert('x') & \"y\"</script>"),
            "&lt;script&gt;alert(&#x27;x&#x27;) &amp; &quot;y&quot;&lt;/script&gt;"
        );
    }

    #[test]
    fn test_short_display() {
        let hash = "0x1234567890abcdef1234567890abcdef12345678";
        assert_eq!(short_display(hash), "0x12345678…12345678");
        assert_eq!(short_display("0xabc"), "0xabc");
    }

    #[test]
    fn test_render_table_escapes_cells() {
        let Html(page) = render_table(
            "Members",
            &["Name"],
            &[vec!["<b>bold</b>".to_string()]],
            None,
        );
        assert!(page.contains("<td>&lt;b&gt;bold&lt;/b&gt;</td>"));
        assert!(!page.contains("<td><b>"));
    }

    #[test]
    fn test_render_empty_table() {
        let Html(page) = render_table("Events", &["ID", "Title"], &[], None);
        assert!(page.contains("colspan=\"2\""));
        assert!(page.contains("0 rows"));
    }

    #[test]
    fn test_pager_links_keep_filters() {
        let query = AdminQuery {
            page: Some(2),
            has_dragon: Some(true),
            ..Default::default()
        };
        let page = Paginated::new(vec![1, 2], 120, 2, 50);
        let pager = render_pager("/donations", &query, &page);

        assert!(pager.starts_with("<p>Page 2 of 3 (120 rows)"));
        assert!(pager.contains("href=\"/admin/donations?page=1&amp;has_dragon=true\""));
        assert!(pager.contains("href=\"/admin/donations?page=3&amp;has_dragon=true\""));
    }

    #[test]
    fn test_pager_on_single_page_has_no_links() {
        let page: Paginated<u32> = Paginated::new(Vec::new(), 0, 1, 50);
        let pager = render_pager("/presales", &AdminQuery::default(), &page);
        assert_eq!(pager, "<p>Page 1 of 1 (0 rows)</p>");
    }
}
