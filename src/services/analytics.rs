//! Time-windowed reward analytics
//!
//! A period keyword (or explicit custom dates) selects a current window and
//! an equal-length window immediately before it. Metrics are computed over
//! both, then compared with [`percentage_change`].

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    Select,
};
use thiserror::Error;

use crate::entities::{
    pending_rewards, prelude::*, reward_distributions, sea_orm_active_enums::NftTier,
};
use crate::models::analytics::{
    AllNftTypesResponse, AnalyticsQuery, MetricChanges, NftTypeRewardsResponse, PeriodInfo,
    RewardMetrics, RewardTotals, TotalRewardsResponse, WalletRewardBreakdown, WalletRewardEntry,
    WindowedMetrics,
};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("start_date and end_date are required for custom period")]
    MissingCustomDates,

    #[error("Invalid date format. Use YYYY-MM-DD")]
    InvalidDateFormat,

    #[error("start_date must not be after end_date")]
    InvertedRange,

    #[error("Invalid period. Must be one of: week, month, 6months, year, custom")]
    InvalidPeriod(String),

    #[error("nft_type parameter is required")]
    MissingNftType,

    #[error("Invalid nft_type. Must be one of: {}", NftTier::choices())]
    InvalidNftType(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl AnalyticsError {
    pub fn is_invalid_input(&self) -> bool {
        !matches!(self, AnalyticsError::Database(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Week,
    Month,
    SixMonths,
    Year,
    Custom,
}

impl Period {
    pub fn parse(raw: &str) -> Result<Self, AnalyticsError> {
        match raw.trim().to_lowercase().as_str() {
            "week" => Ok(Period::Week),
            "month" => Ok(Period::Month),
            "6months" => Ok(Period::SixMonths),
            "year" => Ok(Period::Year),
            "custom" => Ok(Period::Custom),
            _ => Err(AnalyticsError::InvalidPeriod(raw.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Week => "week",
            Period::Month => "month",
            Period::SixMonths => "6months",
            Period::Year => "year",
            Period::Custom => "custom",
        }
    }

    /// Fixed window length; custom windows take theirs from the dates
    pub fn days(&self) -> Option<i64> {
        match self {
            Period::Week => Some(7),
            Period::Month => Some(30),
            Period::SixMonths => Some(180),
            Period::Year => Some(365),
            Period::Custom => None,
        }
    }
}

/// Current window `[start, end]` and previous window `[prev_start, prev_end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub period: Period,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub prev_start: DateTime<Utc>,
    pub prev_end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn info(&self) -> PeriodInfo {
        PeriodInfo {
            period: self.period.as_str().to_string(),
            start_date: self.start.format(DATE_FORMAT).to_string(),
            end_date: self.end.format(DATE_FORMAT).to_string(),
        }
    }

    fn current(&self) -> Range {
        Range {
            start: self.start,
            end: self.end,
            end_inclusive: true,
        }
    }

    fn previous(&self) -> Range {
        Range {
            start: self.prev_start,
            end: self.prev_end,
            end_inclusive: false,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Range {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    end_inclusive: bool,
}

fn parse_date(raw: &str) -> Result<NaiveDate, AnalyticsError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|_| AnalyticsError::InvalidDateFormat)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Resolve the query's period into windows. `Ok(None)` means all time.
pub fn resolve_window(
    period: Option<&str>,
    start_date: Option<&str>,
    end_date: Option<&str>,
    now: DateTime<Utc>,
) -> Result<Option<TimeWindow>, AnalyticsError> {
    let Some(raw) = non_empty(period) else {
        return Ok(None);
    };
    let period = Period::parse(raw)?;

    if let Some(days) = period.days() {
        let length = Duration::days(days);
        let start = now - length;
        return Ok(Some(TimeWindow {
            period,
            start,
            end: now,
            prev_start: start - length,
            prev_end: start,
        }));
    }

    let (Some(start_raw), Some(end_raw)) = (non_empty(start_date), non_empty(end_date)) else {
        return Err(AnalyticsError::MissingCustomDates);
    };
    let start = parse_date(start_raw)?.and_time(NaiveTime::MIN).and_utc();
    let end_of_day = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
    let end = parse_date(end_raw)?.and_time(end_of_day).and_utc();
    if start > end {
        return Err(AnalyticsError::InvertedRange);
    }

    let length = end - start;
    Ok(Some(TimeWindow {
        period,
        start,
        end,
        prev_start: start - length,
        prev_end: start,
    }))
}

/// Percent change from `previous` to `current`, rounded to two places.
///
/// A zero previous value yields 100 when current is positive and 0 otherwise.
pub fn percentage_change(current: Decimal, previous: Decimal) -> f64 {
    if previous.is_zero() {
        return if current > Decimal::ZERO { 100.0 } else { 0.0 };
    }
    ((current - previous) / previous * Decimal::ONE_HUNDRED)
        .round_dp(2)
        .to_f64()
        .unwrap_or(0.0)
}

fn metric_changes(current: &RewardMetrics, previous: &RewardMetrics) -> MetricChanges {
    MetricChanges {
        total_distributed: percentage_change(current.total_distributed, previous.total_distributed),
        total_distributions: percentage_change(
            Decimal::from(current.total_distributions),
            Decimal::from(previous.total_distributions),
        ),
        total_wallets_rewarded: percentage_change(
            Decimal::from(current.total_wallets_rewarded),
            Decimal::from(previous.total_wallets_rewarded),
        ),
    }
}

fn distributions_in(tier: Option<NftTier>, range: Option<Range>) -> Select<RewardDistributions> {
    let mut query = RewardDistributions::find();
    if let Some(tier) = tier {
        query = query.filter(reward_distributions::Column::NftType.eq(tier));
    }
    if let Some(range) = range {
        query = query.filter(reward_distributions::Column::DistributedAt.gte(range.start));
        query = if range.end_inclusive {
            query.filter(reward_distributions::Column::DistributedAt.lte(range.end))
        } else {
            query.filter(reward_distributions::Column::DistributedAt.lt(range.end))
        };
    }
    query
}

async fn metrics<C: ConnectionTrait>(
    db: &C,
    tier: Option<NftTier>,
    range: Option<Range>,
) -> Result<RewardMetrics, DbErr> {
    let rows: Vec<(Decimal, i32)> = distributions_in(tier, range)
        .select_only()
        .column(reward_distributions::Column::TotalAmount)
        .column(reward_distributions::Column::WalletCount)
        .into_tuple()
        .all(db)
        .await?;

    Ok(RewardMetrics {
        total_distributed: rows.iter().map(|(amount, _)| *amount).sum(),
        total_distributions: rows.len() as u64,
        total_wallets_rewarded: rows.iter().map(|(_, wallets)| *wallets as i64).sum(),
    })
}

async fn totals<C: ConnectionTrait>(
    db: &C,
    tier: Option<NftTier>,
    window: Option<&TimeWindow>,
) -> Result<RewardTotals, DbErr> {
    match window {
        None => Ok(RewardTotals::AllTime(metrics(db, tier, None).await?)),
        Some(window) => {
            let current = metrics(db, tier, Some(window.current())).await?;
            let previous = metrics(db, tier, Some(window.previous())).await?;
            Ok(RewardTotals::Windowed(WindowedMetrics {
                percentage_change: metric_changes(&current, &previous),
                current_period: current,
                previous_period: previous,
            }))
        }
    }
}

/// Totals across every tier
pub async fn total_rewards<C: ConnectionTrait>(
    db: &C,
    query: &AnalyticsQuery,
    now: DateTime<Utc>,
) -> Result<TotalRewardsResponse, AnalyticsError> {
    let window = resolve_window(
        query.period.as_deref(),
        query.start_date.as_deref(),
        query.end_date.as_deref(),
        now,
    )?;

    Ok(TotalRewardsResponse {
        window: window.as_ref().map(TimeWindow::info),
        totals: totals(db, None, window.as_ref()).await?,
    })
}

/// Totals for one tier, plus a wallet's share when `wallet_address` is set
pub async fn nft_type_rewards<C: ConnectionTrait>(
    db: &C,
    query: &AnalyticsQuery,
    now: DateTime<Utc>,
) -> Result<NftTypeRewardsResponse, AnalyticsError> {
    let raw_tier = non_empty(query.nft_type.as_deref()).ok_or(AnalyticsError::MissingNftType)?;
    let tier =
        NftTier::parse(raw_tier).ok_or_else(|| AnalyticsError::InvalidNftType(raw_tier.to_string()))?;

    let window = resolve_window(
        query.period.as_deref(),
        query.start_date.as_deref(),
        query.end_date.as_deref(),
        now,
    )?;

    let totals = totals(db, Some(tier), window.as_ref()).await?;

    let wallet = match non_empty(query.wallet_address.as_deref()) {
        Some(wallet) => {
            let range = window.as_ref().map(TimeWindow::current);
            Some(wallet_rewards(db, wallet, tier, range).await?)
        }
        None => None,
    };

    Ok(NftTypeRewardsResponse {
        nft_type: tier.as_str().to_string(),
        window: window.as_ref().map(TimeWindow::info),
        totals,
        wallet,
    })
}

/// Totals keyed by tier label
pub async fn all_nft_types_rewards<C: ConnectionTrait>(
    db: &C,
    query: &AnalyticsQuery,
    now: DateTime<Utc>,
) -> Result<AllNftTypesResponse, AnalyticsError> {
    let window = resolve_window(
        query.period.as_deref(),
        query.start_date.as_deref(),
        query.end_date.as_deref(),
        now,
    )?;

    let mut nft_types = BTreeMap::new();
    for tier in NftTier::ALL {
        let tier_totals = totals(db, Some(tier), window.as_ref()).await?;
        nft_types.insert(tier.as_str().to_string(), tier_totals);
    }

    Ok(AllNftTypesResponse {
        window: window.as_ref().map(TimeWindow::info),
        nft_types,
    })
}

/// A wallet's pending rewards for one tier, grouped by distribution transaction
async fn wallet_rewards<C: ConnectionTrait>(
    db: &C,
    wallet: &str,
    tier: NftTier,
    range: Option<Range>,
) -> Result<WalletRewardBreakdown, DbErr> {
    let wallet = wallet.trim().to_lowercase();

    let mut query = PendingRewards::find()
        .find_also_related(RewardDistributions)
        .filter(pending_rewards::Column::WalletAddress.eq(wallet.as_str()))
        .filter(pending_rewards::Column::NftType.eq(tier));
    if let Some(range) = range {
        query = query
            .filter(reward_distributions::Column::DistributedAt.gte(range.start))
            .filter(reward_distributions::Column::DistributedAt.lte(range.end));
    }
    let rows = query
        .order_by_desc(reward_distributions::Column::DistributedAt)
        .all(db)
        .await?;

    let mut entries: Vec<WalletRewardEntry> = Vec::new();
    let mut by_hash: HashMap<String, usize> = HashMap::new();
    for (reward, distribution) in rows {
        let Some(distribution) = distribution else {
            continue;
        };
        match by_hash.get(&distribution.transaction_hash) {
            Some(&idx) => entries[idx].user_reward += reward.dit_amount,
            None => {
                by_hash.insert(distribution.transaction_hash.clone(), entries.len());
                entries.push(WalletRewardEntry {
                    transaction_hash: distribution.transaction_hash,
                    distributed_at: distribution.distributed_at,
                    per_wallet_amount: distribution.per_wallet_amount,
                    user_reward: reward.dit_amount,
                    is_sent: reward.is_sent,
                    block_number: distribution.block_number,
                });
            }
        }
    }

    let total_user_rewards = entries.iter().map(|e| e.user_reward).sum();
    Ok(WalletRewardBreakdown {
        wallet_address: wallet,
        wallet_rewards: entries,
        total_user_rewards,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_percentage_change_values() {
        assert_eq!(percentage_change(dec!(100), dec!(80)), 25.0);
        assert_eq!(percentage_change(dec!(0), dec!(0)), 0.0);
        assert_eq!(percentage_change(dec!(50), dec!(0)), 100.0);
        assert_eq!(percentage_change(dec!(0), dec!(50)), -100.0);
    }

    #[test]
    fn test_percentage_change_rounds_to_two_places() {
        assert_eq!(percentage_change(dec!(1), dec!(3)), -66.67);
        assert_eq!(percentage_change(dec!(200), dec!(3)), 6566.67);
    }

    #[test]
    fn test_no_period_is_all_time() {
        assert_eq!(resolve_window(None, None, None, now()).unwrap(), None);
        assert_eq!(resolve_window(Some(""), None, None, now()).unwrap(), None);
    }

    #[test]
    fn test_fixed_periods() {
        let window = resolve_window(Some("week"), None, None, now()).unwrap().unwrap();
        assert_eq!(window.end, now());
        assert_eq!(window.start, now() - Duration::days(7));
        assert_eq!(window.prev_end, window.start);
        assert_eq!(window.prev_start, now() - Duration::days(14));

        let window = resolve_window(Some("6months"), None, None, now()).unwrap().unwrap();
        assert_eq!(window.period, Period::SixMonths);
        assert_eq!(window.start, now() - Duration::days(180));

        let window = resolve_window(Some("year"), None, None, now()).unwrap().unwrap();
        assert_eq!(window.prev_start, now() - Duration::days(730));
    }

    #[test]
    fn test_custom_window() {
        let window = resolve_window(Some("custom"), Some("2026-01-01"), Some("2026-01-10"), now())
            .unwrap()
            .unwrap();
        assert_eq!(window.start, Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(window.end, Utc.with_ymd_and_hms(2026, 1, 10, 23, 59, 59).unwrap());
        assert_eq!(window.prev_end, window.start);
        assert_eq!(window.prev_start, window.start - (window.end - window.start));

        let info = window.info();
        assert_eq!(info.period, "custom");
        assert_eq!(info.start_date, "2026-01-01");
        assert_eq!(info.end_date, "2026-01-10");
    }

    #[test]
    fn test_custom_window_errors() {
        let missing = resolve_window(Some("custom"), Some("2026-01-01"), None, now()).unwrap_err();
        assert_eq!(
            missing.to_string(),
            "start_date and end_date are required for custom period"
        );

        let bad = resolve_window(Some("custom"), Some("01/01/2026"), Some("2026-01-10"), now())
            .unwrap_err();
        assert_eq!(bad.to_string(), "Invalid date format. Use YYYY-MM-DD");

        let inverted =
            resolve_window(Some("custom"), Some("2026-02-01"), Some("2026-01-10"), now())
                .unwrap_err();
        assert!(matches!(inverted, AnalyticsError::InvertedRange));
    }

    #[test]
    fn test_unknown_period() {
        let err = resolve_window(Some("fortnight"), None, None, now()).unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidPeriod(_)));
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_metric_changes() {
        let current = RewardMetrics {
            total_distributed: dec!(100),
            total_distributions: 5,
            total_wallets_rewarded: 0,
        };
        let previous = RewardMetrics {
            total_distributed: dec!(80),
            total_distributions: 0,
            total_wallets_rewarded: 10,
        };
        let changes = metric_changes(&current, &previous);
        assert_eq!(changes.total_distributed, 25.0);
        assert_eq!(changes.total_distributions, 100.0);
        assert_eq!(changes.total_wallets_rewarded, -100.0);
    }

    #[test]
    fn test_invalid_nft_type_message() {
        let err = AnalyticsError::InvalidNftType("GOLD".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid nft_type. Must be one of: RED, GREEN, BLUE, BLACK, DRAGON, FLAWLESS_DIAMOND"
        );
    }
}
