//! Pull reward distribution and claim events from the chain into the database
//!
//! Usage:
//!   cargo run --bin sync_rewards -- distributions --from-block 5000000
//!   cargo run --bin sync_rewards -- claims --wallet 0xabc... --to-block 5100000
//!   cargo run --bin sync_rewards -- all
//!   cargo run --bin sync_rewards -- status --wallet 0xabc...

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use sea_orm::Database;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use diora_backend::config::AppConfig;
use diora_backend::entities::sea_orm_active_enums::NftTier;
use diora_backend::services::chain::AlloyRewardsChain;
use diora_backend::services::reward_sync::{
    BlockTarget, DbRewardLedger, RewardSyncService, SyncReport,
};

#[derive(Parser, Debug)]
#[command(name = "sync_rewards", about = "Sync DIT reward events from the blockchain")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// RewardsDistributed events
    Distributions(RangeArgs),
    /// RewardsClaimed events
    Claims {
        #[command(flatten)]
        range: RangeArgs,
        /// Only claims made by this wallet
        #[arg(long)]
        wallet: Option<String>,
    },
    /// Distributions, then claims
    All(RangeArgs),
    /// Print on-chain totals per tier, and a wallet's pending/claimed rewards
    Status {
        #[arg(long)]
        wallet: Option<String>,
    },
}

#[derive(Args, Debug)]
struct RangeArgs {
    /// First block to scan; defaults to one past the last stored event
    #[arg(long)]
    from_block: Option<u64>,
    /// Last block to scan, or "latest"
    #[arg(long, default_value = "latest")]
    to_block: BlockTarget,
}

fn print_report(label: &str, report: &SyncReport) {
    println!(
        "{}: {} inserted, {} skipped, {} failed",
        label, report.inserted, report.skipped, report.failed
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,diora_backend=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = AppConfig::from_env()?;

    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!(rpc = %config.blockchain_rpc_url, "Connecting to blockchain...");
    let chain = AlloyRewardsChain::connect(
        &config.blockchain_rpc_url,
        &config.rewards_contract_address,
        config.rewards_token_address.as_deref(),
    )
    .await
    .context("Failed to connect to blockchain network")?;

    if let Command::Status { wallet } = &cli.command {
        for tier in NftTier::ALL {
            println!("{}: {}", tier, chain.total_rewards_by_tier(tier).await);
        }
        if let Some(wallet) = wallet {
            println!("Pending for {}: {}", wallet, chain.pending_rewards(wallet).await);
            println!("Claimed by {}: {}", wallet, chain.claimed_rewards(wallet).await);
        }
        return Ok(());
    }

    let service = RewardSyncService::new(chain, DbRewardLedger::new(db), config.sync_chunk_size);

    match cli.command {
        Command::Distributions(range) => {
            let report = service
                .sync_distributions(range.from_block, range.to_block)
                .await?;
            print_report("Distributions", &report);
        }
        Command::Claims { range, wallet } => {
            let report = service
                .sync_claims(range.from_block, range.to_block, wallet.as_deref())
                .await?;
            print_report("Claims", &report);
        }
        Command::All(range) => {
            let (distributions, claims) =
                service.sync_all(range.from_block, range.to_block).await?;
            print_report("Distributions", &distributions);
            print_report("Claims", &claims);
        }
        Command::Status { .. } => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_claims_with_wallet() {
        let cli = Cli::try_parse_from([
            "sync_rewards",
            "claims",
            "--from-block",
            "100",
            "--to-block",
            "200",
            "--wallet",
            "0xabc",
        ])
        .unwrap();

        match cli.command {
            Command::Claims { range, wallet } => {
                assert_eq!(range.from_block, Some(100));
                assert_eq!(range.to_block, BlockTarget::Number(200));
                assert_eq!(wallet.as_deref(), Some("0xabc"));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_to_block_defaults_to_latest() {
        let cli = Cli::try_parse_from(["sync_rewards", "all"]).unwrap();
        match cli.command {
            Command::All(range) => {
                assert_eq!(range.from_block, None);
                assert_eq!(range.to_block, BlockTarget::Latest);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_rejects_bad_block() {
        assert!(Cli::try_parse_from(["sync_rewards", "distributions", "--to-block", "soon"]).is_err());
    }
}
