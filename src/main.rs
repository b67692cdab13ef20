// vaultctl - operator CLI over a sled-persisted vault

use clap::{Parser, Subcommand, ValueEnum};
use sharevault::account::AccountId;
use sharevault::accounting::Amount;
use sharevault::config::VaultConfig;
use sharevault::ledger::{AssetLedger, LedgerError, MemoryAssetLedger, MemoryShareLedger};
use sharevault::policy::CappedPolicy;
use sharevault::service::VaultHandle;
use sharevault::storage::{StoreError, VaultStore};
use sharevault::vault::{MemoryVault, Vault, VaultError, VaultEvent};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

type Handle = VaultHandle<MemoryAssetLedger, MemoryShareLedger, CappedPolicy>;

#[derive(Error, Debug)]
enum CliError {
    #[error("{0}")]
    Vault(#[from] VaultError),

    #[error("{0}")]
    Store(#[from] StoreError),

    #[error("{0}")]
    Ledger(#[from] LedgerError),

    #[error("No vault found at {0}; run `vaultctl init` first")]
    NotInitialized(String),

    #[error("Vault already initialized at {0}")]
    AlreadyInitialized(String),
}

#[derive(Parser)]
#[command(name = "vaultctl")]
#[command(about = "Pooled-asset share vault", long_about = None)]
struct Cli {
    /// Database directory
    #[arg(long, global = true, default_value = ".vault")]
    db: String,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an empty vault
    Init {
        #[arg(long, default_value = "vault")]
        name: String,

        /// Ceiling on the total reserve
        #[arg(long)]
        deposit_cap: Option<Amount>,

        #[arg(long)]
        max_deposit_per_call: Option<Amount>,

        #[arg(long)]
        max_withdraw_per_call: Option<Amount>,

        /// Smallest deposit accepted into an empty pool
        #[arg(long, default_value = "0")]
        min_initial_deposit: Amount,
    },

    /// Issue base-asset units to an account
    Fund { account: String, amount: Amount },

    /// Deposit assets for shares
    Deposit {
        caller: String,
        assets: Amount,
        #[arg(long)]
        receiver: Option<String>,
    },

    /// Mint an exact number of shares
    Mint {
        caller: String,
        shares: Amount,
        #[arg(long)]
        receiver: Option<String>,
    },

    /// Withdraw an exact number of assets
    Withdraw {
        caller: String,
        assets: Amount,
        #[arg(long)]
        receiver: Option<String>,
        #[arg(long)]
        owner: Option<String>,
    },

    /// Redeem an exact number of shares
    Redeem {
        caller: String,
        shares: Amount,
        #[arg(long)]
        receiver: Option<String>,
        #[arg(long)]
        owner: Option<String>,
    },

    /// Let a spender withdraw an owner's shares
    Approve {
        owner: String,
        spender: String,
        shares: Amount,
    },

    /// Push externally accrued yield into custody (unrecognized until harvest)
    Yield { amount: Amount },

    /// Recognize surplus custody into the reserve
    Harvest,

    /// Price an operation without executing it
    Preview { kind: PreviewKind, amount: Amount },

    /// Show pool totals, or one account's balances
    Status { account: Option<String> },

    /// Print the archived event log
    Events,
}

#[derive(Clone, Copy, ValueEnum)]
enum PreviewKind {
    Deposit,
    Mint,
    Withdraw,
    Redeem,
}

fn account(label: &str) -> AccountId {
    AccountId::from_label(label)
}

fn or_caller(label: &Option<String>, caller: &str) -> AccountId {
    account(label.as_deref().unwrap_or(caller))
}

fn load(store: &VaultStore, db: &str) -> Result<Handle, CliError> {
    let state = store
        .load_state()?
        .ok_or_else(|| CliError::NotInitialized(db.to_string()))?;
    let policy = CappedPolicy::from_config(state.config());
    let vault = Vault::from_state(state, policy)?;
    Ok(VaultHandle::new(vault))
}

async fn persist(store: &VaultStore, handle: &Handle) -> Result<(), CliError> {
    let (state, events) = handle
        .with_vault(|vault| {
            let events = vault.drain_events();
            (vault.export_state(), events)
        })
        .await;
    store.commit(&state, &events)?;
    store.flush()?;
    Ok(())
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let store = VaultStore::open(&cli.db)?;

    if let Commands::Init {
        name,
        deposit_cap,
        max_deposit_per_call,
        max_withdraw_per_call,
        min_initial_deposit,
    } = &cli.command
    {
        if store.load_state()?.is_some() {
            return Err(CliError::AlreadyInitialized(cli.db.clone()));
        }
        let config = VaultConfig {
            name: name.clone(),
            deposit_cap: *deposit_cap,
            max_deposit_per_call: *max_deposit_per_call,
            max_withdraw_per_call: *max_withdraw_per_call,
            min_initial_deposit: *min_initial_deposit,
        };
        let vault = MemoryVault::in_memory(config)?;
        store.save_state(&vault.export_state())?;
        store.flush()?;
        println!("initialized {} at {}", name, cli.db);
        return Ok(());
    }

    let handle = load(&store, &cli.db)?;

    match &cli.command {
        Commands::Init { .. } => {}
        Commands::Fund { account: label, amount } => {
            let holder = account(label);
            handle
                .with_vault(|vault| vault.asset_ledger_mut().fund(&holder, *amount))
                .await?;
            println!("funded {} ({}) with {}", label, holder, amount);
        }
        Commands::Deposit { caller, assets, receiver } => {
            let shares = handle
                .deposit(&account(caller), *assets, &or_caller(receiver, caller))
                .await?;
            println!("deposited {} assets for {} shares", assets, shares);
        }
        Commands::Mint { caller, shares, receiver } => {
            let assets = handle
                .mint(&account(caller), *shares, &or_caller(receiver, caller))
                .await?;
            println!("minted {} shares for {} assets", shares, assets);
        }
        Commands::Withdraw { caller, assets, receiver, owner } => {
            let shares = handle
                .withdraw(
                    &account(caller),
                    *assets,
                    &or_caller(receiver, caller),
                    &or_caller(owner, caller),
                )
                .await?;
            println!("withdrew {} assets burning {} shares", assets, shares);
        }
        Commands::Redeem { caller, shares, receiver, owner } => {
            let assets = handle
                .redeem(
                    &account(caller),
                    *shares,
                    &or_caller(receiver, caller),
                    &or_caller(owner, caller),
                )
                .await?;
            println!("redeemed {} shares for {} assets", shares, assets);
        }
        Commands::Approve { owner, spender, shares } => {
            handle.approve(&account(owner), &account(spender), *shares).await;
            println!("{} may withdraw {} shares of {}", spender, shares, owner);
        }
        Commands::Yield { amount } => {
            handle
                .with_vault(|vault| vault.asset_ledger_mut().inject(*amount))
                .await?;
            println!("injected {} into custody", amount);
        }
        Commands::Harvest => {
            let amount = handle.harvest().await?;
            println!("harvested {}", amount);
        }
        Commands::Preview { kind, amount } => {
            let (label, result) = match kind {
                PreviewKind::Deposit => ("shares minted", handle.preview_deposit(*amount).await?),
                PreviewKind::Mint => ("assets charged", handle.preview_mint(*amount).await?),
                PreviewKind::Withdraw => ("shares burned", handle.preview_withdraw(*amount).await?),
                PreviewKind::Redeem => ("assets paid", handle.preview_redeem(*amount).await?),
            };
            println!("{}: {}", label, result);
        }
        Commands::Status { account: None } => {
            let (pool, surplus) = handle
                .with_vault(|vault| (vault.pool(), vault.unrecognized_surplus()))
                .await;
            println!("reserve:   {}", pool.reserve());
            println!("supply:    {}", pool.supply());
            match pool.rate_scaled(1_000_000) {
                Some(rate) => println!("rate:      {}.{:06}", rate / 1_000_000, rate % 1_000_000),
                None => println!("rate:      1.000000 (bootstrap)"),
            }
            println!("surplus:   {}", surplus);
        }
        Commands::Status { account: Some(label) } => {
            let holder = account(label);
            let (assets, shares, worth, max_withdraw) = handle
                .with_vault(|vault| {
                    let shares = vault.balance_of(&holder);
                    (
                        vault.asset_ledger().balance_of(&holder),
                        shares,
                        vault.convert_to_assets(shares),
                        vault.max_withdraw(&holder),
                    )
                })
                .await;
            println!("account:      {} ({})", label, holder);
            println!("assets:       {}", assets);
            println!("shares:       {}", shares);
            println!("worth:        {}", worth);
            println!("max withdraw: {}", max_withdraw);
        }
        Commands::Events => {
            for record in store.load_events()? {
                let line = match record.event() {
                    VaultEvent::Deposit { caller, receiver, assets, shares } => format!(
                        "deposit caller={} receiver={} assets={} shares={}",
                        caller, receiver, assets, shares
                    ),
                    VaultEvent::Withdraw { caller, receiver, owner, assets, shares } => format!(
                        "withdraw caller={} receiver={} owner={} assets={} shares={}",
                        caller, receiver, owner, assets, shares
                    ),
                    VaultEvent::Harvest { amount } => format!("harvest amount={}", amount),
                };
                println!("#{} {} {}", record.sequence(), record.occurred_at().to_rfc3339(), line);
            }
        }
    }

    persist(&store, &handle).await?;
    info!(db = %cli.db, "state saved");
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    if let Err(e) = run(cli).await {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
