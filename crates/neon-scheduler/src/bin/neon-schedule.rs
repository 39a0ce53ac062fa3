//! neon-schedule: derive Neon accounts, encode scheduled transactions, and
//! submit them (or token delegations) to a Neon EVM deployment.

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use neon_codec::hex_to_bytes;
use neon_evm::{parse_address, payer_for_solana_key, Address};
use neon_scheduler::{
    prepare, DelegateRequest, ScheduleContext, ScheduleRequest, ScheduleSubmitter,
    SchedulerConfig,
};
use neon_sol::{
    authority_pool_account, balance_account, contract_account, derive_associated_token_address,
    parse_pubkey, pubkey_to_string, tree_account, Delegation, TreasuryPool, NATIVE_MINT,
};
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use zeroize::Zeroizing;

#[derive(Parser, Debug)]
#[command(author, version, about = "Neon EVM scheduled transaction tool", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print every account derived for a wallet
    Derive {
        /// Base58 Neon EVM program id
        #[arg(long)]
        program_id: String,

        /// 0x-prefixed EVM wallet address
        #[arg(long)]
        wallet: String,

        #[arg(long)]
        chain_id: u64,

        #[arg(long, default_value_t = 0)]
        nonce: u64,

        #[arg(long, default_value_t = 0)]
        treasury_pool: u32,
    },

    /// Encode a scheduled transaction body and instruction data offline
    Encode {
        #[arg(long)]
        program_id: String,

        /// Base58 Solana public key of the signer
        #[arg(long)]
        signer: String,

        /// Contract to call
        #[arg(long)]
        target: String,

        /// Hex call data
        #[arg(long, default_value = "0x")]
        call_data: String,

        #[arg(long)]
        chain_id: u64,

        #[arg(long, default_value_t = 0)]
        nonce: u64,

        #[arg(long, default_value_t = 0)]
        treasury_pool: u32,

        /// TOML configuration supplying gas settings
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Build, sign, and submit a scheduled transaction
    Schedule {
        #[command(flatten)]
        connection: Connection,

        #[arg(long)]
        target: String,

        #[arg(long, default_value = "0x")]
        call_data: String,

        /// Airdrop this many lamports to the treasury pool first
        #[arg(long)]
        airdrop_lamports: Option<u64>,
    },

    /// Approve a token contract's delegate to spend from a token account
    Approve {
        #[command(flatten)]
        connection: Connection,

        /// 0x-prefixed address of the token contract
        #[arg(long)]
        token_contract: String,

        /// Base58 token account owned by the signer
        #[arg(long)]
        token_account: String,

        /// EVM delegate; when omitted the contract itself is approved for scheduling
        #[arg(long)]
        delegate: Option<String>,

        /// Zero revokes the current allowance
        #[arg(long)]
        amount: u64,
    },
}

/// Endpoints and signer shared by the submitting subcommands.
#[derive(clap::Args, Debug)]
struct Connection {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long, env = "NEON_EVM_RPC_URL")]
    evm_rpc_url: Option<String>,

    #[arg(long, env = "NEON_LEDGER_RPC_URL")]
    ledger_rpc_url: Option<String>,

    /// Hex ed25519 secret seed (32 bytes)
    #[arg(long, env = "NEON_SCHEDULE_SECRET_KEY", hide_env_values = true)]
    secret_key: String,

    #[arg(long)]
    skip_preflight: bool,
}

impl Connection {
    /// Flags and environment take precedence over the configuration file.
    fn apply(&self, mut config: SchedulerConfig) -> SchedulerConfig {
        if let Some(url) = &self.evm_rpc_url {
            config.evm_rpc_url = url.clone();
        }
        if let Some(url) = &self.ledger_rpc_url {
            config.ledger_rpc_url = url.clone();
        }
        config.skip_preflight |= self.skip_preflight;
        config
    }

    fn config(&self) -> Result<SchedulerConfig> {
        Ok(self.apply(load_config(self.config.as_ref())?))
    }

    fn seed(&self) -> Result<Zeroizing<[u8; 32]>> {
        secret_seed(&self.secret_key)
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "neon_scheduler=debug,info"
    } else {
        "neon_scheduler=info,warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<SchedulerConfig> {
    match path {
        Some(path) => SchedulerConfig::load(path).context("loading configuration"),
        None => Ok(SchedulerConfig::default()),
    }
}

fn parse_program_id(text: &str) -> Result<[u8; 32]> {
    parse_pubkey(text).with_context(|| format!("invalid program id {text}"))
}

fn evm_address(text: &str) -> Result<Address> {
    parse_address(text).with_context(|| format!("invalid EVM address {text}"))
}

fn secret_seed(text: &str) -> Result<Zeroizing<[u8; 32]>> {
    let bytes = Zeroizing::new(hex_to_bytes(text).map_err(|_| anyhow!("secret key is not hex"))?);
    if bytes.len() != 32 {
        bail!("secret key must be 32 bytes, got {}", bytes.len());
    }
    let mut seed = Zeroizing::new([0u8; 32]);
    seed.copy_from_slice(&bytes);
    Ok(seed)
}

fn derive(
    program_id: &[u8; 32],
    wallet: &Address,
    chain_id: u64,
    nonce: u64,
    treasury_index: u32,
) -> Result<serde_json::Value> {
    let authority = authority_pool_account(program_id)?;
    let pool = TreasuryPool::derive(program_id, treasury_index)?;
    Ok(json!({
        "contract": pubkey_to_string(&contract_account(program_id, wallet)?.address),
        "balance": pubkey_to_string(&balance_account(program_id, wallet, chain_id)?.address),
        "tree": pubkey_to_string(&tree_account(program_id, wallet, chain_id, nonce)?.address),
        "authorityPool": pubkey_to_string(&authority.address),
        "authorityPoolWsolAta": pubkey_to_string(
            &derive_associated_token_address(&authority.address, &NATIVE_MINT)?
        ),
        "treasuryPool": { "index": pool.index, "address": pubkey_to_string(&pool.address) },
    }))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let output = match args.command {
        Commands::Derive {
            program_id: program,
            wallet,
            chain_id,
            nonce,
            treasury_pool,
        } => derive(
            &parse_program_id(&program)?,
            &evm_address(&wallet)?,
            chain_id,
            nonce,
            treasury_pool,
        )?,

        Commands::Encode {
            program_id: program,
            signer,
            target,
            call_data,
            chain_id,
            nonce,
            treasury_pool,
            config,
        } => {
            let config = load_config(config.as_ref())?;
            let program_id = parse_program_id(&program)?;
            let signer = parse_pubkey(&signer).context("invalid signer")?;
            let ctx = ScheduleContext {
                program_id,
                signer,
                nonce,
                chain_id,
                treasury_pool: TreasuryPool::derive(&program_id, treasury_pool)?,
                gas: config.gas,
            };
            let request = ScheduleRequest {
                target: evm_address(&target)?,
                call_data: hex_to_bytes(&call_data).context("invalid call data")?,
            };
            let prepared = prepare(&ctx, &request)?;
            let accounts: Vec<serde_json::Value> = prepared
                .instruction
                .accounts
                .iter()
                .map(|meta| {
                    json!({
                        "pubkey": pubkey_to_string(&meta.pubkey),
                        "isSigner": meta.is_signer,
                        "isWritable": meta.is_writable,
                    })
                })
                .collect();
            json!({
                "payer": payer_for_solana_key(&signer).to_string(),
                "body": format!("0x{}", hex::encode(&prepared.body)),
                "instructionData": format!("0x{}", hex::encode(&prepared.instruction.data)),
                "accounts": accounts,
            })
        }

        Commands::Schedule {
            connection,
            target,
            call_data,
            airdrop_lamports,
        } => {
            let mut config = connection.config()?;
            if airdrop_lamports.is_some() {
                config.treasury_airdrop_lamports = airdrop_lamports;
            }

            let seed = connection.seed()?;
            let request = ScheduleRequest {
                target: evm_address(&target)?,
                call_data: hex_to_bytes(&call_data).context("invalid call data")?,
            };

            let submitter = ScheduleSubmitter::from_config(&config)?;
            let receipt = submitter.schedule(&seed, &request).await?;
            json!({
                "signature": receipt.signature,
                "payer": receipt.payer.to_string(),
                "nonce": receipt.nonce,
                "chainId": receipt.chain_id,
                "treasuryPool": receipt.treasury_pool_index,
                "tree": pubkey_to_string(&receipt.tree_account),
            })
        }

        Commands::Approve {
            connection,
            token_contract,
            token_account,
            delegate,
            amount,
        } => {
            let config = connection.config()?;
            let seed = connection.seed()?;
            let delegation = match delegate {
                Some(address) => Delegation::Evm(evm_address(&address)?),
                None => Delegation::Scheduling,
            };
            let request = DelegateRequest {
                token_contract: evm_address(&token_contract)?,
                source_token_account: parse_pubkey(&token_account)
                    .context("invalid token account")?,
                delegation,
                amount,
            };

            let submitter = ScheduleSubmitter::from_config(&config)?;
            let receipt = submitter.delegate(&seed, &request).await?;
            json!({
                "signature": receipt.signature,
                "delegate": pubkey_to_string(&receipt.delegate),
                "amount": amount,
            })
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
