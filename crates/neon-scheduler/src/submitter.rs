//! Scheduled-transaction submission.
//!
//! [`prepare`] turns resolved inputs into a body and instruction without any
//! I/O. [`ScheduleSubmitter`] resolves those inputs over RPC, signs, and
//! submits. It also submits the SPL `Approve` that lets a token contract
//! spend on the owner's behalf. Each call is a single attempt; failures are
//! reported, never retried.

use ed25519_dalek::SigningKey;
use neon_evm::{payer_for_solana_key, Address, GasSettings, ScheduledTransaction};
use neon_sol::{
    authority_pool_account, balance_account, build_schedule_instruction, build_spl_approve,
    compile_transaction, delegate_authority, derive_associated_token_address, parse_pubkey,
    pubkey_to_string, select_treasury_pool, sign_transaction, tree_account, verify_account_order,
    Delegation, ScheduleAccounts, SolInstruction, TreasuryPool, NATIVE_MINT,
};
use zeroize::Zeroize;

use crate::config::SchedulerConfig;
use crate::error::SchedulerError;
use crate::rpc::{EvmParams, EvmRpc, JsonRpcClient, LedgerRpc, RpcError};

/// What the caller wants executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleRequest {
    pub target: Address,
    pub call_data: Vec<u8>,
}

/// Inputs resolved from the network (or supplied directly).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleContext {
    pub program_id: [u8; 32],
    /// Solana public key of the signer and fee payer.
    pub signer: [u8; 32],
    pub nonce: u64,
    pub chain_id: u64,
    pub treasury_pool: TreasuryPool,
    pub gas: GasSettings,
}

/// A fully assembled, unsigned schedule instruction.
#[derive(Debug, Clone)]
pub struct PreparedSchedule {
    pub payer: Address,
    pub transaction: ScheduledTransaction,
    pub body: Vec<u8>,
    pub accounts: ScheduleAccounts,
    pub instruction: SolInstruction,
}

/// Outcome of a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleReceipt {
    /// Base58 transaction signature returned by the ledger.
    pub signature: String,
    pub payer: Address,
    pub nonce: u64,
    pub chain_id: u64,
    pub treasury_pool_index: u32,
    pub tree_account: [u8; 32],
}

/// An SPL token delegation to a Neon token contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelegateRequest {
    /// EVM address of the token contract.
    pub token_contract: Address,
    /// Token account the signer owns and delegates from.
    pub source_token_account: [u8; 32],
    pub delegation: Delegation,
    /// Zero revokes the current allowance.
    pub amount: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelegateReceipt {
    pub signature: String,
    /// The account approved as delegate.
    pub delegate: [u8; 32],
}

/// Derive every account, encode the body, and assemble the instruction.
pub fn prepare(
    ctx: &ScheduleContext,
    request: &ScheduleRequest,
) -> Result<PreparedSchedule, SchedulerError> {
    let payer = payer_for_solana_key(&ctx.signer);

    let balance = balance_account(&ctx.program_id, &payer, ctx.chain_id)?;
    let tree = tree_account(&ctx.program_id, &payer, ctx.chain_id, ctx.nonce)?;
    let authority = authority_pool_account(&ctx.program_id)?;
    let associated_token = derive_associated_token_address(&authority.address, &NATIVE_MINT)?;

    let transaction = ScheduledTransaction {
        payer,
        sender: None,
        nonce: ctx.nonce,
        target: request.target,
        call_data: request.call_data.clone(),
        chain_id: ctx.chain_id,
        gas: ctx.gas,
    };
    let body = transaction.encode()?;

    let accounts = ScheduleAccounts {
        signer: ctx.signer,
        balance: balance.address,
        treasury_pool: ctx.treasury_pool,
        tree: tree.address,
        associated_token,
    };
    let instruction = build_schedule_instruction(&ctx.program_id, &accounts, &body);
    verify_account_order(&instruction, &accounts)?;

    Ok(PreparedSchedule {
        payer,
        transaction,
        body,
        accounts,
        instruction,
    })
}

fn upstream(err: RpcError) -> SchedulerError {
    SchedulerError::UpstreamUnavailable(err.to_string())
}

fn program_id_of(params: &EvmParams) -> Result<[u8; 32], SchedulerError> {
    parse_pubkey(&params.neon_evm_program_id)
        .map_err(|e| SchedulerError::UpstreamUnavailable(format!("neon_getEvmParams: {e}")))
}

/// Drives one scheduled transaction from resolution to submission.
pub struct ScheduleSubmitter<E, L> {
    evm: E,
    ledger: L,
    gas: GasSettings,
    skip_preflight: bool,
    treasury_airdrop_lamports: Option<u64>,
}

impl ScheduleSubmitter<JsonRpcClient, JsonRpcClient> {
    /// HTTP collaborators built from `config`.
    pub fn from_config(config: &SchedulerConfig) -> Result<Self, SchedulerError> {
        config.validate()?;
        let timeout = config.request_timeout();
        let evm = JsonRpcClient::new(config.evm_rpc_url.clone(), timeout)
            .map_err(|e| SchedulerError::Config(e.to_string()))?;
        let ledger = JsonRpcClient::new(config.ledger_rpc_url.clone(), timeout)
            .map_err(|e| SchedulerError::Config(e.to_string()))?;

        Ok(Self::new(evm, ledger, config.gas)
            .with_skip_preflight(config.skip_preflight)
            .with_treasury_airdrop(config.treasury_airdrop_lamports))
    }
}

impl<E: EvmRpc, L: LedgerRpc> ScheduleSubmitter<E, L> {
    pub fn new(evm: E, ledger: L, gas: GasSettings) -> Self {
        Self {
            evm,
            ledger,
            gas,
            skip_preflight: false,
            treasury_airdrop_lamports: None,
        }
    }

    pub fn with_skip_preflight(mut self, skip: bool) -> Self {
        self.skip_preflight = skip;
        self
    }

    /// Fund the selected treasury pool before each submission. Dev networks only.
    pub fn with_treasury_airdrop(mut self, lamports: Option<u64>) -> Self {
        self.treasury_airdrop_lamports = lamports;
        self
    }

    /// Schedule `request`, signing with the 32-byte ed25519 seed.
    pub async fn schedule(
        &self,
        secret_seed: &[u8; 32],
        request: &ScheduleRequest,
    ) -> Result<ScheduleReceipt, SchedulerError> {
        let mut seed = *secret_seed;
        let signer = SigningKey::from_bytes(&seed).verifying_key().to_bytes();
        let result = self.schedule_as(&signer, &seed, request).await;
        seed.zeroize();
        result
    }

    /// Approve the delegate chosen by `request.delegation` to spend up to
    /// `request.amount` from the signer's token account.
    pub async fn delegate(
        &self,
        secret_seed: &[u8; 32],
        request: &DelegateRequest,
    ) -> Result<DelegateReceipt, SchedulerError> {
        let mut seed = *secret_seed;
        let owner = SigningKey::from_bytes(&seed).verifying_key().to_bytes();
        let result = self.delegate_as(&owner, &seed, request).await;
        seed.zeroize();
        result
    }

    async fn delegate_as(
        &self,
        owner: &[u8; 32],
        seed: &[u8; 32],
        request: &DelegateRequest,
    ) -> Result<DelegateReceipt, SchedulerError> {
        let params = self.evm.evm_params().await.map_err(upstream)?;
        let program_id = program_id_of(&params)?;

        let delegate = delegate_authority(&program_id, &request.token_contract, request.delegation)?;
        let approve = build_spl_approve(
            &request.source_token_account,
            &delegate,
            owner,
            request.amount,
        );
        tracing::debug!(
            token_contract = %request.token_contract,
            delegate = %pubkey_to_string(&delegate),
            amount = request.amount,
            "assembled approve instruction"
        );

        let signature = self.submit(approve, owner, seed).await?;
        tracing::info!(%signature, amount = request.amount, "token delegation submitted");

        Ok(DelegateReceipt {
            signature,
            delegate,
        })
    }

    async fn schedule_as(
        &self,
        signer: &[u8; 32],
        seed: &[u8; 32],
        request: &ScheduleRequest,
    ) -> Result<ScheduleReceipt, SchedulerError> {
        let params = self.evm.evm_params().await.map_err(upstream)?;
        let program_id = program_id_of(&params)?;

        let payer = payer_for_solana_key(signer);
        let nonce = self.evm.transaction_count(&payer).await.map_err(upstream)?;
        let chain_id = self.evm.chain_id().await.map_err(upstream)?;
        tracing::debug!(
            program_id = %params.neon_evm_program_id,
            pool_count = params.neon_treasury_pool_count,
            %payer,
            nonce,
            chain_id,
            "resolved schedule inputs"
        );

        let treasury_pool = select_treasury_pool(&program_id, params.neon_treasury_pool_count)?;

        let ctx = ScheduleContext {
            program_id,
            signer: *signer,
            nonce,
            chain_id,
            treasury_pool,
            gas: self.gas,
        };
        let prepared = prepare(&ctx, request)?;
        tracing::debug!(
            treasury_pool = treasury_pool.index,
            tree = %pubkey_to_string(&prepared.accounts.tree),
            body_len = prepared.body.len(),
            "assembled schedule instruction"
        );

        if let Some(lamports) = self.treasury_airdrop_lamports {
            let airdrop = self
                .ledger
                .request_airdrop(&treasury_pool.address, lamports)
                .await
                .map_err(upstream)?;
            tracing::debug!(%airdrop, lamports, "funded treasury pool");
        }

        let signature = self.submit(prepared.instruction, signer, seed).await?;
        tracing::info!(%signature, nonce, chain_id, "scheduled transaction submitted");

        Ok(ScheduleReceipt {
            signature,
            payer,
            nonce,
            chain_id,
            treasury_pool_index: treasury_pool.index,
            tree_account: prepared.accounts.tree,
        })
    }

    /// Sign `instruction` against a fresh blockhash and send it once.
    async fn submit(
        &self,
        instruction: SolInstruction,
        signer: &[u8; 32],
        seed: &[u8; 32],
    ) -> Result<String, SchedulerError> {
        let blockhash = self.ledger.latest_blockhash().await.map_err(upstream)?;
        let message = compile_transaction(&[instruction], signer, &blockhash)?;
        let signed = sign_transaction(&message, seed)?;

        self.ledger
            .send_transaction(&signed.wire, self.skip_preflight)
            .await
            .map_err(|e| match e {
                RpcError::Response { message, .. } => {
                    tracing::warn!(%message, "ledger rejected transaction");
                    SchedulerError::SubmissionRejected(message)
                }
                other => upstream(other),
            })
    }
}
