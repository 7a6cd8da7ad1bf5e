// nft-marketplace-client - client library for the NFT marketplace Solana
//                          program
// © 2025 by the nft-marketplace-client authors
//
// This program is free software; you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation; either version 2 of the License, or (at your option) any later
// version.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE.  See the GNU General Public License for more
// details.
//
// You should have received a copy of the GNU General Public License along with
// this program; if not, see <https://www.gnu.org/licenses/>.

use solana_account_decoder_client_types::UiAccountEncoding;
use solana_client::rpc_client::RpcClient;
use solana_client::rpc_config::{
    RpcAccountInfoConfig, RpcProgramAccountsConfig, RpcTransactionConfig,
};
use solana_client::rpc_filter::{Memcmp, RpcFilterType};
use solana_program_pack::Pack;
use solana_sdk::account::Account;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::instruction::Instruction;
use solana_sdk::message::Message;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Signature, Signer};
use solana_sdk::signer::keypair::Keypair;
use solana_sdk::transaction::Transaction;
use solana_transaction_status::option_serializer::OptionSerializer;
use solana_transaction_status::UiTransactionEncoding;
use spl_token::state::Account as TokenAccount;

use crate::instruction::{
    self, BuyNftWithSplAccounts, ListNftInSplAccounts, Royalties,
};
use crate::state::{AnchorAccount, TOKEN_OWNER_OFFSET};
use crate::{pda, Config, Error, GlobalState, Listing, Result, UserNft};


/// Blocking client of the marketplace program.
///
/// Every mutating method builds a single instruction, signs it with the
/// payer keypair and waits for confirmation.  Errors from the RPC node are
/// returned as they are; nothing is retried.
pub struct MarketplaceClient {
    rpc: RpcClient,
    payer: Keypair,
    program_id: Pubkey,
    global_state: Pubkey,
}

impl MarketplaceClient {
    /// Creates a client reading the payer keypair from
    /// [`Config::keypair_path`].
    pub fn new(config: Config) -> Result<Self> {
        let payer = config.read_keypair()?;
        Ok(Self::with_keypair(config, payer))
    }

    /// Creates a client signing transactions with given keypair.
    pub fn with_keypair(config: Config, payer: Keypair) -> Self {
        let (global_state, _) = pda::global_state_address(&config.program_id);
        log::debug!(
            "Marketplace {} at {}; global state {global_state}",
            config.program_id,
            config.rpc_url,
        );
        let rpc =
            RpcClient::new_with_commitment(config.rpc_url, config.commitment);
        Self { rpc, payer, program_id: config.program_id, global_state }
    }

    /// Returns the underlying RPC client.
    pub fn rpc(&self) -> &RpcClient {
        &self.rpc
    }

    /// Address of the marketplace program.
    pub fn program_id(&self) -> &Pubkey {
        &self.program_id
    }

    /// Address of the marketplace global state account.
    pub fn global_state(&self) -> &Pubkey {
        &self.global_state
    }

    /// Public key of the keypair signing transactions.
    pub fn payer(&self) -> Pubkey {
        self.payer.pubkey()
    }

    /// Returns address of the listing of `nft_mint` by `seller`.
    pub fn listing_address(
        &self,
        seller: &Pubkey,
        nft_mint: &Pubkey,
    ) -> Pubkey {
        pda::listing_address(&self.program_id, seller, nft_mint).0
    }

    /// Creates the marketplace global state with given fee rate.
    pub fn initialize_marketplace(
        &self,
        marketplace_fee: u64,
    ) -> Result<Signature> {
        let ix = instruction::initialize_marketplace(
            self.program_id,
            self.payer(),
            marketplace_fee,
        )?;
        self.send_and_confirm_instruction(ix)
    }

    /// Lists `nft_mint` owned by the payer for `price` lamports.
    pub fn list_nft(&self, nft_mint: Pubkey, price: u64) -> Result<Signature> {
        let (ix, listing) = instruction::list_nft(
            self.program_id,
            self.payer(),
            nft_mint,
            price,
        )?;
        log::debug!("Listing {nft_mint} at {listing}");
        self.send_and_confirm_instruction(ix)
    }

    /// Lists `nft_mint` owned by the payer for `price` units of `trade_mint`
    /// paid into `seller_token_account`.
    pub fn list_nft_in_spl(
        &self,
        nft_mint: Pubkey,
        price: u64,
        trade_mint: Pubkey,
        seller_token_account: Pubkey,
    ) -> Result<Signature> {
        let accounts = ListNftInSplAccounts {
            user: self.payer(),
            nft_mint,
            trade_mint,
            seller_token_account,
        };
        let (ix, listing) =
            instruction::list_nft_in_spl(self.program_id, &accounts, price)?;
        log::debug!("Listing {nft_mint} for {trade_mint} at {listing}");
        self.send_and_confirm_instruction(ix)
    }

    /// Changes price of the payer’s `listing` to `new_price`.
    pub fn update_price(
        &self,
        listing: Pubkey,
        new_price: u64,
    ) -> Result<Signature> {
        let ix = instruction::update_price(
            self.program_id,
            self.payer(),
            listing,
            new_price,
        )?;
        self.send_and_confirm_instruction(ix)
    }

    /// Closes the payer’s `listing`.
    pub fn cancel_listing(&self, listing: Pubkey) -> Result<Signature> {
        let ix =
            instruction::cancel_listing(self.program_id, self.payer(), listing);
        self.send_and_confirm_instruction(ix)
    }

    /// Buys listed NFT paying `amount` lamports.
    ///
    /// `royalties` lists the NFT’s metadata account and creators who receive
    /// their share of the payment.
    pub fn buy_nft(
        &self,
        listing: Pubkey,
        amount: u64,
        royalties: &Royalties,
    ) -> Result<Signature> {
        let ix = instruction::buy_nft(
            self.program_id,
            self.payer(),
            listing,
            amount,
            royalties,
        )?;
        self.send_and_confirm_instruction(ix)
    }

    /// Buys listed NFT paying `amount` tokens from `buyer_token_account` to
    /// `seller_token_account`.  `royalties` is as in
    /// [`MarketplaceClient::buy_nft`].
    pub fn buy_nft_with_spl(
        &self,
        listing: Pubkey,
        amount: u64,
        buyer_token_account: Pubkey,
        seller_token_account: Pubkey,
        royalties: &Royalties,
    ) -> Result<Signature> {
        let accounts = BuyNftWithSplAccounts {
            listing,
            buyer: self.payer(),
            buyer_token_account,
            seller_token_account,
            token_program: instruction::token_program_id(),
        };
        let ix = instruction::buy_nft_with_spl(
            self.program_id,
            &accounts,
            amount,
            royalties,
        )?;
        self.send_and_confirm_instruction(ix)
    }

    /// Fetches the marketplace global state.
    pub fn get_marketplace_metadata(&self) -> Result<GlobalState> {
        GlobalState::decode(&self.get_account(&self.global_state)?.data)
    }

    /// Fetches a single listing.
    pub fn get_listing(&self, listing: &Pubkey) -> Result<Listing> {
        Listing::decode(&self.get_account(listing)?.data)
    }

    fn get_account(&self, address: &Pubkey) -> Result<Account> {
        self.rpc
            .get_account_with_commitment(address, self.rpc.commitment())?
            .value
            .ok_or(Error::AccountNotFound(*address))
    }

    /// Fetches all listings created by `user`.
    pub fn get_user_listings(
        &self,
        user: &Pubkey,
    ) -> Result<Vec<(Pubkey, Listing)>> {
        self.get_listings(Some(user))
    }

    /// Fetches all listings of the marketplace program.
    pub fn get_all_listings(&self) -> Result<Vec<(Pubkey, Listing)>> {
        self.get_listings(None)
    }

    fn get_listings(
        &self,
        seller: Option<&Pubkey>,
    ) -> Result<Vec<(Pubkey, Listing)>> {
        let filters = listing_filters(seller);
        self.get_program_accounts(&self.program_id, filters)?
            .into_iter()
            .map(|(address, account)| {
                Listing::decode(&account.data).map(|listing| (address, listing))
            })
            .collect()
    }

    /// Fetches NFTs held by `owner`, i.e. token accounts owned by it with
    /// balance of exactly one.
    pub fn get_user_nfts(&self, owner: &Pubkey) -> Result<Vec<UserNft>> {
        let token_program = instruction::token_program_id();
        let accounts =
            self.get_program_accounts(&token_program, token_filters(owner))?;
        select_nfts(accounts)
    }

    fn get_program_accounts(
        &self,
        program_id: &Pubkey,
        filters: Vec<RpcFilterType>,
    ) -> Result<Vec<(Pubkey, Account)>> {
        let config = RpcProgramAccountsConfig {
            filters: Some(filters),
            account_config: RpcAccountInfoConfig {
                encoding: Some(UiAccountEncoding::Base64),
                commitment: Some(self.rpc.commitment()),
                ..Default::default()
            },
            ..Default::default()
        };
        let accounts =
            self.rpc.get_program_accounts_with_config(program_id, config)?;
        log::debug!("{} accounts of {program_id} matched", accounts.len());
        Ok(accounts)
    }

    /// Fetches log messages of a confirmed transaction.
    pub fn transaction_logs(&self, sig: &Signature) -> Result<Vec<String>> {
        let config = transaction_config(self.rpc.commitment());
        let resp = self.rpc.get_transaction_with_config(sig, config)?;
        let log_messages = resp
            .transaction
            .meta
            .map(|meta| meta.log_messages)
            .ok_or(Error::Msg("No transaction metadata"))?;
        match log_messages {
            OptionSerializer::Some(messages) => Ok(messages),
            _ => Err(Error::Msg("No log messages")),
        }
    }

    /// Sends a transaction with a single instruction signed by the payer.
    fn send_and_confirm_instruction(
        &self,
        instruction: Instruction,
    ) -> Result<Signature> {
        let blockhash = self.rpc.get_latest_blockhash()?;
        log::debug!("Latest blockhash: {blockhash}");

        let message = Message::new_with_blockhash(
            core::slice::from_ref(&instruction),
            Some(&self.payer.pubkey()),
            &blockhash,
        );
        let mut tx = Transaction::new_unsigned(message);
        tx.sign(&[&self.payer], blockhash);

        let sig = self.rpc.send_and_confirm_transaction(&tx)?;
        log::info!(
            "Transaction to {} confirmed: {sig}",
            instruction.program_id
        );
        Ok(sig)
    }
}

/// Returns `getProgramAccounts` filters matching listings, optionally only
/// those created by `seller`.
fn listing_filters(seller: Option<&Pubkey>) -> Vec<RpcFilterType> {
    let mut filters = vec![RpcFilterType::Memcmp(Memcmp::new_base58_encoded(
        0,
        &Listing::discriminator(),
    ))];
    if let Some(seller) = seller {
        filters.push(RpcFilterType::Memcmp(Memcmp::new_base58_encoded(
            Listing::INITIALIZER_OFFSET,
            seller.as_ref(),
        )));
    }
    filters
}

/// Returns `getProgramAccounts` filters matching SPL token accounts owned by
/// `owner`.
fn token_filters(owner: &Pubkey) -> Vec<RpcFilterType> {
    vec![
        RpcFilterType::DataSize(TokenAccount::LEN as u64),
        RpcFilterType::Memcmp(Memcmp::new_base58_encoded(
            TOKEN_OWNER_OFFSET,
            owner.as_ref(),
        )),
    ]
}

/// Picks token accounts holding exactly one token.
fn select_nfts(accounts: Vec<(Pubkey, Account)>) -> Result<Vec<UserNft>> {
    let mut nfts = Vec::new();
    for (address, account) in accounts {
        let nft = UserNft::from_token_account(address, &account.data)?;
        nfts.extend(nft);
    }
    Ok(nfts)
}

/// Returns configuration of `getTransaction` requests.
///
/// Nodes serve transactions at `confirmed` or `finalized` commitment only so
/// lower levels are raised to `confirmed`.  Without explicit commitment the
/// node assumes `finalized` which a just confirmed transaction may not have
/// reached yet.
fn transaction_config(commitment: CommitmentConfig) -> RpcTransactionConfig {
    let commitment = if commitment.is_finalized() {
        commitment
    } else {
        CommitmentConfig::confirmed()
    };
    RpcTransactionConfig {
        encoding: Some(UiTransactionEncoding::Base64),
        commitment: Some(commitment),
        max_supported_transaction_version: Some(0),
    }
}
