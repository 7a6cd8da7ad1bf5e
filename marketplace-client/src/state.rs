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

//! Accounts owned by the marketplace program and the SPL Token accounts the
//! client inspects.
//!
//! Marketplace accounts are Anchor accounts: an 8-byte discriminator,
//! `sha256("account:<Type>")[..8]`, followed by Borsh-serialised fields.
//! Accounts may be larger than their serialised contents; trailing bytes are
//! ignored.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program_pack::Pack;
use solana_sdk::pubkey::Pubkey;
use spl_token::state::Account as TokenAccount;

use crate::instruction::{discriminator, DISCRIMINATOR_LEN};
use crate::{Error, Result};

/// Marketplace-wide configuration and statistics.
#[derive(
    BorshSerialize, BorshDeserialize, Clone, Debug, Default, PartialEq, Eq,
)]
pub struct GlobalState {
    pub initializer: Pubkey,
    pub total_listed_count_sol: u32,
    pub total_listed_count_spl: u32,
    pub total_volume_all_time_sol: u128,
    pub all_time_sale_count_spl: u64,
    pub all_time_sale_count_sol: u64,
    pub marketplace_fee_percentage: u64,
}

/// An NFT offered for sale.
#[derive(
    BorshSerialize, BorshDeserialize, Clone, Debug, Default, PartialEq, Eq,
)]
pub struct Listing {
    /// Global state of the marketplace instance the listing belongs to.
    pub global_state_address: Pubkey,
    /// The seller.
    pub initializer: Pubkey,
    pub nft_mint_address: Pubkey,
    /// Program account holding the NFT while it’s listed.
    pub nft_holder_address: Pubkey,
    pub price: u64,
    pub creation_time: i64,
    pub updated_at: i64,
    /// Whether the price is in an SPL token rather than lamports.
    pub is_spl_listing: bool,
    pub trade_spl_token_mint_address: Pubkey,
    pub trade_spl_token_seller_account_address: Pubkey,
}

/// Account types with an Anchor discriminator.
pub trait AnchorAccount: BorshDeserialize {
    /// Name of the type in the program.
    const NAME: &'static str;

    /// Returns the account discriminator.
    fn discriminator() -> [u8; DISCRIMINATOR_LEN] {
        discriminator("account", Self::NAME)
    }

    /// Decodes account data checking the discriminator.
    fn decode(data: &[u8]) -> Result<Self> {
        if data.len() < DISCRIMINATOR_LEN {
            return Err(Error::InvalidAccountData("missing discriminator"));
        }
        let (head, mut body) = data.split_at(DISCRIMINATOR_LEN);
        let expected = Self::discriminator();
        if head != expected {
            let mut found = [0; DISCRIMINATOR_LEN];
            found.copy_from_slice(head);
            return Err(Error::InvalidDiscriminator { expected, found });
        }
        Ok(Self::deserialize(&mut body)?)
    }
}

impl AnchorAccount for GlobalState {
    const NAME: &'static str = "GlobalState";
}

impl AnchorAccount for Listing {
    const NAME: &'static str = "Listing";
}

impl Listing {
    /// Offset of [`Listing::initializer`] in account data.  Used to filter
    /// listings by seller.
    pub const INITIALIZER_OFFSET: usize = DISCRIMINATOR_LEN + 32;
}

/// Offset of the owner in SPL token account data.  Used to filter token
/// accounts by wallet.
pub const TOKEN_OWNER_OFFSET: usize = 32;

/// A non-fungible token held by a wallet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserNft {
    /// Token account holding the NFT.
    pub token_account: Pubkey,
    /// Mint of the NFT.
    pub mint: Pubkey,
}

impl UserNft {
    /// Interprets SPL token account data as an NFT holding.
    ///
    /// Returns `None` if the account’s balance is other than one.  Fails if
    /// the data is not an initialised token account.
    pub fn from_token_account(
        token_account: Pubkey,
        data: &[u8],
    ) -> Result<Option<Self>> {
        let account = TokenAccount::unpack(data)?;
        Ok((account.amount == 1)
            .then_some(Self { token_account, mint: account.mint }))
    }
}
