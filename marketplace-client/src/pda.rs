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

//! Program-derived addresses of the marketplace program’s accounts.
//!
//! All functions return the address together with its bump seed.  None of
//! them check whether the account actually exists.

use solana_sdk::pubkey::Pubkey;

/// Seed of the singleton marketplace [`crate::GlobalState`] account.
pub const GLOBAL_STATE_SEED: &[u8] = b"global_state";

/// Prefix seed of [`crate::Listing`] accounts.  The full seed is
/// `[LISTING_SEED, seller, nft_mint]`.
pub const LISTING_SEED: &[u8] = b"listing";

/// Seed of the program’s escrow authority which takes part in native
/// currency purchases.
pub const ESCROW_SEED: &[u8] = b"nft_marketplace";

/// Returns address of the marketplace global state account.
pub fn global_state_address(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[GLOBAL_STATE_SEED], program_id)
}

/// Returns address of the listing of `nft_mint` created by `seller`.
///
/// A seller can have at most one listing per mint at a time.
pub fn listing_address(
    program_id: &Pubkey,
    seller: &Pubkey,
    nft_mint: &Pubkey,
) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[LISTING_SEED, seller.as_ref(), nft_mint.as_ref()],
        program_id,
    )
}

/// Returns address of the program’s escrow authority.
pub fn escrow_address(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[ESCROW_SEED], program_id)
}
