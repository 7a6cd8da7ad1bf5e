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

//! Builders of the marketplace program’s instructions.
//!
//! The program is an Anchor program.  Instruction data starts with an 8-byte
//! discriminator, `sha256("global:<method>")[..8]`, followed by
//! Borsh-serialised arguments.  Account order follows the program’s
//! interface description.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;
use solana_system_interface::program as system_program;

use crate::{pda, Result};

/// Length of Anchor instruction and account discriminators.
pub const DISCRIMINATOR_LEN: usize = 8;

/// Returns discriminator of the `name` instruction.
///
/// `name` is the method name in snake case, e.g. `list_nft`.
pub fn sighash(name: &str) -> [u8; DISCRIMINATOR_LEN] {
    discriminator("global", name)
}

/// Computes Anchor discriminator, first 8 bytes of `sha256("<ns>:<name>")`.
pub(crate) fn discriminator(
    namespace: &str,
    name: &str,
) -> [u8; DISCRIMINATOR_LEN] {
    let hash = solana_sdk::hash::hashv(&[
        namespace.as_bytes(),
        b":",
        name.as_bytes(),
    ]);
    let mut out = [0; DISCRIMINATOR_LEN];
    out.copy_from_slice(&hash.to_bytes()[..DISCRIMINATOR_LEN]);
    out
}

/// Address of the SPL Token program.
pub fn token_program_id() -> Pubkey {
    spl_token::ID
}

/// Arguments of the `initialize_marketplace` method.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct InitializeMarketplaceArgs {
    /// Fee rate charged by the marketplace on every sale.
    pub marketplace_fee: u64,
}

/// Arguments of the `list_nft` and `list_nft_in_spl` methods.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct ListNftArgs {
    /// Asking price in lamports or in units of the trade token.
    pub price: u64,
}

/// Arguments of the `update_price` method.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct UpdatePriceArgs {
    /// Replacement asking price.
    pub new_price: u64,
}

/// Arguments of the `buy_nft` and `buy_nft_with_spl` methods.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct BuyNftArgs {
    /// Amount the buyer offers; the program compares it with the price.
    pub amount: u64,
}

/// Accounts the program needs to pay creator royalties on a sale.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Royalties {
    /// Metaplex metadata account of the NFT listing its creators.
    pub nft_metadata_account: Pubkey,
    /// Creators in the order they appear in the metadata.  Passed as
    /// remaining accounts since they receive their share of the payment.
    pub creators: Vec<Pubkey>,
}

impl Royalties {
    /// Appends the metadata account and the creators to `accounts`.
    fn append_to(&self, accounts: &mut Vec<AccountMeta>) {
        accounts.push(AccountMeta::new(self.nft_metadata_account, false));
        accounts.extend(
            self.creators
                .iter()
                .map(|creator| AccountMeta::new(*creator, false)),
        );
    }
}

/// Accounts of a listing priced in an SPL token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListNftInSplAccounts {
    /// The seller; signs and pays for the listing account.
    pub user: Pubkey,
    /// Mint of the listed NFT.
    pub nft_mint: Pubkey,
    /// Mint of the token the NFT is priced in.
    pub trade_mint: Pubkey,
    /// Seller’s account of `trade_mint` receiving the payment.
    pub seller_token_account: Pubkey,
}

/// Accounts of a purchase paid in an SPL token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuyNftWithSplAccounts {
    /// Listing being bought.
    pub listing: Pubkey,
    /// The buyer; signs the transaction.
    pub buyer: Pubkey,
    /// Buyer’s account of the trade token the payment comes from.
    pub buyer_token_account: Pubkey,
    /// Seller’s account of the trade token receiving the payment.
    pub seller_token_account: Pubkey,
    /// Owner of the token accounts, normally [`token_program_id`].
    pub token_program: Pubkey,
}

/// Serialises instruction data of the `name` method.
fn data(name: &str, args: &impl BorshSerialize) -> Result<Vec<u8>> {
    let mut data = sighash(name).to_vec();
    args.serialize(&mut data)?;
    Ok(data)
}

/// Generates instruction initialising the marketplace.
///
/// Creates the global state account with `marketplace_fee` as the fee rate.
/// `user` pays for the account and becomes its initializer.
pub fn initialize_marketplace(
    program_id: Pubkey,
    user: Pubkey,
    marketplace_fee: u64,
) -> Result<Instruction> {
    let (global_state, _) = pda::global_state_address(&program_id);
    Ok(Instruction {
        program_id,
        accounts: vec![
            AccountMeta::new(global_state, false),
            AccountMeta::new_readonly(system_program::ID, false),
            AccountMeta::new(user, true),
        ],
        data: data(
            "initialize_marketplace",
            &InitializeMarketplaceArgs { marketplace_fee },
        )?,
    })
}

/// Generates instruction listing `nft_mint` for `price` lamports.
///
/// Returns the instruction and address of the listing it creates.
pub fn list_nft(
    program_id: Pubkey,
    user: Pubkey,
    nft_mint: Pubkey,
    price: u64,
) -> Result<(Instruction, Pubkey)> {
    let (listing, _) = pda::listing_address(&program_id, &user, &nft_mint);
    let instruction = Instruction {
        program_id,
        accounts: vec![
            AccountMeta::new(listing, false),
            AccountMeta::new(user, true),
            AccountMeta::new_readonly(system_program::ID, false),
            AccountMeta::new_readonly(nft_mint, false),
            AccountMeta::new_readonly(spl_token::ID, false),
        ],
        data: data("list_nft", &ListNftArgs { price })?,
    };
    Ok((instruction, listing))
}

/// Generates instruction listing an NFT for `price` units of an SPL token.
///
/// Uses the same listing address as [`list_nft`].  Returns the instruction and
/// address of the listing it creates.
pub fn list_nft_in_spl(
    program_id: Pubkey,
    accounts: &ListNftInSplAccounts,
    price: u64,
) -> Result<(Instruction, Pubkey)> {
    let (listing, _) =
        pda::listing_address(&program_id, &accounts.user, &accounts.nft_mint);
    let instruction = Instruction {
        program_id,
        accounts: vec![
            AccountMeta::new(listing, false),
            AccountMeta::new(accounts.user, true),
            AccountMeta::new_readonly(system_program::ID, false),
            AccountMeta::new_readonly(accounts.nft_mint, false),
            AccountMeta::new_readonly(spl_token::ID, false),
            AccountMeta::new_readonly(accounts.trade_mint, false),
            AccountMeta::new_readonly(accounts.seller_token_account, false),
        ],
        data: data("list_nft_in_spl", &ListNftArgs { price })?,
    };
    Ok((instruction, listing))
}

/// Generates instruction changing price of an existing listing.
pub fn update_price(
    program_id: Pubkey,
    user: Pubkey,
    listing: Pubkey,
    new_price: u64,
) -> Result<Instruction> {
    Ok(Instruction {
        program_id,
        accounts: vec![
            AccountMeta::new(listing, false),
            AccountMeta::new_readonly(user, true),
        ],
        data: data("update_price", &UpdatePriceArgs { new_price })?,
    })
}

/// Generates instruction closing a listing.  The rent goes back to `user`.
pub fn cancel_listing(
    program_id: Pubkey,
    user: Pubkey,
    listing: Pubkey,
) -> Instruction {
    Instruction {
        program_id,
        accounts: vec![
            AccountMeta::new(listing, false),
            AccountMeta::new(user, true),
        ],
        data: sighash("cancel_listing").to_vec(),
    }
}

/// Generates instruction buying a listed NFT with native currency.
///
/// `amount` is the number of lamports offered.  The program compares it
/// with the listing price.  The royalty accounts follow the named accounts.
pub fn buy_nft(
    program_id: Pubkey,
    buyer: Pubkey,
    listing: Pubkey,
    amount: u64,
    royalties: &Royalties,
) -> Result<Instruction> {
    let (escrow, _) = pda::escrow_address(&program_id);
    let mut metas = vec![
        AccountMeta::new(listing, false),
        AccountMeta::new(buyer, true),
        AccountMeta::new(escrow, false),
        AccountMeta::new_readonly(system_program::ID, false),
    ];
    royalties.append_to(&mut metas);
    Ok(Instruction {
        program_id,
        accounts: metas,
        data: data("buy_nft", &BuyNftArgs { amount })?,
    })
}

/// Generates instruction buying a listed NFT with an SPL token.
///
/// The royalty accounts follow the named accounts.
pub fn buy_nft_with_spl(
    program_id: Pubkey,
    accounts: &BuyNftWithSplAccounts,
    amount: u64,
    royalties: &Royalties,
) -> Result<Instruction> {
    let mut metas = vec![
        AccountMeta::new(accounts.listing, false),
        AccountMeta::new(accounts.buyer, true),
        AccountMeta::new(accounts.seller_token_account, false),
        AccountMeta::new_readonly(accounts.token_program, false),
        AccountMeta::new(accounts.buyer_token_account, false),
    ];
    royalties.append_to(&mut metas);
    Ok(Instruction {
        program_id,
        accounts: metas,
        data: data("buy_nft_with_spl", &BuyNftArgs { amount })?,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    /// Splits instruction data into discriminator and decoded arguments.
    fn split<T: BorshDeserialize>(data: &[u8]) -> ([u8; 8], T) {
        let (head, tail) = data.split_at(DISCRIMINATOR_LEN);
        (head.try_into().unwrap(), borsh::from_slice(tail).unwrap())
    }

    #[test]
    fn test_sighash() {
        // sha256("global:initialize")[..8], the discriminator every Anchor
        // program starting from the default template has.
        assert_eq!(
            [175, 175, 109, 31, 13, 152, 155, 237],
            sighash("initialize")
        );
        assert_eq!(sighash("list_nft"), sighash("list_nft"));
        assert_ne!(sighash("list_nft"), sighash("list_nft_in_spl"));
        assert_ne!(sighash("listing"), discriminator("account", "listing"));
    }

    #[test]
    fn test_program_ids() {
        assert_eq!(
            "11111111111111111111111111111111",
            system_program::ID.to_string()
        );
        assert_eq!(
            "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA",
            token_program_id().to_string()
        );
    }

    #[test]
    fn test_initialize_marketplace() {
        let program_id = Pubkey::new_unique();
        let user = Pubkey::new_unique();
        let ix = initialize_marketplace(program_id, user, 250).unwrap();

        assert_eq!(program_id, ix.program_id);
        assert_eq!(
            vec![
                AccountMeta::new(
                    pda::global_state_address(&program_id).0,
                    false,
                ),
                AccountMeta::new_readonly(system_program::ID, false),
                AccountMeta::new(user, true),
            ],
            ix.accounts
        );
        assert_eq!(
            (
                sighash("initialize_marketplace"),
                InitializeMarketplaceArgs { marketplace_fee: 250 }
            ),
            split(&ix.data)
        );
        assert_eq!(16, ix.data.len());
        assert_eq!(&250u64.to_le_bytes()[..], &ix.data[8..]);
    }

    #[test]
    fn test_list_nft() {
        let program_id = Pubkey::new_unique();
        let user = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let (ix, listing) = list_nft(program_id, user, mint, 42).unwrap();

        assert_eq!(pda::listing_address(&program_id, &user, &mint).0, listing);
        assert_eq!(
            vec![
                AccountMeta::new(listing, false),
                AccountMeta::new(user, true),
                AccountMeta::new_readonly(system_program::ID, false),
                AccountMeta::new_readonly(mint, false),
                AccountMeta::new_readonly(spl_token::ID, false),
            ],
            ix.accounts
        );
        assert_eq!(
            (sighash("list_nft"), ListNftArgs { price: 42 }),
            split(&ix.data)
        );
    }

    #[test]
    fn test_list_nft_in_spl() {
        let program_id = Pubkey::new_unique();
        let accounts = ListNftInSplAccounts {
            user: Pubkey::new_unique(),
            nft_mint: Pubkey::new_unique(),
            trade_mint: Pubkey::new_unique(),
            seller_token_account: Pubkey::new_unique(),
        };
        let (ix, listing) = list_nft_in_spl(program_id, &accounts, 7).unwrap();

        let (want, _) =
            list_nft(program_id, accounts.user, accounts.nft_mint, 7).unwrap();
        assert_eq!(want.accounts[0].pubkey, listing);
        assert_eq!(&want.accounts[..], &ix.accounts[..5]);
        assert_eq!(
            &[
                AccountMeta::new_readonly(accounts.trade_mint, false),
                AccountMeta::new_readonly(accounts.seller_token_account, false),
            ][..],
            &ix.accounts[5..]
        );
        assert_eq!(
            (sighash("list_nft_in_spl"), ListNftArgs { price: 7 }),
            split(&ix.data)
        );
    }

    #[test]
    fn test_update_price() {
        let program_id = Pubkey::new_unique();
        let user = Pubkey::new_unique();
        let listing = Pubkey::new_unique();
        let ix = update_price(program_id, user, listing, u64::MAX).unwrap();

        assert_eq!(
            vec![
                AccountMeta::new(listing, false),
                AccountMeta::new_readonly(user, true),
            ],
            ix.accounts
        );
        assert_eq!(
            (
                sighash("update_price"),
                UpdatePriceArgs { new_price: u64::MAX }
            ),
            split(&ix.data)
        );
    }

    #[test]
    fn test_cancel_listing() {
        let program_id = Pubkey::new_unique();
        let user = Pubkey::new_unique();
        let listing = Pubkey::new_unique();
        let ix = cancel_listing(program_id, user, listing);

        assert_eq!(
            vec![
                AccountMeta::new(listing, false),
                AccountMeta::new(user, true),
            ],
            ix.accounts
        );
        assert_eq!(sighash("cancel_listing").to_vec(), ix.data);
    }

    fn royalties(creators: usize) -> Royalties {
        Royalties {
            nft_metadata_account: Pubkey::new_unique(),
            creators: (0..creators).map(|_| Pubkey::new_unique()).collect(),
        }
    }

    #[test]
    fn test_buy_nft() {
        let program_id = Pubkey::new_unique();
        let buyer = Pubkey::new_unique();
        let listing = Pubkey::new_unique();
        let royalties = royalties(0);
        let ix =
            buy_nft(program_id, buyer, listing, 1_000_000_000, &royalties)
                .unwrap();

        assert_eq!(
            vec![
                AccountMeta::new(listing, false),
                AccountMeta::new(buyer, true),
                AccountMeta::new(pda::escrow_address(&program_id).0, false),
                AccountMeta::new_readonly(system_program::ID, false),
                AccountMeta::new(royalties.nft_metadata_account, false),
            ],
            ix.accounts
        );
        assert_eq!(
            (sighash("buy_nft"), BuyNftArgs { amount: 1_000_000_000 }),
            split(&ix.data)
        );
    }

    #[test]
    fn test_buy_nft_with_spl() {
        let program_id = Pubkey::new_unique();
        let accounts = BuyNftWithSplAccounts {
            listing: Pubkey::new_unique(),
            buyer: Pubkey::new_unique(),
            buyer_token_account: Pubkey::new_unique(),
            seller_token_account: Pubkey::new_unique(),
            token_program: token_program_id(),
        };
        let royalties = royalties(1);
        let ix =
            buy_nft_with_spl(program_id, &accounts, 5, &royalties).unwrap();

        assert_eq!(
            vec![
                AccountMeta::new(accounts.listing, false),
                AccountMeta::new(accounts.buyer, true),
                AccountMeta::new(accounts.seller_token_account, false),
                AccountMeta::new_readonly(spl_token::ID, false),
                AccountMeta::new(accounts.buyer_token_account, false),
                AccountMeta::new(royalties.nft_metadata_account, false),
                AccountMeta::new(royalties.creators[0], false),
            ],
            ix.accounts
        );
        assert_eq!(
            (sighash("buy_nft_with_spl"), BuyNftArgs { amount: 5 }),
            split(&ix.data)
        );
    }

    #[test]
    fn test_royalty_accounts() {
        let program_id = Pubkey::new_unique();
        let buyer = Pubkey::new_unique();
        let listing = Pubkey::new_unique();
        let royalties = royalties(3);
        let ix = buy_nft(program_id, buyer, listing, 1, &royalties).unwrap();

        // Creators are writable non-signers following the metadata account,
        // in metadata order.
        let mut want =
            vec![AccountMeta::new(royalties.nft_metadata_account, false)];
        want.extend(
            royalties.creators.iter().map(|key| AccountMeta::new(*key, false)),
        );
        assert_eq!(&want[..], &ix.accounts[4..]);

        let accounts = BuyNftWithSplAccounts {
            listing,
            buyer,
            buyer_token_account: Pubkey::new_unique(),
            seller_token_account: Pubkey::new_unique(),
            token_program: token_program_id(),
        };
        let ix =
            buy_nft_with_spl(program_id, &accounts, 1, &royalties).unwrap();
        assert_eq!(&want[..], &ix.accounts[5..]);
    }
}
