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

//! Client library for the NFT marketplace Solana program.
//!
//! The marketplace logic (escrow, fees, settlement and the listing life cycle)
//! lives entirely in the on-chain program.  This crate only knows how to find
//! the program’s accounts, how to encode calls to it and how to decode the
//! accounts it owns.  The program is an Anchor program so instruction data is
//! an 8-byte method discriminator followed by Borsh-serialised arguments and
//! accounts start with an 8-byte type discriminator.
//!
//! [`pda`], [`instruction`] and [`state`] are pure and work offline.
//! [`MarketplaceClient`] wraps them into a blocking RPC client which sends
//! transactions signed by a local keypair.
//!
//! ```ignore
//! let config = marketplace_client::Config::from_env()?;
//! let client = marketplace_client::MarketplaceClient::new(config)?;
//! let sig = client.list_nft(nft_mint, 1_000_000_000)?;
//! for (address, listing) in client.get_all_listings()? {
//!     println!("{address}: {} lamports", listing.price);
//! }
//! ```

mod client;
pub mod config;
mod error;
pub mod instruction;
pub mod pda;
pub mod state;

pub use client::MarketplaceClient;
pub use config::Config;
pub use error::{Error, Result};
pub use instruction::Royalties;
pub use state::{AnchorAccount, GlobalState, Listing, UserNft};
