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

use solana_client::client_error::ClientError;
use solana_sdk::program_error::ProgramError;
use solana_sdk::pubkey::Pubkey;

pub type Result<T = (), E = Error> = core::result::Result<T, E>;

/// Errors returned by the marketplace client.
///
/// Transport failures are passed through unchanged in [`Error::Client`]; the
/// client does not retry or classify them.
#[derive(Debug, derive_more::From, derive_more::Display)]
pub enum Error {
    /// The RPC request failed or the transaction was rejected.
    Client(ClientError),

    /// Unexpected response from the RPC node.
    Msg(&'static str),

    /// SPL token account data could not be unpacked.
    Program(ProgramError),

    /// Borsh could not encode arguments or decode account data.
    Io(std::io::Error),

    /// The payer keypair could not be read.
    #[display("keypair: {_0}")]
    Keypair(Box<dyn std::error::Error>),

    /// A configuration value is missing or malformed.
    #[display("config: {_0}")]
    #[from(ignore)]
    Config(String),

    /// The requested account does not exist.
    #[display("account {_0} not found")]
    #[from(ignore)]
    AccountNotFound(Pubkey),

    /// Account data starts with a discriminator of a different type.
    #[display("invalid discriminator: expected {expected:?}, found {found:?}")]
    #[from(ignore)]
    InvalidDiscriminator { expected: [u8; 8], found: [u8; 8] },

    /// Account data is too short or otherwise cannot be interpreted.
    #[display("invalid account data: {_0}")]
    #[from(ignore)]
    InvalidAccountData(&'static str),
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Client(err) => Some(err),
            Self::Program(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Keypair(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

#[test]
fn test_display() {
    use pretty_assertions::assert_eq;

    let key = Pubkey::new_from_array([0; 32]);
    assert_eq!(
        "account 11111111111111111111111111111111 not found",
        Error::AccountNotFound(key).to_string()
    );
    assert_eq!(
        "config: MARKETPLACE_PROGRAM_ID is not set",
        Error::Config("MARKETPLACE_PROGRAM_ID is not set".into()).to_string()
    );
    assert_eq!(
        "invalid account data: too short",
        Error::InvalidAccountData("too short").to_string()
    );
}
