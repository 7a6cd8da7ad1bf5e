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

//! Connection and program settings of [`crate::MarketplaceClient`].

use core::str::FromStr;
use std::path::PathBuf;

use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signer::keypair::Keypair;

use crate::{Error, Result};

/// RPC endpoint used unless configured otherwise.
pub const DEFAULT_RPC_URL: &str = "https://api.devnet.solana.com";

/// Environment variable with the RPC endpoint URL.
pub const ENV_RPC_URL: &str = "MARKETPLACE_RPC_URL";
/// Environment variable with the marketplace program address.  Required.
pub const ENV_PROGRAM_ID: &str = "MARKETPLACE_PROGRAM_ID";
/// Environment variable with path to the payer keypair file.
pub const ENV_KEYPAIR: &str = "MARKETPLACE_KEYPAIR";
/// Environment variable with the commitment level.
pub const ENV_COMMITMENT: &str = "MARKETPLACE_COMMITMENT";

/// Settings of a [`crate::MarketplaceClient`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// URL of the RPC node.
    pub rpc_url: String,
    /// Address of the deployed marketplace program.
    pub program_id: Pubkey,
    /// Keypair which signs and pays for transactions.
    pub keypair_path: PathBuf,
    /// Commitment level of queries and transaction confirmations.
    pub commitment: CommitmentConfig,
}

impl Config {
    /// Returns configuration for given program with default settings:
    /// devnet, the Solana CLI default keypair and `confirmed` commitment.
    ///
    /// Fails if `HOME` is not set since the default keypair lives in
    /// `~/.config/solana/id.json`.
    pub fn new(program_id: Pubkey) -> Result<Self> {
        Ok(Self {
            rpc_url: DEFAULT_RPC_URL.into(),
            program_id,
            keypair_path: default_keypair_path()?,
            commitment: CommitmentConfig::confirmed(),
        })
    }

    /// Reads configuration from the `MARKETPLACE_*` environment variables.
    ///
    /// Only `MARKETPLACE_PROGRAM_ID` is required; the remaining values fall
    /// back to the defaults of [`Config::new`].
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let program_id = get(ENV_PROGRAM_ID).ok_or_else(|| {
            Error::Config(format!("{ENV_PROGRAM_ID} is not set"))
        })?;
        let program_id = parse_pubkey(ENV_PROGRAM_ID, &program_id)?;

        let keypair_path = match get(ENV_KEYPAIR) {
            Some(path) => PathBuf::from(path),
            None => default_keypair_path()?,
        };
        let mut config = Self {
            rpc_url: DEFAULT_RPC_URL.into(),
            program_id,
            keypair_path,
            commitment: CommitmentConfig::confirmed(),
        };
        if let Some(url) = get(ENV_RPC_URL) {
            config.rpc_url = url;
        }
        if let Some(commitment) = get(ENV_COMMITMENT) {
            config.commitment = parse_commitment(&commitment)?;
        }
        Ok(config)
    }

    /// Sets URL of the RPC node.
    pub fn with_rpc_url(mut self, rpc_url: impl Into<String>) -> Self {
        self.rpc_url = rpc_url.into();
        self
    }

    /// Sets path of the JSON keypair file signing transactions.
    pub fn with_keypair_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.keypair_path = path.into();
        self
    }

    /// Sets commitment level used for queries and confirmations.
    pub fn with_commitment(mut self, commitment: CommitmentConfig) -> Self {
        self.commitment = commitment;
        self
    }

    /// Reads the payer keypair.
    pub fn read_keypair(&self) -> Result<Keypair> {
        solana_sdk::signer::keypair::read_keypair_file(&self.keypair_path)
            .map_err(Error::from)
    }
}

/// Parses base58-encoded address; `what` names the value in the error.
pub fn parse_pubkey(what: &str, value: &str) -> Result<Pubkey> {
    Pubkey::from_str(value.trim())
        .map_err(|err| Error::Config(format!("{what}: {value:?}: {err}")))
}

/// Parses commitment level name.
pub fn parse_commitment(value: &str) -> Result<CommitmentConfig> {
    match value.trim() {
        "processed" => Ok(CommitmentConfig::processed()),
        "confirmed" => Ok(CommitmentConfig::confirmed()),
        "finalized" => Ok(CommitmentConfig::finalized()),
        _ => Err(Error::Config(format!("invalid commitment: {value:?}"))),
    }
}

/// Returns `~/.config/solana/id.json`.
fn default_keypair_path() -> Result<PathBuf> {
    let home = std::env::var_os("HOME")
        .ok_or_else(|| Error::Config("HOME is not set".into()))?;
    let mut path = PathBuf::from(home);
    path.push(".config/solana/id.json");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;

    fn lookup<'a>(
        vars: &'a [(&'a str, &'a str)],
    ) -> impl Fn(&str) -> Option<String> + 'a {
        let vars: HashMap<_, _> = vars.iter().copied().collect();
        move |name| vars.get(name).map(|value| value.to_string())
    }

    #[test]
    fn test_from_lookup() {
        let program_id = Pubkey::new_unique();
        let id = program_id.to_string();
        let got = Config::from_lookup(lookup(&[
            (ENV_PROGRAM_ID, id.as_str()),
            (ENV_RPC_URL, "http://127.0.0.1:8899"),
            (ENV_KEYPAIR, "/tmp/payer.json"),
            (ENV_COMMITMENT, "finalized"),
        ]))
        .unwrap();
        assert_eq!(
            Config {
                rpc_url: "http://127.0.0.1:8899".into(),
                program_id,
                keypair_path: "/tmp/payer.json".into(),
                commitment: CommitmentConfig::finalized(),
            },
            got
        );
    }

    #[test]
    fn test_from_lookup_defaults() {
        let program_id = Pubkey::new_unique();
        let id = program_id.to_string();
        let got = Config::from_lookup(lookup(&[
            (ENV_PROGRAM_ID, id.as_str()),
            (ENV_KEYPAIR, "payer.json"),
        ]))
        .unwrap();
        assert_eq!(DEFAULT_RPC_URL, got.rpc_url);
        assert_eq!(CommitmentConfig::confirmed(), got.commitment);
        assert_eq!(PathBuf::from("payer.json"), got.keypair_path);
    }

    #[test]
    fn test_from_lookup_errors() {
        assert!(matches!(
            Config::from_lookup(lookup(&[(ENV_KEYPAIR, "payer.json")])),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            Config::from_lookup(lookup(&[
                (ENV_PROGRAM_ID, "not a key"),
                (ENV_KEYPAIR, "payer.json"),
            ])),
            Err(Error::Config(_))
        ));
        let id = Pubkey::new_unique().to_string();
        assert!(matches!(
            Config::from_lookup(lookup(&[
                (ENV_PROGRAM_ID, id.as_str()),
                (ENV_KEYPAIR, "payer.json"),
                (ENV_COMMITMENT, "recent"),
            ])),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_builders() {
        let config = Config {
            rpc_url: DEFAULT_RPC_URL.into(),
            program_id: Pubkey::new_unique(),
            keypair_path: "a.json".into(),
            commitment: CommitmentConfig::confirmed(),
        }
        .with_rpc_url("http://localhost:8899")
        .with_keypair_path("b.json")
        .with_commitment(CommitmentConfig::processed());
        assert_eq!("http://localhost:8899", config.rpc_url);
        assert_eq!(PathBuf::from("b.json"), config.keypair_path);
        assert_eq!(CommitmentConfig::processed(), config.commitment);
    }

    #[test]
    fn test_read_keypair_missing() {
        let config = Config {
            rpc_url: DEFAULT_RPC_URL.into(),
            program_id: Pubkey::new_unique(),
            keypair_path: "/nonexistent/marketplace/id.json".into(),
            commitment: CommitmentConfig::confirmed(),
        };
        assert!(matches!(config.read_keypair(), Err(Error::Keypair(_))));
    }
}
