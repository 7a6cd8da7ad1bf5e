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

use core::str::FromStr;
use std::process::ExitCode;

use marketplace_client::{
    Config, GlobalState, Listing, MarketplaceClient, Royalties,
};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;


type Result<T = (), E = Error> = core::result::Result<T, E>;


const USAGE: &str = "usage: marketplace-cli <command> [<args>...]

commands:
    init <fee>
    list <mint> <price>
    list-spl <mint> <price> <trade-mint> <seller-token-account>
    update-price <listing> <price>
    cancel <listing>
    buy <listing> <amount> <metadata> [<creator>...]
    buy-spl <listing> <amount> <buyer-token-account> <seller-token-account>
            <metadata> [<creator>...]
    metadata
    listings [<seller>]
    nfts [<owner>]

configuration is read from MARKETPLACE_PROGRAM_ID (required),
MARKETPLACE_RPC_URL, MARKETPLACE_KEYPAIR and MARKETPLACE_COMMITMENT";


/// A parsed command line.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Command {
    Init { fee: u64 },
    List { mint: Pubkey, price: u64 },
    ListSpl {
        mint: Pubkey,
        price: u64,
        trade_mint: Pubkey,
        seller_token_account: Pubkey,
    },
    UpdatePrice { listing: Pubkey, price: u64 },
    Cancel { listing: Pubkey },
    Buy { listing: Pubkey, amount: u64, royalties: Royalties },
    BuySpl {
        listing: Pubkey,
        amount: u64,
        buyer_token_account: Pubkey,
        seller_token_account: Pubkey,
        royalties: Royalties,
    },
    Metadata,
    Listings { seller: Option<Pubkey> },
    Nfts { owner: Option<Pubkey> },
}


fn main() -> ExitCode {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("{err}");
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}


/// Executes the program.
fn run() -> Result {
    let command = parse_args(std::env::args().skip(1))?;
    log::debug!("{command:?}");
    let config = Config::from_env()?;
    eprintln!("Using {} on {}", config.program_id, config.rpc_url);
    let client = MarketplaceClient::new(config)?;
    execute(&client, command)
}


/// Parses the command line arguments (without the program name).
fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Command> {
    let mut args = args.into_iter();
    let name = args.next().ok_or(Error::Usage)?;
    let mut next = || args.next().ok_or(Error::Usage);
    let command = match name.as_str() {
        "init" => Command::Init { fee: parse(next()?)? },
        "list" => Command::List {
            mint: parse(next()?)?,
            price: parse(next()?)?,
        },
        "list-spl" => Command::ListSpl {
            mint: parse(next()?)?,
            price: parse(next()?)?,
            trade_mint: parse(next()?)?,
            seller_token_account: parse(next()?)?,
        },
        "update-price" => Command::UpdatePrice {
            listing: parse(next()?)?,
            price: parse(next()?)?,
        },
        "cancel" => Command::Cancel { listing: parse(next()?)? },
        "buy" => Command::Buy {
            listing: parse(next()?)?,
            amount: parse(next()?)?,
            royalties: parse_royalties(&mut args)?,
        },
        "buy-spl" => Command::BuySpl {
            listing: parse(next()?)?,
            amount: parse(next()?)?,
            buyer_token_account: parse(next()?)?,
            seller_token_account: parse(next()?)?,
            royalties: parse_royalties(&mut args)?,
        },
        "metadata" => Command::Metadata,
        "listings" => Command::Listings {
            seller: next().ok().map(parse::<Pubkey>).transpose()?,
        },
        "nfts" => Command::Nfts {
            owner: next().ok().map(parse::<Pubkey>).transpose()?,
        },
        _ => return Err(Error::Usage),
    };
    if args.next().is_some() {
        return Err(Error::Usage);
    }
    Ok(command)
}


/// Parses NFT metadata account followed by any number of creators.
fn parse_royalties(
    args: &mut impl Iterator<Item = String>,
) -> Result<Royalties> {
    let nft_metadata_account = parse(args.next().ok_or(Error::Usage)?)?;
    let creators = args.map(parse).collect::<Result<_>>()?;
    Ok(Royalties { nft_metadata_account, creators })
}


/// Parses a single argument.
fn parse<T: FromStr>(arg: String) -> Result<T> {
    T::from_str(arg.as_str()).map_err(|_| Error::BadArg(arg))
}


/// Runs the command against the marketplace.
fn execute(client: &MarketplaceClient, command: Command) -> Result {
    let sig = match command {
        Command::Init { fee } => {
            let global_state = client.global_state();
            eprintln!("Initialising marketplace at {global_state}…");
            client.initialize_marketplace(fee)?
        }
        Command::List { mint, price } => {
            let listing = client.listing_address(&client.payer(), &mint);
            eprintln!("Listing {mint} at {listing}…");
            client.list_nft(mint, price)?
        }
        Command::ListSpl { mint, price, trade_mint, seller_token_account } => {
            let listing = client.listing_address(&client.payer(), &mint);
            eprintln!("Listing {mint} for {trade_mint} at {listing}…");
            client.list_nft_in_spl(
                mint,
                price,
                trade_mint,
                seller_token_account,
            )?
        }
        Command::UpdatePrice { listing, price } => {
            client.update_price(listing, price)?
        }
        Command::Cancel { listing } => client.cancel_listing(listing)?,
        Command::Buy { listing, amount, royalties } => {
            client.buy_nft(listing, amount, &royalties)?
        }
        Command::BuySpl {
            listing,
            amount,
            buyer_token_account,
            seller_token_account,
            royalties,
        } => client.buy_nft_with_spl(
            listing,
            amount,
            buyer_token_account,
            seller_token_account,
            &royalties,
        )?,
        Command::Metadata => {
            print_global_state(&client.get_marketplace_metadata()?);
            return Ok(());
        }
        Command::Listings { seller } => {
            let listings = match seller {
                Some(seller) => client.get_user_listings(&seller)?,
                None => client.get_all_listings()?,
            };
            for (address, listing) in listings {
                print_listing(&address, &listing);
            }
            return Ok(());
        }
        Command::Nfts { owner } => {
            let owner = owner.unwrap_or_else(|| client.payer());
            for nft in client.get_user_nfts(&owner)? {
                println!("{} {}", nft.mint, nft.token_account);
            }
            return Ok(());
        }
    };
    print_logs(client, &sig)
}


/// Prints transaction signature and its log messages.
fn print_logs(client: &MarketplaceClient, sig: &Signature) -> Result {
    eprintln!("Signature: {sig}");
    for msg in client.transaction_logs(sig)? {
        println!("{msg}");
    }
    Ok(())
}


fn print_global_state(state: &GlobalState) {
    println!("initializer:          {}", state.initializer);
    println!("fee percentage:       {}", state.marketplace_fee_percentage);
    println!(
        "listed (SOL / SPL):   {} / {}",
        state.total_listed_count_sol, state.total_listed_count_spl
    );
    println!(
        "sales (SOL / SPL):    {} / {}",
        state.all_time_sale_count_sol, state.all_time_sale_count_spl
    );
    println!("volume (lamports):    {}", state.total_volume_all_time_sol);
}


fn print_listing(address: &Pubkey, listing: &Listing) {
    let currency = if listing.is_spl_listing {
        listing.trade_spl_token_mint_address.to_string()
    } else {
        "lamports".to_string()
    };
    println!(
        "{address} seller={} mint={} price={} {currency}",
        listing.initializer, listing.nft_mint_address, listing.price,
    );
}


#[derive(derive_more::From, derive_more::Display)]
enum Error {
    #[display("{USAGE}")]
    #[from(ignore)]
    Usage,
    #[display("invalid argument: {_0}")]
    #[from(ignore)]
    BadArg(String),
    Client(marketplace_client::Error),
}
