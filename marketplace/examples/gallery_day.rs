//! A day in the gallery, with logging turned on.
//!
//! Walks the marketplace through its whole surface: registration,
//! verification, minting, a primary sale, a secondary sale with a royalty
//! leg, and an admin fee change. Run with `RUST_LOG=debug` to watch every
//! operation commit.

use atelier_marketplace::{config, Marketplace, MarketplaceError};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), MarketplaceError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let mut market = Marketplace::new("admin");
    market.fund("alice", 50_000)?;
    market.fund("bob", 50_000)?;
    market.fund("carol", 50_000)?;

    // Alice joins, gets the badge, and mints.
    market.register("alice", "ipfs://alice-profile")?;
    market.verify("alice", config::VERIFICATION_FEE)?;
    let token = market.mint(
        "alice",
        "Dusk over the Harbor",
        "Oil on canvas, 2026",
        "bafybeigdyrzt5sfp7udm7hu76uh7y26nf3efuylqabf3oclgtqy55fbzdi",
        10_000,
        10,
    )?;

    // Primary sale: no royalty, alice is the seller.
    market.purchase("bob", token, 10_000)?;

    // Bob flips it; alice collects her royalty this time.
    market.list("bob", token, 25_000)?;
    market.purchase("carol", token, 25_000)?;

    market.set_platform_fee("admin", 3)?;

    let stats = market.stats();
    println!(
        "artworks: {}, sales: {}, volume: {}",
        stats.total_artworks, stats.total_sales, stats.total_volume
    );
    println!(
        "alice earned {} and holds {} reputation",
        market.artist("alice")?.total_earnings,
        market.artist("alice")?.reputation
    );
    println!("provenance of #{token}: {:?}", market.provenance(token)?);

    Ok(())
}
