//! First-launch bootstrap and the "Clean Slate" reset.

use tracing::info;

use crate::config::{self, SeedData};
use crate::connection::Connection;
use crate::error::Result;
use crate::models::{
    now_millis, Condition, ContactMethod, ContactType, Listing, ListingType, UserData,
};

const DAY_MS: f64 = 86_400_000.0;

/// Write seed data unless the `initialized` sentinel is already set.
///
/// Returns `true` if seed data was written. Calling this again is a no-op.
pub fn initialize(conn: &Connection, seed: SeedData) -> Result<bool> {
    if conn.contains(config::INITIALIZED_KEY)? {
        return Ok(false);
    }

    let listings = match seed {
        SeedData::Mock => mock_listings(now_millis()),
        SeedData::Empty => Vec::new(),
    };
    conn.write_json(config::LISTINGS_KEY, &listings)?;
    conn.write_json(config::USER_KEY, &UserData::default())?;
    conn.write_json(config::INITIALIZED_KEY, &true)?;

    info!(%seed, listings = listings.len(), "initialized data store");
    Ok(true)
}

/// Remove every persisted key and bootstrap again.
///
/// Irreversible. Asking the user for confirmation is the caller's job.
pub fn reset_all(conn: &Connection, seed: SeedData) -> Result<()> {
    conn.remove_keys(&config::ALL_KEYS)?;
    info!("cleared all persisted data");
    initialize(conn, seed)?;
    Ok(())
}

/// The mock community listings, timestamped relative to `now`.
pub fn mock_listings(now: i64) -> Vec<Listing> {
    let ago = |days: f64| now - (DAY_MS * days) as i64;
    let ig = |name: &str| ContactMethod::new(ContactType::Instagram, name);
    let tiktok = |name: &str| ContactMethod::new(ContactType::Tiktok, name);
    let email = |name: &str| ContactMethod::new(ContactType::Email, name);

    vec![
        mock(
            ("mock_1", "will259"),
            "VC259",
            "VC259 Will Byers - The Vanishing",
            120.0,
            Condition::MintInBox,
            "Hawkins, IN",
            "Rare VC259 Will figure, still in original packaging. Slight wear on the corners of the box. From a smoke-free home in Hawkins.",
            ("seller_1", "@MikeWheeler_84"),
            vec![ig("@MikeWheeler_84"), email("mike.wheeler@hawkins.edu")],
            false,
            ago(2.0),
        ),
        mock(
            ("mock_2", "demo271"),
            "VC271",
            "VC271 Demogorgon",
            330.0,
            Condition::LooseComplete,
            "Indianapolis, IN",
            "The legendary Demogorgon figure. All parts included. Perfect for collectors who want to display without box.",
            ("seller_2", "@DustinHenderson"),
            vec![ig("@DustinHenderson"), tiktok("@dusty_bun")],
            true,
            ago(5.0),
        ),
        mock(
            ("mock_3", "eleven263"),
            "VC263",
            "VC263 Eleven - The Psychic",
            250.0,
            Condition::NearMint,
            "Chicago, IL",
            "Eleven figure with Eggo waffle accessory. Minor shelf wear only. A must-have for any serious collector.",
            ("seller_3", "@HopperChief"),
            vec![email("jim.hopper@hawkinspd.gov")],
            false,
            ago(1.0),
        ),
        mock(
            ("mock_4", "hopper265"),
            "VC265",
            "VC265 Jim Hopper - The Chief",
            180.0,
            Condition::Excellent,
            "Hawkins, IN",
            "Chief Hopper figure with hat accessory. Great condition, adult owned.",
            ("seller_1", "@MikeWheeler_84"),
            vec![ig("@MikeWheeler_84")],
            false,
            ago(3.0),
        ),
        mock(
            ("mock_5", "vecna274"),
            "VC274",
            "VC274 Vecna - The Curse",
            450.0,
            Condition::MintInBox,
            "Los Angeles, CA",
            "Ultra rare Vecna figure. Factory sealed. Never opened. The crown jewel of any ST collection.",
            ("seller_4", "@MaxMayfield"),
            vec![ig("@MaxMayfield"), tiktok("@mad_max_sk8")],
            false,
            ago(0.5),
        ),
        mock(
            ("mock_6", "steve268"),
            "VC268",
            "VC268 Steve Harrington",
            200.0,
            Condition::Good,
            "Denver, CO",
            "Steve \"The Hair\" Harrington figure. Some box damage but figure is perfect.",
            ("seller_2", "@DustinHenderson"),
            vec![ig("@DustinHenderson")],
            false,
            ago(4.0),
        ),
        mock(
            ("mock_7", "eddie275"),
            "VC275",
            "VC275 Eddie Munson - The Hero",
            380.0,
            Condition::MintInBox,
            "Austin, TX",
            "Eddie Munson with guitar accessory. Hellfire Club forever!",
            ("seller_5", "@NancyDrew_67"),
            vec![email("nancy.wheeler@hawkins.edu"), ig("@NancyDrew_67")],
            false,
            ago(2.5),
        ),
        mock(
            ("mock_8", "mike260"),
            "VC260",
            "VC260 Mike Wheeler",
            95.0,
            Condition::LooseComplete,
            "Hawkins, IN",
            "Mike Wheeler figure. All accessories included. Walkie-talkie and D&D dice.",
            ("seller_1", "@MikeWheeler_84"),
            vec![ig("@MikeWheeler_84")],
            true,
            ago(7.0),
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn mock(
    (id, image_seed): (&str, &str),
    figure_id: &str,
    title: &str,
    price: f64,
    condition: Condition,
    location: &str,
    description: &str,
    (seller_id, seller_handle): (&str, &str),
    contact_methods: Vec<ContactMethod>,
    is_sold: bool,
    created_at: i64,
) -> Listing {
    Listing {
        id: id.to_string(),
        figure_id: figure_id.to_string(),
        title: title.to_string(),
        price,
        condition,
        location: location.to_string(),
        description: description.to_string(),
        image_uri: format!("https://picsum.photos/seed/{}/400/500", image_seed),
        user_image_uri: None,
        seller_id: seller_id.to_string(),
        seller_handle: seller_handle.to_string(),
        contact_methods,
        is_sold,
        created_at,
        listing_type: ListingType::Sell,
        swap_target_id: None,
    }
}
