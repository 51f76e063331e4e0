//! Listing store integration tests against in-memory storage.

mod common;

use hawkins_trade::config;
use hawkins_trade::models::{
    Condition, ContactMethod, ContactType, Listing, ListingType, ListingUpdate, NewListing,
};
use hawkins_trade::queries::SearchListingsParams;
use hawkins_trade::{HawkinsTrade, KeyValueStorage, MemoryStorage, SeedData};

fn listing_at(id: &str, figure_id: &str, location: &str, seller: &str, created_at: i64) -> Listing {
    let new = common::sample_listing(figure_id);
    let mut listing = Listing::from_new(new, id.to_string(), created_at);
    listing.location = location.to_string();
    listing.seller_handle = seller.to_string();
    listing
}

fn store_raw_listings(storage: &MemoryStorage, listings: &[Listing]) {
    storage
        .set(config::LISTINGS_KEY, &serde_json::to_vec(listings).unwrap())
        .unwrap();
}

// ---------------------------------------------------------------------------
// all
// ---------------------------------------------------------------------------

#[test]
fn all_is_empty_when_nothing_stored() {
    let (sdk, _storage) = common::memory_sdk(SeedData::Mock);

    assert!(sdk.listings().all().is_empty());
}

#[test]
fn all_is_sorted_newest_first() {
    let (sdk, _storage) = common::mock_sdk();

    let listings = sdk.listings().all();
    assert_eq!(listings.len(), 8);
    for pair in listings.windows(2) {
        assert!(pair[0].created_at >= pair[1].created_at);
    }
    assert_eq!(listings[0].id, "mock_5");
    assert_eq!(listings[7].id, "mock_8");
}

#[test]
fn all_sorts_unordered_blob() {
    let (sdk, storage) = common::empty_sdk();
    store_raw_listings(
        &storage,
        &[
            listing_at("a", "VC259", "Hawkins, IN", "@a", 100),
            listing_at("b", "VC260", "Hawkins, IN", "@a", 300),
            listing_at("c", "VC261", "Hawkins, IN", "@a", 200),
        ],
    );

    let ids: Vec<String> = sdk.listings().all().into_iter().map(|l| l.id).collect();
    assert_eq!(ids, vec!["b", "c", "a"]);
}

#[test]
fn all_swallows_corrupt_blob() {
    let (sdk, storage) = common::empty_sdk();
    storage.set(config::LISTINGS_KEY, b"{not json").unwrap();

    assert!(sdk.listings().all().is_empty());
    assert!(sdk.listings().try_all().is_err());
}

#[test]
fn all_swallows_read_failure() {
    let storage = common::FailingStorage::new(MemoryStorage::new()).failing_reads();
    let sdk = HawkinsTrade::builder().storage(storage).build().unwrap();

    assert!(sdk.listings().all().is_empty());
    assert!(sdk.listings().get_by_id("mock_1").is_none());
    assert!(sdk.listings().unique_sellers().is_empty());
}

#[test]
fn legacy_records_without_listing_type_read_as_sell() {
    let (sdk, storage) = common::empty_sdk();
    let blob = serde_json::json!([{
        "id": "old_1",
        "figureId": "VC262",
        "title": "VC262 Dustin",
        "price": 80,
        "condition": "Good",
        "location": "Hawkins, IN",
        "description": "",
        "imageUri": "",
        "sellerId": "seller_9",
        "sellerHandle": "@Dusty",
        "contactMethods": [{"type": "tiktok", "username": "@dusty"}],
        "isSold": false,
        "createdAt": 1700000000000_i64
    }]);
    storage
        .set(config::LISTINGS_KEY, &serde_json::to_vec(&blob).unwrap())
        .unwrap();

    let listing = sdk.listings().get_by_id("old_1").unwrap();
    assert_eq!(listing.listing_type, ListingType::Sell);
    assert_eq!(listing.swap_target_id, None);
    assert_eq!(listing.contact_methods[0].contact_type, ContactType::Tiktok);
}

// ---------------------------------------------------------------------------
// get_by_id / get_by_seller
// ---------------------------------------------------------------------------

#[test]
fn get_by_id_finds_listing() {
    let (sdk, _storage) = common::mock_sdk();

    let listing = sdk.listings().get_by_id("mock_3").unwrap();
    assert_eq!(listing.figure_id, "VC263");
    assert_eq!(listing.seller_handle, "@HopperChief");
}

#[test]
fn get_by_id_returns_none_for_unknown_id() {
    let (sdk, _storage) = common::mock_sdk();

    assert!(sdk.listings().get_by_id("nope").is_none());
}

#[test]
fn get_by_seller_matches_exact_handle() {
    let (sdk, _storage) = common::mock_sdk();

    let mike = sdk.listings().get_by_seller("@MikeWheeler_84");
    let ids: Vec<&str> = mike.iter().map(|l| l.id.as_str()).collect();
    assert_eq!(ids, vec!["mock_1", "mock_4", "mock_8"]);

    assert!(sdk.listings().get_by_seller("@mikewheeler_84").is_empty());
}

#[test]
fn other_by_seller_excludes_current_and_limits() {
    let (sdk, _storage) = common::mock_sdk();

    let others = sdk.listings().other_by_seller("@MikeWheeler_84", "mock_1", 1);
    assert_eq!(others.len(), 1);
    assert_eq!(others[0].id, "mock_4");
}

// ---------------------------------------------------------------------------
// add
// ---------------------------------------------------------------------------

#[test]
fn add_assigns_id_and_timestamp() {
    let (sdk, _storage) = common::empty_sdk();
    let before = hawkins_trade::models::now_millis();

    let added = sdk.listings().add(common::sample_listing("VC259")).unwrap();

    let after = hawkins_trade::models::now_millis();
    assert!(!added.id.is_empty());
    assert!(added.created_at >= before && added.created_at <= after);

    let all = sdk.listings().all();
    assert_eq!(all.iter().filter(|l| l.id == added.id).count(), 1);
    assert!(sdk.users().get().listings.contains(&added.id));
}

#[test]
fn add_round_trips_every_other_field() {
    let (sdk, _storage) = common::empty_sdk();
    let mut new = common::sample_listing("VC269");
    new.listing_type = ListingType::Swap;
    new.price = 0.0;
    new.swap_target_id = Some("VC270".to_string());
    new.contact_methods = vec![
        ContactMethod::new(ContactType::Email, "max@hawkins.edu"),
        ContactMethod::new(ContactType::Tiktok, "@max"),
    ];

    let added = sdk.listings().add(new.clone()).unwrap();
    let fetched = sdk.listings().get_by_id(&added.id).unwrap();

    assert_eq!(fetched, added);
    assert_eq!(NewListing::from(fetched), new);
}

#[test]
fn add_generates_distinct_ids() {
    let (sdk, _storage) = common::empty_sdk();

    let ids: Vec<String> = (0..20)
        .map(|_| sdk.listings().add(common::sample_listing("VC259")).unwrap().id)
        .collect();

    let mut deduped = ids.clone();
    deduped.sort();
    deduped.dedup();
    assert_eq!(deduped.len(), ids.len());
    assert_eq!(sdk.users().get().listings, ids);
}

#[test]
fn add_puts_newest_first() {
    let (sdk, _storage) = common::mock_sdk();

    let added = sdk.listings().add(common::sample_listing("VC281")).unwrap();

    let all = sdk.listings().all();
    assert_eq!(all.len(), 9);
    assert_eq!(all[0].id, added.id);
}

#[test]
fn add_keeps_listing_when_user_write_fails() {
    let inner = MemoryStorage::new();
    let storage = common::FailingStorage::new(inner.clone()).failing_writes_to(config::USER_KEY);
    let sdk = HawkinsTrade::builder().storage(storage).build().unwrap();

    let result = sdk.listings().add(common::sample_listing("VC259"));
    assert!(result.is_err());

    // The listing write went through before the user write failed.
    let all = sdk.listings().all();
    assert_eq!(all.len(), 1);
    assert!(common::raw(&inner, config::USER_KEY).is_none());
}

#[test]
fn add_propagates_listing_write_failure() {
    let storage =
        common::FailingStorage::new(MemoryStorage::new()).failing_writes_to(config::LISTINGS_KEY);
    let sdk = HawkinsTrade::builder().storage(storage).build().unwrap();

    assert!(sdk.listings().add(common::sample_listing("VC259")).is_err());
    assert!(sdk.users().get().listings.is_empty());
}

#[test]
fn add_refuses_to_overwrite_corrupt_blob() {
    let (sdk, storage) = common::empty_sdk();
    storage.set(config::LISTINGS_KEY, b"[{\"id\":").unwrap();

    assert!(sdk.listings().add(common::sample_listing("VC259")).is_err());
    assert_eq!(
        common::raw(&storage, config::LISTINGS_KEY).unwrap(),
        b"[{\"id\":".to_vec()
    );
}

#[test]
fn add_persists_without_validation() {
    let (sdk, _storage) = common::empty_sdk();
    let mut bad = common::sample_listing("NOT_A_FIGURE");
    bad.price = -5.0;
    bad.location = "nowhere".to_string();
    bad.contact_methods.clear();

    let added = sdk.listings().add(bad).unwrap();
    assert_eq!(sdk.listings().get_by_id(&added.id).unwrap().figure_id, "NOT_A_FIGURE");
}

// ---------------------------------------------------------------------------
// update / mark_as_sold
// ---------------------------------------------------------------------------

#[test]
fn update_merges_only_given_fields() {
    let (sdk, _storage) = common::mock_sdk();
    let before = sdk.listings().get_by_id("mock_4").unwrap();

    let updated = sdk
        .listings()
        .update(
            "mock_4",
            ListingUpdate {
                price: Some(150.0),
                condition: Some(Condition::Good),
                ..ListingUpdate::default()
            },
        )
        .unwrap()
        .unwrap();

    assert_eq!(updated.price, 150.0);
    assert_eq!(updated.condition, Condition::Good);
    assert_eq!(updated.title, before.title);
    assert_eq!(updated.created_at, before.created_at);
    assert_eq!(sdk.listings().get_by_id("mock_4").unwrap(), updated);
}

#[test]
fn update_can_clear_optional_fields() {
    let (sdk, _storage) = common::empty_sdk();
    let added = sdk.listings().add(common::sample_listing("VC259")).unwrap();
    assert!(added.user_image_uri.is_some());

    let updated = sdk
        .listings()
        .update(
            &added.id,
            ListingUpdate {
                user_image_uri: Some(None),
                ..ListingUpdate::default()
            },
        )
        .unwrap()
        .unwrap();
    assert_eq!(updated.user_image_uri, None);
}

#[test]
fn update_soft_misses_unknown_id() {
    let (sdk, storage) = common::mock_sdk();
    let before = common::raw(&storage, config::LISTINGS_KEY);

    let result = sdk.listings().update("nope", ListingUpdate::sold()).unwrap();

    assert!(result.is_none());
    assert_eq!(common::raw(&storage, config::LISTINGS_KEY), before);
}

#[test]
fn mark_as_sold_changes_only_is_sold() {
    let (sdk, _storage) = common::mock_sdk();
    let before = sdk.listings().get_by_id("mock_1").unwrap();
    assert!(!before.is_sold);

    let sold = sdk.listings().mark_as_sold("mock_1").unwrap().unwrap();

    assert!(sold.is_sold);
    let mut expected = before.clone();
    expected.is_sold = true;
    assert_eq!(sold, expected);
}

#[test]
fn mark_as_sold_is_idempotent() {
    let (sdk, _storage) = common::mock_sdk();

    sdk.listings().mark_as_sold("mock_2").unwrap();
    let again = sdk.listings().mark_as_sold("mock_2").unwrap().unwrap();
    assert!(again.is_sold);
}

#[test]
fn update_propagates_write_failure() {
    let inner = MemoryStorage::new();
    let seeded = HawkinsTrade::builder().storage(inner.clone()).build().unwrap();
    seeded.initialize().unwrap();

    let storage = common::FailingStorage::new(inner).failing_writes_to(config::LISTINGS_KEY);
    let sdk = HawkinsTrade::builder().storage(storage).build().unwrap();

    assert!(sdk.listings().mark_as_sold("mock_1").is_err());
    assert!(!sdk.listings().get_by_id("mock_1").unwrap().is_sold);
}

// ---------------------------------------------------------------------------
// delete
// ---------------------------------------------------------------------------

#[test]
fn delete_removes_listing_and_ownership() {
    let (sdk, _storage) = common::empty_sdk();
    let keep = sdk.listings().add(common::sample_listing("VC259")).unwrap();
    let gone = sdk.listings().add(common::sample_listing("VC260")).unwrap();

    assert!(sdk.listings().delete(&gone.id).unwrap());

    assert!(sdk.listings().get_by_id(&gone.id).is_none());
    assert_eq!(sdk.listings().all().len(), 1);
    assert_eq!(sdk.users().get().listings, vec![keep.id]);
}

#[test]
fn delete_unknown_id_returns_true_and_changes_nothing() {
    let (sdk, _storage) = common::mock_sdk();
    let before = sdk.listings().all();

    assert!(sdk.listings().delete("nope").unwrap());
    assert_eq!(sdk.listings().all(), before);
}

#[test]
fn delete_propagates_write_failure() {
    let inner = MemoryStorage::new();
    let seeded = HawkinsTrade::builder().storage(inner.clone()).build().unwrap();
    seeded.initialize().unwrap();

    let storage = common::FailingStorage::new(inner).failing_writes_to(config::USER_KEY);
    let sdk = HawkinsTrade::builder().storage(storage).build().unwrap();

    assert!(sdk.listings().delete("mock_1").is_err());
    // The listing blob was already rewritten.
    assert!(sdk.listings().get_by_id("mock_1").is_none());
}

#[test]
fn add_and_delete_replace_corrupt_user_record() {
    let (sdk, storage) = common::empty_sdk();
    storage.set(config::USER_KEY, b"{not json").unwrap();

    let listing = sdk.listings().add(common::sample_listing("VC259")).unwrap();
    let user = sdk.users().get();
    assert_eq!(user.listings, vec![listing.id.clone()]);
    assert_eq!(user.handle, "@CurrentUser");

    storage.set(config::USER_KEY, b"{not json").unwrap();
    assert!(sdk.listings().delete(&listing.id).unwrap());
    assert!(sdk.listings().all().is_empty());
    assert!(sdk.users().get().listings.is_empty());
}

// ---------------------------------------------------------------------------
// Derived indexes
// ---------------------------------------------------------------------------

#[test]
fn derived_queries_on_empty_collection_are_empty() {
    let (sdk, _storage) = common::empty_sdk();
    let q = sdk.listings();

    assert!(q.unique_characters().is_empty());
    assert!(q.unique_sellers().is_empty());
    assert!(q.unique_locations().is_empty());
    assert!(q.unique_countries().is_empty());
    assert!(q.unique_listing_types().is_empty());
}

#[test]
fn unique_sellers_in_first_seen_order() {
    let (sdk, _storage) = common::mock_sdk();

    assert_eq!(
        sdk.listings().unique_sellers(),
        vec![
            "@MaxMayfield",
            "@HopperChief",
            "@MikeWheeler_84",
            "@NancyDrew_67",
            "@DustinHenderson",
        ]
    );
}

#[test]
fn unique_locations_has_no_duplicates() {
    let (sdk, _storage) = common::mock_sdk();

    let locations = sdk.listings().unique_locations();
    assert_eq!(locations.len(), 6);
    assert_eq!(locations.iter().filter(|l| *l == "Hawkins, IN").count(), 1);
}

#[test]
fn unique_countries_sorted() {
    let (sdk, _storage) = common::mock_sdk();

    assert_eq!(
        sdk.listings().unique_countries(),
        vec!["CA", "CO", "IL", "IN", "TX"]
    );
}

#[test]
fn unique_countries_tolerates_malformed_locations() {
    let (sdk, storage) = common::empty_sdk();
    store_raw_listings(
        &storage,
        &[
            listing_at("a", "VC259", "Hawkins", "@a", 1),
            listing_at("b", "VC259", "Hawkins, ", "@a", 2),
            listing_at("c", "VC259", "Paris, Ile-de-France, France", "@a", 3),
            listing_at("d", "VC259", "", "@a", 4),
            listing_at("e", "VC259", "Lyon,France", "@a", 5),
        ],
    );

    assert_eq!(sdk.listings().unique_countries(), vec!["France"]);
}

#[test]
fn unique_characters_skips_unknown_figures() {
    let (sdk, storage) = common::empty_sdk();
    store_raw_listings(
        &storage,
        &[
            listing_at("a", "VC263", "Hawkins, IN", "@a", 5),
            listing_at("b", "XX999", "Hawkins, IN", "@a", 4),
            listing_at("c", "VC265", "Hawkins, IN", "@a", 3),
            listing_at("d", "VC263", "Hawkins, IN", "@a", 2),
        ],
    );

    assert_eq!(sdk.listings().unique_characters(), vec!["Eleven", "Hopper"]);
}

#[test]
fn unique_characters_from_mock_data() {
    let (sdk, _storage) = common::mock_sdk();

    let characters = sdk.listings().unique_characters();
    assert_eq!(characters.len(), 8);
    assert_eq!(characters[0], "Vecna");
}

#[test]
fn unique_listing_types_first_seen() {
    let (sdk, _storage) = common::empty_sdk();
    let mut iso = common::sample_listing("VC263");
    iso.listing_type = ListingType::Iso;
    sdk.listings().add(common::sample_listing("VC259")).unwrap();
    sdk.listings().add(iso).unwrap();
    sdk.listings().add(common::sample_listing("VC260")).unwrap();

    let types = sdk.listings().unique_listing_types();
    assert_eq!(types.len(), 2);
    assert!(types.contains(&ListingType::Sell));
    assert!(types.contains(&ListingType::Iso));
}

// ---------------------------------------------------------------------------
// search / count
// ---------------------------------------------------------------------------

#[test]
fn search_without_filters_returns_everything() {
    let (sdk, _storage) = common::mock_sdk();

    let results = sdk.listings().search(&SearchListingsParams::default());
    assert_eq!(results, sdk.listings().all());
}

#[test]
fn search_by_country_matches_location_suffix() {
    let (sdk, _storage) = common::mock_sdk();

    let params = SearchListingsParams {
        country: Some("IN".to_string()),
        ..Default::default()
    };
    let results = sdk.listings().search(&params);
    assert_eq!(results.len(), 4);
    assert!(results.iter().all(|l| l.location.ends_with("IN")));
}

#[test]
fn search_by_character_uses_catalog() {
    let (sdk, _storage) = common::mock_sdk();

    let params = SearchListingsParams {
        character: Some("Hopper".to_string()),
        ..Default::default()
    };
    let results = sdk.listings().search(&params);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].figure_id, "VC265");
}

#[test]
fn search_combines_filters() {
    let (sdk, _storage) = common::mock_sdk();

    let params = SearchListingsParams {
        seller: Some("@MikeWheeler_84".to_string()),
        include_sold: Some(false),
        ..Default::default()
    };
    let ids: Vec<String> = sdk
        .listings()
        .search(&params)
        .into_iter()
        .map(|l| l.id)
        .collect();
    assert_eq!(ids, vec!["mock_1", "mock_4"]);
}

#[test]
fn search_by_type_and_text() {
    let (sdk, _storage) = common::mock_sdk();
    let mut swap = common::sample_listing("VC262");
    swap.listing_type = ListingType::Swap;
    swap.swap_target_id = Some("VC263".to_string());
    swap.description = "Want an EGGO Eleven".to_string();
    let added = sdk.listings().add(swap).unwrap();

    let by_type = SearchListingsParams {
        listing_type: Some(ListingType::Swap),
        ..Default::default()
    };
    assert_eq!(sdk.listings().count(&by_type), 1);

    let by_text = SearchListingsParams {
        text: Some("eggo".to_string()),
        ..Default::default()
    };
    let ids: Vec<String> = sdk
        .listings()
        .search(&by_text)
        .into_iter()
        .map(|l| l.id)
        .collect();
    assert_eq!(ids, vec![added.id, "mock_3".to_string()]);
}

#[test]
fn search_paginates() {
    let (sdk, _storage) = common::mock_sdk();

    let params = SearchListingsParams {
        offset: Some(2),
        limit: Some(3),
        ..Default::default()
    };
    let ids: Vec<String> = sdk
        .listings()
        .search(&params)
        .into_iter()
        .map(|l| l.id)
        .collect();
    assert_eq!(ids, vec!["mock_1", "mock_7", "mock_4"]);
}

// ---------------------------------------------------------------------------
// End-to-end
// ---------------------------------------------------------------------------

#[test]
fn add_sell_delete_scenario() {
    let (sdk, _storage) = common::empty_sdk();

    let added = sdk.listings().add(common::sample_listing("VC259")).unwrap();
    assert_eq!(sdk.listings().all().len(), 1);

    sdk.listings().mark_as_sold(&added.id).unwrap();
    assert!(sdk.listings().get_by_id(&added.id).unwrap().is_sold);

    assert!(sdk.listings().delete(&added.id).unwrap());
    assert!(sdk.listings().all().is_empty());
    assert!(sdk.users().get().listings.is_empty());
}
