//! Listing queries and mutations over the `hawkins_trade_listings` blob.
//!
//! The whole collection is read and rewritten on every call. Read methods
//! never fail: a missing or unreadable blob is an empty collection. Mutations
//! read strictly and return storage errors to the caller.

use std::collections::{BTreeSet, HashSet};
use std::hash::Hash;

use tracing::{debug, warn};

use crate::catalog::Catalog;
use crate::config;
use crate::connection::Connection;
use crate::error::Result;
use crate::models::{
    country_of, generate_id, now_millis, Condition, Listing, ListingType, ListingUpdate,
    NewListing,
};
use crate::queries::users::UserQuery;

// ---------------------------------------------------------------------------
// SearchListingsParams
// ---------------------------------------------------------------------------

/// Parameters for filtering the market list.
///
/// All fields are optional. When `None`, the corresponding filter is skipped.
/// Filters combine with AND.
#[derive(Debug, Clone, Default)]
pub struct SearchListingsParams {
    pub listing_type: Option<ListingType>,
    /// Character name, matched through the catalog.
    pub character: Option<String>,
    /// Matches when the trimmed location ends with this value.
    pub country: Option<String>,
    /// Exact location match.
    pub location: Option<String>,
    /// Exact seller handle match.
    pub seller: Option<String>,
    pub condition: Option<Condition>,
    pub figure_id: Option<String>,
    /// Case-insensitive substring of title or description.
    pub text: Option<String>,
    /// Defaults to `true`.
    pub include_sold: Option<bool>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

// ---------------------------------------------------------------------------
// ListingQuery
// ---------------------------------------------------------------------------

/// Query interface for the listing collection.
pub struct ListingQuery<'a> {
    conn: &'a Connection,
}

impl<'a> ListingQuery<'a> {
    /// Create a new `ListingQuery` bound to the given connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    // -- Reads -------------------------------------------------------------

    /// All listings, newest first.
    ///
    /// Returns an empty list if nothing is stored or the stored blob cannot be
    /// read; the failure is logged, not returned.
    pub fn all(&self) -> Vec<Listing> {
        match self.try_all() {
            Ok(listings) => listings,
            Err(e) => {
                warn!(error = %e, "failed to read listings, returning an empty list");
                Vec::new()
            }
        }
    }

    /// All listings, newest first, with read failures surfaced.
    pub fn try_all(&self) -> Result<Vec<Listing>> {
        let mut listings: Vec<Listing> = self
            .conn
            .read_json(config::LISTINGS_KEY)?
            .unwrap_or_default();
        listings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(listings)
    }

    pub fn get_by_id(&self, id: &str) -> Option<Listing> {
        self.all().into_iter().find(|l| l.id == id)
    }

    /// Listings whose seller handle matches exactly.
    pub fn get_by_seller(&self, seller_handle: &str) -> Vec<Listing> {
        self.all()
            .into_iter()
            .filter(|l| l.seller_handle == seller_handle)
            .collect()
    }

    /// Up to `limit` of the seller's listings, skipping `exclude_id`.
    pub fn other_by_seller(
        &self,
        seller_handle: &str,
        exclude_id: &str,
        limit: usize,
    ) -> Vec<Listing> {
        self.get_by_seller(seller_handle)
            .into_iter()
            .filter(|l| l.id != exclude_id)
            .take(limit)
            .collect()
    }

    // -- Mutations ---------------------------------------------------------

    /// Persist a new listing and record it as owned by the current user.
    ///
    /// The listing blob and the user blob are written separately. If the
    /// second write fails the listing stays persisted without an owner entry.
    /// An unreadable user record is replaced by the default user.
    pub fn add(&self, new: NewListing) -> Result<Listing> {
        let mut listings = self.try_all()?;
        let mut user = UserQuery::new(self.conn).get();

        let mut id = generate_id();
        while listings.iter().any(|l| l.id == id) {
            id = generate_id();
        }
        let listing = Listing::from_new(new, id, now_millis());

        listings.insert(0, listing.clone());
        self.conn.write_json(config::LISTINGS_KEY, &listings)?;

        user.listings.push(listing.id.clone());
        self.conn.write_json(config::USER_KEY, &user)?;

        debug!(id = %listing.id, figure_id = %listing.figure_id, "added listing");
        Ok(listing)
    }

    /// Shallow-merge `update` into the listing with `id`.
    ///
    /// Returns `Ok(None)` if no listing has that id.
    pub fn update(&self, id: &str, update: ListingUpdate) -> Result<Option<Listing>> {
        let mut listings = self.try_all()?;
        let Some(index) = listings.iter().position(|l| l.id == id) else {
            debug!(id, "update skipped, listing not found");
            return Ok(None);
        };

        listings[index].apply(update);
        self.conn.write_json(config::LISTINGS_KEY, &listings)?;

        debug!(id, "updated listing");
        Ok(Some(listings[index].clone()))
    }

    /// Remove a listing from the collection and from the user's owned ids.
    ///
    /// Returns `Ok(true)` once both writes succeed, whether or not the id was
    /// present.
    pub fn delete(&self, id: &str) -> Result<bool> {
        let listings = self.try_all()?;
        let mut user = UserQuery::new(self.conn).get();

        let remaining: Vec<Listing> = listings.into_iter().filter(|l| l.id != id).collect();
        self.conn.write_json(config::LISTINGS_KEY, &remaining)?;

        user.listings.retain(|lid| lid != id);
        self.conn.write_json(config::USER_KEY, &user)?;

        debug!(id, "deleted listing");
        Ok(true)
    }

    /// Set `is_sold`. There is no way back through this interface.
    pub fn mark_as_sold(&self, id: &str) -> Result<Option<Listing>> {
        self.update(id, ListingUpdate::sold())
    }

    // -- Derived indexes ---------------------------------------------------

    /// Characters of the listed figures, first-seen order.
    ///
    /// Figure ids that are not in the catalog are skipped.
    pub fn unique_characters(&self) -> Vec<String> {
        let catalog = Catalog::new();
        unique_in_order(
            self.all()
                .iter()
                .filter_map(|l| catalog.character_of(&l.figure_id))
                .map(str::to_string),
        )
    }

    /// Seller handles, first-seen order.
    pub fn unique_sellers(&self) -> Vec<String> {
        unique_in_order(self.all().into_iter().map(|l| l.seller_handle))
    }

    /// Raw location strings, first-seen order.
    pub fn unique_locations(&self) -> Vec<String> {
        unique_in_order(self.all().into_iter().map(|l| l.location))
    }

    /// Countries parsed from locations, sorted.
    ///
    /// Locations without a comma contribute nothing.
    pub fn unique_countries(&self) -> Vec<String> {
        let countries: BTreeSet<String> = self
            .all()
            .iter()
            .filter_map(|l| country_of(&l.location))
            .map(str::to_string)
            .collect();
        countries.into_iter().collect()
    }

    /// Listing types present, first-seen order.
    pub fn unique_listing_types(&self) -> Vec<ListingType> {
        unique_in_order(self.all().into_iter().map(|l| l.listing_type))
    }

    // -- Search ------------------------------------------------------------

    /// Filter the collection, newest first.
    pub fn search(&self, params: &SearchListingsParams) -> Vec<Listing> {
        let catalog = Catalog::new();
        let include_sold = params.include_sold.unwrap_or(true);
        let text = params.text.as_ref().map(|t| t.to_lowercase());

        let matches = self.all().into_iter().filter(|l| {
            if !include_sold && l.is_sold {
                return false;
            }
            if let Some(lt) = params.listing_type {
                if l.listing_type != lt {
                    return false;
                }
            }
            if let Some(ref character) = params.character {
                if catalog.character_of(&l.figure_id) != Some(character.as_str()) {
                    return false;
                }
            }
            if let Some(ref country) = params.country {
                if !l.location.trim().ends_with(country.as_str()) {
                    return false;
                }
            }
            if let Some(ref location) = params.location {
                if &l.location != location {
                    return false;
                }
            }
            if let Some(ref seller) = params.seller {
                if &l.seller_handle != seller {
                    return false;
                }
            }
            if let Some(condition) = params.condition {
                if l.condition != condition {
                    return false;
                }
            }
            if let Some(ref figure_id) = params.figure_id {
                if &l.figure_id != figure_id {
                    return false;
                }
            }
            if let Some(ref t) = text {
                if !l.title.to_lowercase().contains(t)
                    && !l.description.to_lowercase().contains(t)
                {
                    return false;
                }
            }
            true
        });

        let skipped = matches.skip(params.offset.unwrap_or(0));
        match params.limit {
            Some(limit) => skipped.take(limit).collect(),
            None => skipped.collect(),
        }
    }

    /// Number of listings `search` would return.
    pub fn count(&self, params: &SearchListingsParams) -> usize {
        self.search(params).len()
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Drop repeats, keeping the first occurrence of each value.
fn unique_in_order<T, I>(items: I) -> Vec<T>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
