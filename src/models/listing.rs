use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{HawkinsError, Result};

// ---------------------------------------------------------------------------
// ContactMethod
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactType {
    Instagram,
    Tiktok,
    Email,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMethod {
    #[serde(rename = "type")]
    pub contact_type: ContactType,
    pub username: String,
}

impl ContactMethod {
    pub fn new(contact_type: ContactType, username: impl Into<String>) -> Self {
        Self {
            contact_type,
            username: username.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Condition
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    #[serde(rename = "Mint in Box")]
    MintInBox,
    #[serde(rename = "Near Mint")]
    NearMint,
    #[serde(rename = "Excellent")]
    Excellent,
    #[serde(rename = "Good")]
    Good,
    #[serde(rename = "Loose, Complete")]
    LooseComplete,
    #[serde(rename = "Loose, Incomplete")]
    LooseIncomplete,
}

impl Condition {
    pub const ALL: [Condition; 6] = [
        Condition::MintInBox,
        Condition::NearMint,
        Condition::Excellent,
        Condition::Good,
        Condition::LooseComplete,
        Condition::LooseIncomplete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::MintInBox => "Mint in Box",
            Condition::NearMint => "Near Mint",
            Condition::Excellent => "Excellent",
            Condition::Good => "Good",
            Condition::LooseComplete => "Loose, Complete",
            Condition::LooseIncomplete => "Loose, Incomplete",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ListingType
// ---------------------------------------------------------------------------

/// What the poster is offering. Records written before the field existed
/// read back as [`ListingType::Sell`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingType {
    #[default]
    Sell,
    Swap,
    /// "In search of": a want-ad rather than an offer.
    Iso,
}

impl ListingType {
    pub const ALL: [ListingType; 3] = [ListingType::Sell, ListingType::Swap, ListingType::Iso];

    pub fn as_str(&self) -> &'static str {
        match self {
            ListingType::Sell => "sell",
            ListingType::Swap => "swap",
            ListingType::Iso => "iso",
        }
    }
}

impl fmt::Display for ListingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Listing — A persisted trade, sale or want-ad
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: String,
    pub figure_id: String,
    pub title: String,
    pub price: f64,
    pub condition: Condition,
    pub location: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_image_uri: Option<String>,
    #[serde(default)]
    pub seller_id: String,
    pub seller_handle: String,
    #[serde(default)]
    pub contact_methods: Vec<ContactMethod>,
    #[serde(default)]
    pub is_sold: bool,
    /// Milliseconds since the Unix epoch.
    pub created_at: i64,
    #[serde(default)]
    pub listing_type: ListingType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swap_target_id: Option<String>,
}

impl Listing {
    /// Attach an id and creation timestamp to a new listing.
    pub fn from_new(new: NewListing, id: String, created_at: i64) -> Self {
        Self {
            id,
            figure_id: new.figure_id,
            title: new.title,
            price: new.price,
            condition: new.condition,
            location: new.location,
            description: new.description,
            image_uri: new.image_uri,
            user_image_uri: new.user_image_uri,
            seller_id: new.seller_id,
            seller_handle: new.seller_handle,
            contact_methods: new.contact_methods,
            is_sold: new.is_sold,
            created_at,
            listing_type: new.listing_type,
            swap_target_id: new.swap_target_id,
        }
    }

    /// Overwrite every field the update carries; everything else is kept.
    pub fn apply(&mut self, update: ListingUpdate) {
        if let Some(v) = update.figure_id {
            self.figure_id = v;
        }
        if let Some(v) = update.title {
            self.title = v;
        }
        if let Some(v) = update.price {
            self.price = v;
        }
        if let Some(v) = update.condition {
            self.condition = v;
        }
        if let Some(v) = update.location {
            self.location = v;
        }
        if let Some(v) = update.description {
            self.description = v;
        }
        if let Some(v) = update.image_uri {
            self.image_uri = v;
        }
        if let Some(v) = update.user_image_uri {
            self.user_image_uri = v;
        }
        if let Some(v) = update.seller_id {
            self.seller_id = v;
        }
        if let Some(v) = update.seller_handle {
            self.seller_handle = v;
        }
        if let Some(v) = update.contact_methods {
            self.contact_methods = v;
        }
        if let Some(v) = update.is_sold {
            self.is_sold = v;
        }
        if let Some(v) = update.created_at {
            self.created_at = v;
        }
        if let Some(v) = update.listing_type {
            self.listing_type = v;
        }
        if let Some(v) = update.swap_target_id {
            self.swap_target_id = v;
        }
    }

    /// Country part of the location: the text after the last comma, trimmed.
    ///
    /// `"Hawkins, IN"` gives `Some("IN")`; `"Hawkins"` and `"Hawkins, "` give `None`.
    pub fn country(&self) -> Option<&str> {
        country_of(&self.location)
    }
}

/// Country part of a free-text `"City, Country"` location.
pub fn country_of(location: &str) -> Option<&str> {
    location
        .rsplit_once(',')
        .map(|(_, tail)| tail.trim())
        .filter(|country| !country.is_empty())
}

// ---------------------------------------------------------------------------
// NewListing — Input to `add`; id and timestamp are assigned on write
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewListing {
    pub figure_id: String,
    pub title: String,
    pub price: f64,
    pub condition: Condition,
    pub location: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_image_uri: Option<String>,
    #[serde(default)]
    pub seller_id: String,
    pub seller_handle: String,
    #[serde(default)]
    pub contact_methods: Vec<ContactMethod>,
    #[serde(default)]
    pub is_sold: bool,
    #[serde(default)]
    pub listing_type: ListingType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swap_target_id: Option<String>,
}

impl NewListing {
    /// Check the rules the post form enforces before calling `add`.
    ///
    /// The store itself never validates; this is for callers that want the
    /// same checks outside the form.
    pub fn validate(&self) -> Result<()> {
        if matches!(self.listing_type, ListingType::Sell | ListingType::Iso)
            && !(self.price.is_finite() && self.price > 0.0)
        {
            return Err(HawkinsError::InvalidArgument(format!(
                "A {} listing needs a positive price, got {}",
                self.listing_type, self.price
            )));
        }

        let has_city_and_country = self
            .location
            .rsplit_once(',')
            .map(|(city, country)| !city.trim().is_empty() && !country.trim().is_empty())
            .unwrap_or(false);
        if !has_city_and_country {
            return Err(HawkinsError::InvalidArgument(format!(
                "Location '{}' must be in 'City, Country' form",
                self.location
            )));
        }

        if self.contact_methods.is_empty() {
            return Err(HawkinsError::InvalidArgument(
                "At least one contact method is required".into(),
            ));
        }

        Ok(())
    }
}

impl From<Listing> for NewListing {
    fn from(l: Listing) -> Self {
        Self {
            figure_id: l.figure_id,
            title: l.title,
            price: l.price,
            condition: l.condition,
            location: l.location,
            description: l.description,
            image_uri: l.image_uri,
            user_image_uri: l.user_image_uri,
            seller_id: l.seller_id,
            seller_handle: l.seller_handle,
            contact_methods: l.contact_methods,
            is_sold: l.is_sold,
            listing_type: l.listing_type,
            swap_target_id: l.swap_target_id,
        }
    }
}

// ---------------------------------------------------------------------------
// ListingUpdate — Partial overwrite; `None` leaves a field alone
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingUpdate {
    pub figure_id: Option<String>,
    pub title: Option<String>,
    pub price: Option<f64>,
    pub condition: Option<Condition>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub image_uri: Option<String>,
    /// `Some(None)` clears the user photo.
    pub user_image_uri: Option<Option<String>>,
    pub seller_id: Option<String>,
    pub seller_handle: Option<String>,
    pub contact_methods: Option<Vec<ContactMethod>>,
    pub is_sold: Option<bool>,
    pub created_at: Option<i64>,
    pub listing_type: Option<ListingType>,
    /// `Some(None)` clears the swap target.
    pub swap_target_id: Option<Option<String>>,
}

impl ListingUpdate {
    /// The update `mark_as_sold` applies.
    pub fn sold() -> Self {
        Self {
            is_sold: Some(true),
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_RANDOM_LEN: usize = 10;

/// Current time in milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// A fresh listing id: base-36 millisecond timestamp followed by a random
/// base-36 suffix.
pub fn generate_id() -> String {
    let mut id = to_base36(now_millis().max(0) as u64);
    let mut rng = rand::thread_rng();
    for _ in 0..ID_RANDOM_LEN {
        id.push(BASE36[rng.gen_range(0..BASE36.len())] as char);
    }
    id
}

fn to_base36(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(BASE36[(n % 36) as usize]);
        n /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}
