//! Shared test fixtures for the Hawkins Trade integration tests.
//!
//! Provides in-memory clients, a storage double that fails on demand, and a
//! builder for sample listings.

#![allow(dead_code)]

use hawkins_trade::models::{Condition, ContactMethod, ContactType, ListingType, NewListing};
use hawkins_trade::{HawkinsError, HawkinsTrade, KeyValueStorage, MemoryStorage, Result, SeedData};

/// Create a client over fresh in-memory storage.
///
/// Returns the client and a handle onto the same storage so tests can inspect
/// or corrupt the raw blobs.
pub fn memory_sdk(seed: SeedData) -> (HawkinsTrade, MemoryStorage) {
    let storage = MemoryStorage::new();
    let sdk = HawkinsTrade::builder()
        .storage(storage.clone())
        .seed(seed)
        .build()
        .unwrap();
    (sdk, storage)
}

/// An initialized client with an empty listing collection.
pub fn empty_sdk() -> (HawkinsTrade, MemoryStorage) {
    let (sdk, storage) = memory_sdk(SeedData::Empty);
    sdk.initialize().unwrap();
    (sdk, storage)
}

/// An initialized client holding the eight mock listings.
pub fn mock_sdk() -> (HawkinsTrade, MemoryStorage) {
    let (sdk, storage) = memory_sdk(SeedData::Mock);
    sdk.initialize().unwrap();
    (sdk, storage)
}

/// A sell listing for `figure_id` posted by the current user.
pub fn sample_listing(figure_id: &str) -> NewListing {
    NewListing {
        figure_id: figure_id.to_string(),
        title: format!("{} for sale", figure_id),
        price: 120.0,
        condition: Condition::MintInBox,
        location: "Hawkins, USA".to_string(),
        description: "Still in the box.".to_string(),
        image_uri: String::new(),
        user_image_uri: Some("file:///photos/figure.jpg".to_string()),
        seller_id: "current_user".to_string(),
        seller_handle: "@CurrentUser".to_string(),
        contact_methods: vec![ContactMethod::new(ContactType::Instagram, "@a")],
        is_sold: false,
        listing_type: ListingType::Sell,
        swap_target_id: None,
    }
}

/// Read the raw bytes stored under `key`.
pub fn raw(storage: &MemoryStorage, key: &str) -> Option<Vec<u8>> {
    storage.get(key).unwrap()
}

// ---------------------------------------------------------------------------
// FailingStorage
// ---------------------------------------------------------------------------

/// Memory storage that fails reads and/or writes to selected keys.
pub struct FailingStorage {
    pub inner: MemoryStorage,
    fail_reads: bool,
    fail_writes_to: Vec<String>,
}

impl FailingStorage {
    pub fn new(inner: MemoryStorage) -> Self {
        Self {
            inner,
            fail_reads: false,
            fail_writes_to: Vec::new(),
        }
    }

    pub fn failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    pub fn failing_writes_to(mut self, key: &str) -> Self {
        self.fail_writes_to.push(key.to_string());
        self
    }
}

impl KeyValueStorage for FailingStorage {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        if self.fail_reads {
            return Err(HawkinsError::Storage(format!("read of {} failed", key)));
        }
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        if self.fail_writes_to.iter().any(|k| k == key) {
            return Err(HawkinsError::Storage(format!("write of {} failed", key)));
        }
        self.inner.set(key, value)
    }

    fn remove_many(&self, keys: &[&str]) -> Result<()> {
        self.inner.remove_many(keys)
    }
}
