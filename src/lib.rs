//! Hawkins Trade data layer for Rust.
//!
//! Provides a client over the marketplace's persisted state: the listing
//! collection, the current user's record, and the static figure catalog.
//! State lives in a key-value backend as whole JSON blobs that are re-read and
//! rewritten on every operation.
//!
//! # Quick start
//!
//! ```no_run
//! use hawkins_trade::HawkinsTrade;
//!
//! let sdk = HawkinsTrade::builder().build().unwrap();
//! sdk.initialize().unwrap();
//!
//! // Browse the market, newest first
//! let listings = sdk.listings().all();
//!
//! // Build the country filter chips
//! let countries = sdk.listings().unique_countries();
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod catalog;
pub mod config;
pub mod connection;
pub mod error;
pub mod models;
pub mod queries;
pub mod seed;
pub mod storage;

#[cfg(feature = "async")]
pub use async_client::AsyncHawkinsTrade;
pub use catalog::Catalog;
pub use config::SeedData;
pub use connection::Connection;
pub use error::{HawkinsError, Result};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};

use std::fmt;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// HawkinsTradeBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`HawkinsTrade`] instance.
///
/// Use [`HawkinsTrade::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](HawkinsTradeBuilder::build) to create the client.
#[derive(Default)]
pub struct HawkinsTradeBuilder {
    data_dir: Option<PathBuf>,
    storage: Option<Box<dyn KeyValueStorage>>,
    seed: SeedData,
}

impl HawkinsTradeBuilder {
    /// Store data as files in a custom directory.
    ///
    /// If neither this nor [`storage`](Self::storage) is set, the platform data
    /// directory is used (e.g. `~/.local/share/hawkins-trade` on Linux).
    pub fn data_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.data_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Use a custom storage backend. Takes precedence over `data_dir`.
    pub fn storage<S: KeyValueStorage + 'static>(mut self, storage: S) -> Self {
        self.storage = Some(Box::new(storage));
        self
    }

    /// Choose what `initialize` writes on first launch.
    ///
    /// Defaults to [`SeedData::Mock`].
    pub fn seed(mut self, seed: SeedData) -> Self {
        self.seed = seed;
        self
    }

    /// Build the client.
    ///
    /// Creates the data directory when file storage is used, but does **not**
    /// seed anything; call [`HawkinsTrade::initialize`] at start-up.
    pub fn build(self) -> Result<HawkinsTrade> {
        let storage: Box<dyn KeyValueStorage> = match self.storage {
            Some(storage) => storage,
            None => Box::new(FileStorage::new(self.data_dir)?),
        };
        Ok(HawkinsTrade {
            conn: Connection::from_boxed(storage),
            seed: self.seed,
        })
    }
}

// ---------------------------------------------------------------------------
// HawkinsTrade
// ---------------------------------------------------------------------------

/// The main entry point for the data layer.
///
/// Wraps a [`Connection`] and exposes the stores as lightweight borrowing
/// wrappers. Created via [`HawkinsTrade::builder()`].
pub struct HawkinsTrade {
    conn: Connection,
    seed: SeedData,
}

impl HawkinsTrade {
    /// Create a new builder for configuring the client.
    pub fn builder() -> HawkinsTradeBuilder {
        HawkinsTradeBuilder::default()
    }

    // -- Store accessors ---------------------------------------------------

    /// Access the listing store.
    pub fn listings(&self) -> queries::listings::ListingQuery<'_> {
        queries::listings::ListingQuery::new(&self.conn)
    }

    /// Access the current user's record.
    pub fn users(&self) -> queries::users::UserQuery<'_> {
        queries::users::UserQuery::new(&self.conn)
    }

    /// Access the static figure catalog.
    pub fn catalog(&self) -> Catalog {
        Catalog::new()
    }

    // -- Lifecycle ---------------------------------------------------------

    /// Seed the store on first launch.
    ///
    /// Returns `true` if seed data was written, `false` if the store was
    /// already initialized.
    pub fn initialize(&self) -> Result<bool> {
        seed::initialize(&self.conn, self.seed)
    }

    /// Erase all persisted data and re-seed ("Clean Slate").
    pub fn reset_all(&self) -> Result<()> {
        seed::reset_all(&self.conn, self.seed)
    }

    /// The seed variant this client bootstraps with.
    pub fn seed(&self) -> SeedData {
        self.seed
    }

    /// Return a reference to the underlying [`Connection`] for advanced usage.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for HawkinsTrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HawkinsTrade(storage={}, seed={})",
            self.conn.storage().describe(),
            self.seed
        )
    }
}
