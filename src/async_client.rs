//! Async wrapper around [`HawkinsTrade`] for use in async runtimes (Tokio, etc.).
//!
//! Runs every operation on a blocking thread pool via
//! [`tokio::task::spawn_blocking`], so file I/O never stalls the event loop.
//!
//! # Example
//!
//! ```no_run
//! use hawkins_trade::AsyncHawkinsTrade;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let sdk = AsyncHawkinsTrade::builder().build().await.unwrap();
//!     sdk.initialize().await.unwrap();
//!
//!     // Run any sync method via closure
//!     let sellers = sdk.run(|s| Ok(s.listings().unique_sellers())).await.unwrap();
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::config::SeedData;
use crate::error::{HawkinsError, Result};
use crate::models::{Listing, NewListing, UserData};
use crate::storage::KeyValueStorage;
use crate::HawkinsTrade;

// ---------------------------------------------------------------------------
// AsyncHawkinsTradeBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing an [`AsyncHawkinsTrade`] instance.
#[derive(Default)]
pub struct AsyncHawkinsTradeBuilder {
    data_dir: Option<PathBuf>,
    storage: Option<Box<dyn KeyValueStorage>>,
    seed: SeedData,
}

impl AsyncHawkinsTradeBuilder {
    /// Store data as files in a custom directory.
    pub fn data_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.data_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Use a custom storage backend.
    pub fn storage<S: KeyValueStorage + 'static>(mut self, storage: S) -> Self {
        self.storage = Some(Box::new(storage));
        self
    }

    /// Choose what `initialize` writes on first launch.
    pub fn seed(mut self, seed: SeedData) -> Self {
        self.seed = seed;
        self
    }

    /// Build the async client on the blocking thread pool.
    pub async fn build(self) -> Result<AsyncHawkinsTrade> {
        tokio::task::spawn_blocking(move || {
            let mut builder = HawkinsTrade::builder().seed(self.seed);
            if let Some(dir) = self.data_dir {
                builder = builder.data_dir(dir);
            }
            if let Some(storage) = self.storage {
                builder = builder.storage(storage);
            }
            let sdk = builder.build()?;
            Ok(AsyncHawkinsTrade {
                inner: Arc::new(Mutex::new(sdk)),
            })
        })
        .await
        .map_err(|e| HawkinsError::Task(format!("Task join error: {e}")))?
    }
}

// ---------------------------------------------------------------------------
// AsyncHawkinsTrade
// ---------------------------------------------------------------------------

/// Async wrapper around [`HawkinsTrade`].
///
/// Operations are dispatched to a blocking thread pool and serialized by a
/// [`Mutex`], so two calls never interleave their read-modify-write cycles.
#[derive(Clone)]
pub struct AsyncHawkinsTrade {
    inner: Arc<Mutex<HawkinsTrade>>,
}

impl AsyncHawkinsTrade {
    /// Create a new builder for configuring the async client.
    pub fn builder() -> AsyncHawkinsTradeBuilder {
        AsyncHawkinsTradeBuilder::default()
    }

    /// Run a sync operation on the blocking thread pool.
    ///
    /// The closure receives a `&HawkinsTrade` and should return a `Result<T>`.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&HawkinsTrade) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let sdk = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let guard = sdk
                .lock()
                .map_err(|_| HawkinsError::Task("client lock poisoned".into()))?;
            f(&guard)
        })
        .await
        .map_err(|e| HawkinsError::Task(format!("Task join error: {e}")))?
    }

    /// Seed the store on first launch.
    pub async fn initialize(&self) -> Result<bool> {
        self.run(|s| s.initialize()).await
    }

    /// Erase all persisted data and re-seed.
    pub async fn reset_all(&self) -> Result<()> {
        self.run(|s| s.reset_all()).await
    }

    /// All listings, newest first.
    pub async fn listings(&self) -> Result<Vec<Listing>> {
        self.run(|s| Ok(s.listings().all())).await
    }

    pub async fn add_listing(&self, listing: NewListing) -> Result<Listing> {
        self.run(move |s| s.listings().add(listing)).await
    }

    pub async fn mark_as_sold(&self, id: &str) -> Result<Option<Listing>> {
        let id = id.to_string();
        self.run(move |s| s.listings().mark_as_sold(&id)).await
    }

    pub async fn delete_listing(&self, id: &str) -> Result<bool> {
        let id = id.to_string();
        self.run(move |s| s.listings().delete(&id)).await
    }

    /// The current user's record.
    pub async fn user(&self) -> Result<UserData> {
        self.run(|s| Ok(s.users().get())).await
    }
}
