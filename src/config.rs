use std::path::PathBuf;

pub const LISTINGS_KEY: &str = "hawkins_trade_listings";
pub const USER_KEY: &str = "hawkins_trade_user";
pub const INITIALIZED_KEY: &str = "hawkins_trade_initialized";

/// Every key the data layer persists, in the order `reset_all` removes them.
pub const ALL_KEYS: [&str; 3] = [LISTINGS_KEY, USER_KEY, INITIALIZED_KEY];

/// Image shown for listings whose figure is not in the catalog.
pub const DEFAULT_FIGURE_IMAGE: &str = "assets/figures/default.png";

pub const DEFAULT_USER_ID: &str = "current_user";
pub const DEFAULT_USER_HANDLE: &str = "@CurrentUser";

/// File extension used by [`FileStorage`](crate::storage::FileStorage) for each key.
pub const STORAGE_FILE_EXTENSION: &str = "json";

/// Which listings `initialize` writes on first launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeedData {
    /// Eight mock community listings.
    #[default]
    Mock,
    /// An empty collection.
    Empty,
}

impl std::fmt::Display for SeedData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeedData::Mock => write!(f, "mock"),
            SeedData::Empty => write!(f, "empty"),
        }
    }
}

pub fn default_data_dir() -> PathBuf {
    if let Some(data) = dirs::data_dir() {
        data.join("hawkins-trade")
    } else {
        PathBuf::from(".hawkins-trade-data")
    }
}
