use serde::{Deserialize, Serialize};

use crate::config;

// ---------------------------------------------------------------------------
// UserData — The single per-installation user record
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserData {
    pub id: String,
    pub handle: String,
    /// Owned listing ids, in the order they were added.
    #[serde(default)]
    pub listings: Vec<String>,
    /// Reserved; nothing reads or writes it yet.
    #[serde(default)]
    pub favorites: Vec<String>,
}

impl Default for UserData {
    fn default() -> Self {
        Self {
            id: config::DEFAULT_USER_ID.to_string(),
            handle: config::DEFAULT_USER_HANDLE.to_string(),
            listings: Vec::new(),
            favorites: Vec::new(),
        }
    }
}

impl UserData {
    pub fn apply(&mut self, update: UserDataUpdate) {
        if let Some(v) = update.id {
            self.id = v;
        }
        if let Some(v) = update.handle {
            self.handle = v;
        }
        if let Some(v) = update.listings {
            self.listings = v;
        }
        if let Some(v) = update.favorites {
            self.favorites = v;
        }
    }
}

// ---------------------------------------------------------------------------
// UserDataUpdate
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserDataUpdate {
    pub id: Option<String>,
    pub handle: Option<String>,
    pub listings: Option<Vec<String>>,
    pub favorites: Option<Vec<String>>,
}
