//! Access to the single per-installation [`UserData`] record.

use tracing::{debug, warn};

use crate::config;
use crate::connection::Connection;
use crate::error::Result;
use crate::models::{UserData, UserDataUpdate};
use crate::queries::listings::ListingQuery;

// ---------------------------------------------------------------------------
// UserQuery
// ---------------------------------------------------------------------------

/// Query interface for the current user's record.
pub struct UserQuery<'a> {
    conn: &'a Connection,
}

impl<'a> UserQuery<'a> {
    /// Create a new `UserQuery` bound to the given connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// The stored record, or the default user if none is stored or it cannot
    /// be read.
    pub fn get(&self) -> UserData {
        match self.try_get() {
            Ok(user) => user,
            Err(e) => {
                warn!(error = %e, "failed to read user data, using the default user");
                UserData::default()
            }
        }
    }

    /// The stored record with read failures surfaced.
    pub fn try_get(&self) -> Result<UserData> {
        Ok(self.conn.read_json(config::USER_KEY)?.unwrap_or_default())
    }

    /// Merge `update` into the record and persist it.
    pub fn update(&self, update: UserDataUpdate) -> Result<UserData> {
        let mut user = self.get();
        user.apply(update);
        self.conn.write_json(config::USER_KEY, &user)?;
        debug!(handle = %user.handle, "updated user data");
        Ok(user)
    }

    /// Whether the current user posted the listing.
    pub fn owns(&self, listing_id: &str) -> bool {
        self.get().listings.iter().any(|id| id == listing_id)
    }

    /// Figure ids the current user still has up for trade, newest first.
    pub fn selling_figures(&self) -> Vec<String> {
        let user = self.get();
        ListingQuery::new(self.conn)
            .all()
            .into_iter()
            .filter(|l| !l.is_sold && user.listings.contains(&l.id))
            .map(|l| l.figure_id)
            .collect()
    }
}
