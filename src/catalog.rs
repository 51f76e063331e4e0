//! The static figure catalog.
//!
//! The 24 official figures are compiled in and never change at runtime.
//! Listings reference them by `figure_id`, but nothing enforces that the id
//! resolves, so every helper here tolerates unknown ids.

use crate::config;
use crate::models::{Figure, Listing, ListingType};

macro_rules! figure {
    ($id:literal, $name:literal, $character:literal, $image:literal) => {
        Figure {
            id: $id,
            name: $name,
            character: $character,
            image: concat!("assets/figures/", $image),
        }
    };
}

/// The official figures, VC259 through VC282, in catalog order.
pub static FIGURES: [Figure; 24] = [
    figure!("VC259", "Will Byers - The Vanishing", "Will", "vc259.png"),
    figure!("VC260", "Mike Wheeler - The Searcher", "Mike", "vc260.png"),
    figure!("VC261", "Lucas Sinclair - The Warrior", "Lucas", "vc261.png"),
    figure!("VC262", "Dustin Henderson - The Brain", "Dustin", "vc262.png"),
    figure!("VC263", "Eleven - The Psychic", "Eleven", "vc263.png"),
    figure!("VC264", "Joyce Byers - The Mother", "Joyce", "vc264.png"),
    figure!("VC265", "Jim Hopper - The Chief", "Hopper", "vc265.png"),
    figure!("VC266", "Nancy Wheeler - The Hunter", "Nancy", "vc266.png"),
    figure!("VC267", "Jonathan Byers - The Outsider", "Jonathan", "vc267.png"),
    figure!("VC268", "Steve Harrington - The Protector", "Steve", "vc268.png"),
    figure!("VC269", "Max Mayfield - The Runaway", "Max", "vc269.png"),
    figure!("VC270", "Robin Buckley - The Translator", "Robin", "vc270.png"),
    figure!("VC271", "Demogorgon - The Monster", "Demogorgon", "vc271.png"),
    figure!("VC272", "Demobat - The Swarm", "Demobat", "vc272.png"),
    figure!("VC273", "Mind Flayer - The Shadow", "Mind Flayer", "vc273.png"),
    figure!("VC274", "Vecna - The Curse", "Vecna", "vc274.png"),
    figure!("VC275", "Eddie Munson - The Hero", "Eddie", "vc275.png"),
    figure!("VC276", "Billy Hargrove - The Lifeguard", "Billy", "vc276.png"),
    figure!("VC277", "Dr. Brenner - The Father", "Brenner", "vc277.png"),
    figure!("VC278", "Bob Newby - The Brain", "Bob", "vc278.png"),
    figure!("VC279", "Murray Bauman - The Investigator", "Murray", "vc279.png"),
    figure!("VC280", "Erica Sinclair - The Spy", "Erica", "vc280.png"),
    figure!("VC281", "Argyle - The Stoner", "Argyle", "vc281.png"),
    figure!("VC282", "Suzie Bingham - The Voice", "Suzie", "vc282.png"),
];

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Lookup interface over [`FIGURES`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Catalog;

impl Catalog {
    pub fn new() -> Self {
        Self
    }

    /// All figures in catalog order.
    pub fn all(&self) -> &'static [Figure] {
        &FIGURES
    }

    /// Exact, case-sensitive id lookup.
    pub fn get_by_id(&self, id: &str) -> Option<&'static Figure> {
        FIGURES.iter().find(|f| f.id == id)
    }

    /// Character name for a figure id, if it resolves.
    pub fn character_of(&self, figure_id: &str) -> Option<&'static str> {
        self.get_by_id(figure_id).map(|f| f.character)
    }

    /// Distinct character names in catalog order.
    pub fn characters(&self) -> Vec<&'static str> {
        let mut out: Vec<&'static str> = Vec::new();
        for figure in FIGURES.iter() {
            if !out.contains(&figure.character) {
                out.push(figure.character);
            }
        }
        out
    }

    pub fn by_character(&self, character: &str) -> Vec<&'static Figure> {
        FIGURES.iter().filter(|f| f.character == character).collect()
    }

    /// Case-insensitive substring search over figure id, name and character.
    pub fn search(&self, query: &str) -> Vec<&'static Figure> {
        let q = query.to_lowercase();
        FIGURES
            .iter()
            .filter(|f| {
                f.id.to_lowercase().contains(&q)
                    || f.name.to_lowercase().contains(&q)
                    || f.character.to_lowercase().contains(&q)
            })
            .collect()
    }

    // -- Images ------------------------------------------------------------

    /// Catalog image for a figure id, or the default image when it does not resolve.
    pub fn image_for(&self, figure_id: &str) -> &'static str {
        self.get_by_id(figure_id)
            .map(|f| f.image)
            .unwrap_or(config::DEFAULT_FIGURE_IMAGE)
    }

    /// Image to display for a listing.
    ///
    /// Preference order: the seller's own photo, the catalog image, the stored
    /// `image_uri`, then the default image.
    pub fn listing_image(&self, listing: &Listing) -> String {
        if let Some(uri) = listing.user_image_uri.as_deref().filter(|u| !u.is_empty()) {
            return uri.to_string();
        }
        if let Some(figure) = self.get_by_id(&listing.figure_id) {
            return figure.image.to_string();
        }
        if !listing.image_uri.is_empty() {
            return listing.image_uri.clone();
        }
        config::DEFAULT_FIGURE_IMAGE.to_string()
    }

    // -- Titles ------------------------------------------------------------

    /// Title the post form generates for a new listing.
    ///
    /// Returns `None` when `figure_id` is not in the catalog.
    pub fn listing_title(
        &self,
        listing_type: ListingType,
        figure_id: &str,
        swap_target_id: Option<&str>,
    ) -> Option<String> {
        let figure = self.get_by_id(figure_id)?;
        let title = match listing_type {
            ListingType::Sell => format!(
                "{} {} - {}",
                figure.id,
                figure.character,
                figure.subtitle().unwrap_or("For Sale")
            ),
            ListingType::Swap => {
                let target = swap_target_id
                    .and_then(|id| self.character_of(id))
                    .unwrap_or("Trade");
                format!("{} {} \u{21c4} {}", figure.id, figure.character, target)
            }
            ListingType::Iso => format!("ISO: {} {}", figure.id, figure.character),
        };
        Some(title)
    }
}
