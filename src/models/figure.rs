use serde::Serialize;

// ---------------------------------------------------------------------------
// Figure — A catalog entry, compiled in and never mutated
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Figure {
    pub id: &'static str,
    pub name: &'static str,
    pub character: &'static str,
    pub image: &'static str,
}

impl Figure {
    /// The part of the name after `" - "`, e.g. `"The Psychic"`.
    pub fn subtitle(&self) -> Option<&'static str> {
        self.name
            .split_once(" - ")
            .map(|(_, rest)| rest)
            .filter(|rest| !rest.is_empty())
    }
}
