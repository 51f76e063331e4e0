pub mod figure;
pub mod listing;
pub mod user;

pub use figure::*;
pub use listing::*;
pub use user::*;
