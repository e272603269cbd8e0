//! Service layer
//!
//! Contains business logic separated from HTTP handlers.
//! Every operation loads the datasets it needs wholesale, filters in
//! memory, and writes back through the record store.

mod account;
mod feed;
mod listen;
mod profile;
mod review;
mod router;

pub use account::AccountService;
pub use feed::{FeedEntry, FeedService, build_feed};
pub use listen::{ListenListPage, ListenService};
pub use profile::{ProfilePage, ProfileService, mean_rating};
pub use review::{DEFAULT_RATING, RateTrackPage, ReviewService, SearchResult, validate_rating};
pub use router::{Page, ViewRouter};
