//! Order list pipeline
//!
//! ```text
//! fetch (newest first) -> join profiles -> OrderFilterEngine -> listing
//! ```
//!
//! Everything in here is pure: no I/O, no clock reads except in
//! [`OrderFilterEngine::local`].

pub mod enrich;
pub mod filter;
pub mod stats;
pub mod summary;
pub mod window;

pub use enrich::{DashboardOrder, distinct_owner_refs, join_profiles};
pub use filter::{OrderFilterEngine, OrderListing};
pub use stats::{OrderOverview, PaymentState};
pub use summary::{NO_ITEMS, summarize_items};
pub use window::DateWindow;
