//! Data models
//!
//! Row types of the hosted backend, shared by the order desk services and
//! anything that renders them. All numeric IDs are `i64` (serial primary
//! keys); profile ids are opaque strings.

pub mod category;
pub mod food;
pub mod order;
pub mod order_item;
pub mod profile;
pub mod side;

// Re-exports
pub use category::*;
pub use food::*;
pub use order::*;
pub use order_item::*;
pub use profile::*;
pub use side::*;

use serde::{Deserialize, Deserializer};

/// Deserialize `null` as the type's default value
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
