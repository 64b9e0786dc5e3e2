//! One-line item summaries (`2x Jollof Rice • 1x Item 7`)

use shared::models::LineEntry;

/// Shown for orders without line entries
pub const NO_ITEMS: &str = "No items";

const SEPARATOR: &str = " • ";

/// Summarize an order's line entries in their stored order
pub fn summarize_items(items: &[LineEntry]) -> String {
    if items.is_empty() {
        return NO_ITEMS.to_string();
    }
    items
        .iter()
        .map(describe_entry)
        .collect::<Vec<_>>()
        .join(SEPARATOR)
}

/// `"{quantity}x {name}"`, plus ` (a, b)` when named options are present
pub fn describe_entry(entry: &LineEntry) -> String {
    let mut line = format!("{}x {}", entry.quantity(), display_name(entry));

    let options: Vec<&str> = entry
        .options
        .iter()
        .filter_map(|o| o.name.as_deref())
        .filter(|name| !name.is_empty())
        .collect();
    if !options.is_empty() {
        line.push_str(&format!(" ({})", options.join(", ")));
    }
    line
}

/// Explicit name, else a reference to the food or side, else `"Item"`
///
/// An id of `0` counts as absent.
pub fn display_name(entry: &LineEntry) -> String {
    if let Some(name) = entry.name.as_deref().filter(|n| !n.is_empty()) {
        return name.to_string();
    }
    if let Some(food_id) = entry.food_id.filter(|id| *id != 0) {
        return format!("Item {}", food_id);
    }
    if let Some(side_id) = entry.side_id.filter(|id| *id != 0) {
        return format!("Side {}", side_id);
    }
    "Item".to_string()
}
