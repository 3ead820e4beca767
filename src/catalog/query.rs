//! Read operations for the catalog

use crate::types::Place;

use super::Catalog;

/// Get a single place with its reviews
pub fn get_place(catalog: &Catalog, place_id: u64) -> Option<Place> {
    catalog.data.read().places.get(&place_id).cloned()
}

/// List every place in ascending id order
pub fn list_places(catalog: &Catalog) -> Vec<Place> {
    catalog.data.read().places.values().cloned().collect()
}
