//! Catalog - In-memory store of places and their reviews
//!
//! All mutations hold the write lock for the whole operation, so id
//! allocation and the place/review relationship stay consistent under
//! concurrent requests.

mod crud;
mod query;

use std::collections::BTreeMap;

use parking_lot::RwLock;

use crate::types::{Place, PlaceInput, Review, ReviewInput};

/// Mutable catalog contents (guarded by `Catalog::data`)
#[derive(Debug)]
pub(crate) struct CatalogData {
    /// Places keyed by id; iteration order is ascending id
    pub(crate) places: BTreeMap<u64, Place>,
    pub(crate) next_place_id: u64,
    pub(crate) next_review_id: u64,
}

impl Default for CatalogData {
    fn default() -> Self {
        Self {
            places: BTreeMap::new(),
            next_place_id: 1,
            next_review_id: 1,
        }
    }
}

/// Thread-safe catalog of places
#[derive(Debug, Default)]
pub struct Catalog {
    pub(crate) data: RwLock<CatalogData>,
}

impl Catalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of places currently stored
    pub fn place_count(&self) -> usize {
        self.data.read().places.len()
    }
}

impl Catalog {
    // Mutations (from crud.rs)
    pub fn create_place(&self, input: PlaceInput) -> Place {
        crud::create_place(self, input)
    }

    pub fn update_place(&self, place_id: u64, input: PlaceInput) -> Option<Place> {
        crud::update_place(self, place_id, input)
    }

    pub fn delete_place(&self, place_id: u64) -> bool {
        crud::delete_place(self, place_id)
    }

    pub fn create_review(&self, place_id: u64, input: ReviewInput) -> Option<Review> {
        crud::create_review(self, place_id, input)
    }

    // Reads (from query.rs)
    pub fn get_place(&self, place_id: u64) -> Option<Place> {
        query::get_place(self, place_id)
    }

    pub fn list_places(&self) -> Vec<Place> {
        query::list_places(self)
    }
}
