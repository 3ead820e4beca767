//! Mutating operations for the catalog

use chrono::Utc;

use crate::types::{Place, PlaceInput, Review, ReviewInput};

use super::Catalog;

/// Create a place with a freshly allocated id and no reviews
pub fn create_place(catalog: &Catalog, input: PlaceInput) -> Place {
    let mut data = catalog.data.write();
    let id = data.next_place_id;
    data.next_place_id += 1;

    let place = Place::from_input(id, input, Utc::now());
    data.places.insert(id, place.clone());

    tracing::debug!(place_id = id, "place created");
    place
}

/// Replace the input fields of an existing place
pub fn update_place(catalog: &Catalog, place_id: u64, input: PlaceInput) -> Option<Place> {
    let mut data = catalog.data.write();
    let place = data.places.get_mut(&place_id)?;
    place.apply(input, Utc::now());

    tracing::debug!(place_id, "place updated");
    Some(place.clone())
}

/// Delete a place together with all of its reviews
pub fn delete_place(catalog: &Catalog, place_id: u64) -> bool {
    let removed = catalog.data.write().places.remove(&place_id);
    match removed {
        Some(place) => {
            tracing::debug!(place_id, reviews = place.reviews.len(), "place deleted");
            true
        }
        None => false,
    }
}

/// Attach a new review to a place; `None` when the place does not exist
pub fn create_review(catalog: &Catalog, place_id: u64, input: ReviewInput) -> Option<Review> {
    let mut data = catalog.data.write();
    if !data.places.contains_key(&place_id) {
        return None;
    }

    let id = data.next_review_id;
    data.next_review_id += 1;

    let review = Review {
        id,
        title: input.title,
        content: input.content,
        rating: input.rating,
        created_at: Utc::now(),
        place_id,
    };

    data.places.get_mut(&place_id)?.reviews.push(review.clone());

    tracing::debug!(place_id, review_id = id, "review created");
    Some(review)
}
