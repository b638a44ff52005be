//! DTOs for the places provider's JSON payloads.
//!
//! The adapter decodes into these transport DTOs first, then maps into the
//! provider-neutral [`SourcePlace`] in one pass. Provider field names
//! (`displayName.text`, `location.latitude`, photo resource names) never
//! leave this module.

use serde::{Deserialize, Serialize};

use crate::domain::place::SourcePlace;

/// Body for a free-text search request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SearchRequestDto<'a> {
    pub(super) text_query: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SearchResponseDto {
    #[serde(default)]
    pub(super) places: Vec<PlaceDetailsDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PlaceDetailsDto {
    pub(super) id: Option<String>,
    pub(super) display_name: Option<LocalizedTextDto>,
    pub(super) formatted_address: Option<String>,
    pub(super) location: Option<LatLngDto>,
    pub(super) rating: Option<f64>,
    pub(super) user_rating_count: Option<u32>,
    #[serde(default)]
    pub(super) photos: Vec<PhotoDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct LocalizedTextDto {
    pub(super) text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct LatLngDto {
    pub(super) latitude: Option<f64>,
    pub(super) longitude: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub(super) struct PhotoDto {
    pub(super) name: Option<String>,
}

impl PlaceDetailsDto {
    /// Flatten the provider shape into the neutral payload.
    ///
    /// No completeness judgement happens here; the resolver decides
    /// whether the payload is usable.
    pub(super) fn into_source_place(self) -> SourcePlace {
        let latitude = self.location.as_ref().and_then(|location| location.latitude);
        let longitude = self
            .location
            .as_ref()
            .and_then(|location| location.longitude);
        SourcePlace {
            id: self.id,
            display_name: self.display_name.and_then(|name| name.text),
            formatted_address: self.formatted_address,
            latitude,
            longitude,
            rating: self.rating,
            user_rating_count: self.user_rating_count,
            photo_reference: self.photos.into_iter().find_map(|photo| photo.name),
        }
    }
}
