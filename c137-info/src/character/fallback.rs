//! Degradation policy for character lookups
//!
//! primary → ordered fallback chain → exhausted (original error)

use super::types::{CharacterRecord, LocationRef};
use std::fmt::Display;
use std::future::Future;

/// Main-cast ids tried, in order, when random selection fails
pub const FALLBACK_CHARACTER_IDS: [u32; 5] = [1, 2, 3, 4, 5];

/// Resolve `primary`, degrading through `fallbacks` in declared order
///
/// Returns the first fallback success. Fallback failures are logged as
/// warnings only; when every fallback fails the *primary* error is returned
/// so callers cannot tell "fallback also failed" from "primary failed".
pub async fn first_success<T, E, K, F, Fut>(
    primary: Result<T, E>,
    fallbacks: impl IntoIterator<Item = K>,
    mut attempt: F,
) -> Result<T, E>
where
    K: Display,
    E: Display,
    F: FnMut(K) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let primary_err = match primary {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };

    tracing::warn!(error = %primary_err, "Primary lookup failed, trying fallbacks");

    for key in fallbacks {
        let label = key.to_string();
        match attempt(key).await {
            Ok(value) => {
                tracing::info!(fallback = %label, "Fallback lookup succeeded");
                return Ok(value);
            }
            Err(e) => {
                tracing::warn!(fallback = %label, error = %e, "Fallback lookup failed");
            }
        }
    }

    Err(primary_err)
}

/// Built-in record served when the upstream API is unreachable
pub fn static_fallback_character() -> CharacterRecord {
    CharacterRecord {
        id: 1,
        name: "Rick Sanchez".to_string(),
        status: "Alive".to_string(),
        species: "Human".to_string(),
        kind: String::new(),
        gender: "Male".to_string(),
        origin: LocationRef {
            name: "Earth (C-137)".to_string(),
            url: "https://rickandmortyapi.com/api/location/1".to_string(),
        },
        location: LocationRef {
            name: "Citadel of Ricks".to_string(),
            url: "https://rickandmortyapi.com/api/location/3".to_string(),
        },
        image: "https://rickandmortyapi.com/api/character/avatar/1.jpeg".to_string(),
        episode: vec!["https://rickandmortyapi.com/api/episode/1".to_string()],
        url: "https://rickandmortyapi.com/api/character/1".to_string(),
        created: "2017-11-04T18:48:46.250Z".to_string(),
    }
}

/// "Loading..." record shown before the first fetch completes
pub fn placeholder_character() -> CharacterRecord {
    let loading = LocationRef {
        name: "Loading...".to_string(),
        url: String::new(),
    };

    CharacterRecord {
        id: 0,
        name: "Loading...".to_string(),
        status: "Unknown".to_string(),
        species: "Unknown".to_string(),
        kind: String::new(),
        gender: "Unknown".to_string(),
        origin: loading.clone(),
        location: loading,
        image: "/placeholder-character.svg".to_string(),
        episode: Vec::new(),
        url: String::new(),
        created: String::new(),
    }
}
