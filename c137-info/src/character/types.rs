//! Character API record types
//!
//! Field names follow the upstream JSON verbatim; `type` is renamed to
//! `kind` on the Rust side.

use serde::{Deserialize, Serialize};

/// Upstream status value remapped for display
pub const DEAD_STATUS: &str = "Dead";

/// Display string replacing [`DEAD_STATUS`]
pub const DECEASED_STATUS: &str = "Deceased";

/// Named link to a location resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRef {
    pub name: String,
    pub url: String,
}

/// One character as returned by `GET /character/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterRecord {
    pub id: u32,
    pub name: String,
    /// "Alive", "Dead" or "unknown"
    pub status: String,
    pub species: String,
    /// Subtype; usually empty
    #[serde(rename = "type")]
    pub kind: String,
    pub gender: String,
    pub origin: LocationRef,
    pub location: LocationRef,
    pub image: String,
    /// Episode URLs in air order
    pub episode: Vec<String>,
    pub url: String,
    pub created: String,
}

impl CharacterRecord {
    /// Copy with "Dead" replaced by "Deceased"; other statuses pass through
    pub fn with_display_status(mut self) -> Self {
        if self.status == DEAD_STATUS {
            self.status = DECEASED_STATUS.to_string();
        }
        self
    }
}

/// Pagination envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub count: u32,
    pub pages: u32,
    pub next: Option<String>,
    pub prev: Option<String>,
}

/// `{ info, results }` page of characters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterPage {
    pub info: PageInfo,
    pub results: Vec<CharacterRecord>,
}

impl CharacterPage {
    /// Page with no results (search without matches)
    pub fn empty() -> Self {
        Self {
            info: PageInfo {
                count: 0,
                pages: 0,
                next: None,
                prev: None,
            },
            results: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RICK_JSON: &str = r#"{
        "id": 1,
        "name": "Rick Sanchez",
        "status": "Alive",
        "species": "Human",
        "type": "",
        "gender": "Male",
        "origin": {"name": "Earth (C-137)", "url": "https://rickandmortyapi.com/api/location/1"},
        "location": {"name": "Citadel of Ricks", "url": "https://rickandmortyapi.com/api/location/3"},
        "image": "https://rickandmortyapi.com/api/character/avatar/1.jpeg",
        "episode": ["https://rickandmortyapi.com/api/episode/1", "https://rickandmortyapi.com/api/episode/2"],
        "url": "https://rickandmortyapi.com/api/character/1",
        "created": "2017-11-04T18:48:46.250Z"
    }"#;

    #[test]
    fn test_parse_upstream_record() {
        let record: CharacterRecord = serde_json::from_str(RICK_JSON).unwrap();
        assert_eq!(record.id, 1);
        assert_eq!(record.kind, "");
        assert_eq!(record.origin.name, "Earth (C-137)");
        assert_eq!(record.episode.len(), 2);

        let value = serde_json::to_value(&record).unwrap();
        assert!(value.get("type").is_some());
        assert!(value.get("kind").is_none());
    }

    #[test]
    fn test_display_status_remap() {
        let mut record: CharacterRecord = serde_json::from_str(RICK_JSON).unwrap();
        record.status = "Dead".into();
        assert_eq!(record.clone().with_display_status().status, "Deceased");

        for status in ["Alive", "unknown", "dead"] {
            record.status = status.into();
            assert_eq!(record.clone().with_display_status().status, status);
        }
    }

    #[test]
    fn test_parse_page_envelope() {
        let json = format!(
            r#"{{"info": {{"count": 826, "pages": 42, "next": "https://rickandmortyapi.com/api/character?page=2", "prev": null}}, "results": [{}]}}"#,
            RICK_JSON
        );
        let page: CharacterPage = serde_json::from_str(&json).unwrap();
        assert_eq!(page.info.count, 826);
        assert!(page.info.prev.is_none());
        assert_eq!(page.results[0].name, "Rick Sanchez");
    }
}
