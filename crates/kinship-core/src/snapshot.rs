//! Snapshot codec: the whole tree as pretty-printed JSON.
//!
//! The text form is a JSON array of individual records:
//!
//! ```json
//! [
//!   {
//!     "id": "1",
//!     "name": "Alice",
//!     "gender": "female",
//!     "description": "",
//!     "image": "",
//!     "parents": [],
//!     "partner": "2",
//!     "children": [],
//!     "position": { "x": 120.5, "y": 240.0 }
//!   }
//! ]
//! ```
//!
//! Empty `partner`/`image` strings mean "none". [`serialize`] and
//! [`deserialize`] are exact inverses.

use crate::error::{FormatError, SnapshotError};
use crate::types::Individual;
use std::path::Path;

/// Conventional export file name.
pub const DEFAULT_FILE_NAME: &str = "family_tree.json";

/// Encode records as pretty-printed JSON.
///
/// JSON has no NaN or infinity, so a non-finite position is an encode error
/// rather than a `null` that [`deserialize`] would refuse.
pub fn serialize(individuals: &[Individual]) -> Result<String, FormatError> {
    if let Some(bad) = individuals.iter().find(|i| !i.position().is_finite()) {
        return Err(FormatError::Encode(format!("{} has a non-finite position", bad.id())));
    }
    serde_json::to_string_pretty(individuals).map_err(|e| FormatError::Encode(e.to_string()))
}

/// Decode records. Only the shape is checked here; edge consistency is
/// checked when the records are loaded into a tree.
pub fn deserialize(text: &str) -> Result<Vec<Individual>, FormatError> {
    Ok(serde_json::from_str(text)?)
}

/// Read and decode a snapshot file.
pub async fn read_file(path: impl AsRef<Path>) -> Result<Vec<Individual>, SnapshotError> {
    let path = path.as_ref();
    let text = tokio::fs::read_to_string(path).await?;
    let records = deserialize(&text)?;
    tracing::debug!(path = %path.display(), records = records.len(), "read snapshot");
    Ok(records)
}

/// Encode and write a snapshot file, replacing any existing content.
pub async fn write_file(path: impl AsRef<Path>, individuals: &[Individual]) -> Result<(), SnapshotError> {
    let path = path.as_ref();
    let text = serialize(individuals)?;
    tokio::fs::write(path, text).await?;
    tracing::debug!(path = %path.display(), records = individuals.len(), "wrote snapshot");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Position;

    #[test]
    fn empty_tree_round_trips() {
        let text = serialize(&[]).unwrap();
        assert_eq!(text, "[]");
        assert!(deserialize(&text).unwrap().is_empty());
    }

    #[test]
    fn garbage_is_a_decode_error() {
        assert!(matches!(deserialize("not json"), Err(FormatError::Decode(_))));
        assert!(matches!(deserialize("{\"id\": 1}"), Err(FormatError::Decode(_))));
    }

    #[test]
    fn unknown_gender_is_rejected() {
        let text = r#"[{"id":"1","name":"A","gender":"robot","position":{"x":0,"y":0}}]"#;
        assert!(deserialize(text).is_err());
    }

    #[test]
    fn records_without_position_are_rejected() {
        let text = r#"[{"id":"1","name":"A"}]"#;
        assert!(deserialize(text).is_err());
    }

    #[test]
    fn non_finite_position_is_an_encode_error() {
        let mut records = deserialize(r#"[{"id":"1","name":"A","position":{"x":1,"y":2}}]"#).unwrap();
        records[0].set_position(Position::new(f64::NAN, f64::INFINITY));
        assert!(matches!(serialize(&records), Err(FormatError::Encode(_))));
    }

    #[test]
    fn output_uses_two_space_indent() {
        let records = deserialize(r#"[{"id":"1","name":"A","position":{"x":1.5,"y":2}}]"#).unwrap();
        let text = serialize(&records).unwrap();
        assert!(text.starts_with("[\n  {\n    \"id\": \"1\""));
    }
}
