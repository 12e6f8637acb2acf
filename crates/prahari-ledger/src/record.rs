use std::fmt;
use std::str::FromStr;

use prahari_crypto::ContentHasher;
use prahari_types::{ContentHash, GrievanceId, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Status of a freshly received grievance.
pub const DEFAULT_STATUS: &str = "Pending";

/// Status recorded on annotation entries that do not change the status.
pub const ANNOTATED_STATUS: &str = "Annotated";

/// One grievance entry, pending or sealed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub grievance_id: GrievanceId,
    pub content_hash: ContentHash,
    pub status: String,
    pub created_at: Timestamp,
    #[serde(default)]
    pub kind: RecordKind,
}

/// Whether a record is the original intake or a later amendment.
///
/// Sealed records are never edited. Metadata that arrives after sealing
/// (status changes, analysis output, audio location) is appended as an
/// `Annotation` that refers back to the grievance by id.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RecordKind {
    #[default]
    Intake,
    Annotation {
        field: AnnotationField,
        value: String,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationField {
    Status,
    Analysis,
    AudioLocation,
    Transcript,
}

impl AnnotationField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::Analysis => "analysis",
            Self::AudioLocation => "audio_location",
            Self::Transcript => "transcript",
        }
    }
}

impl fmt::Display for AnnotationField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnnotationField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "status" => Ok(Self::Status),
            "analysis" => Ok(Self::Analysis),
            "audio_location" => Ok(Self::AudioLocation),
            "transcript" => Ok(Self::Transcript),
            other => Err(format!("unknown annotation field: {other}")),
        }
    }
}

impl Record {
    pub fn intake(
        grievance_id: GrievanceId,
        content_hash: ContentHash,
        status: impl Into<String>,
    ) -> Self {
        Self {
            grievance_id,
            content_hash,
            status: status.into(),
            created_at: Timestamp::now(),
            kind: RecordKind::Intake,
        }
    }

    /// Build an annotation record. The content hash commits to the value.
    pub fn annotation(grievance_id: GrievanceId, field: AnnotationField, value: String) -> Self {
        let status = match field {
            AnnotationField::Status => value.clone(),
            _ => ANNOTATED_STATUS.to_string(),
        };
        Self {
            grievance_id,
            content_hash: ContentHasher::ANNOTATION.content(value.as_bytes()),
            status,
            created_at: Timestamp::now(),
            kind: RecordKind::Annotation { field, value },
        }
    }

    pub fn is_intake(&self) -> bool {
        matches!(self.kind, RecordKind::Intake)
    }

    /// Canonical JSON form used for block hashing.
    pub(crate) fn canonical(&self) -> Value {
        let kind = match &self.kind {
            RecordKind::Intake => json!({ "type": "intake" }),
            RecordKind::Annotation { field, value } => json!({
                "type": "annotation",
                "field": field.as_str(),
                "value": value,
            }),
        };
        json!({
            "grievance_id": self.grievance_id.as_str(),
            "content_hash": self.content_hash.to_hex(),
            "status": self.status,
            "created_at": self.created_at.to_canonical(),
            "kind": kind,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_annotation_carries_new_status() {
        let rec = Record::annotation(
            GrievanceId::from("100000"),
            AnnotationField::Status,
            "Resolved".into(),
        );
        assert_eq!(rec.status, "Resolved");
        assert!(!rec.is_intake());
    }

    #[test]
    fn other_annotations_are_marked_annotated() {
        let rec = Record::annotation(
            GrievanceId::from("100000"),
            AnnotationField::Analysis,
            "water supply complaint".into(),
        );
        assert_eq!(rec.status, ANNOTATED_STATUS);
        assert_eq!(
            rec.content_hash,
            ContentHasher::ANNOTATION.content(b"water supply complaint")
        );
    }

    #[test]
    fn annotation_field_parses() {
        assert_eq!(
            "audio_location".parse::<AnnotationField>().unwrap(),
            AnnotationField::AudioLocation
        );
        assert!("colour".parse::<AnnotationField>().is_err());
    }

    #[test]
    fn kind_defaults_to_intake_when_absent() {
        let json = serde_json::json!({
            "grievance_id": "100000",
            "content_hash": "00".repeat(32),
            "status": "Pending",
            "created_at": "2024-01-01T00:00:00Z",
        });
        let rec: Record = serde_json::from_value(json).unwrap();
        assert!(rec.is_intake());
    }

    #[test]
    fn canonical_form_has_sorted_keys() {
        let rec = Record::intake(GrievanceId::from("1"), ContentHash::zero(), "Pending");
        let rendered = rec.canonical().to_string();
        let content = rendered.find("\"content_hash\"").unwrap();
        let status = rendered.find("\"status\"").unwrap();
        assert!(content < status);
    }
}
