use prahari_types::GrievanceId;
use serde::{Deserialize, Serialize};

use crate::chain::Ledger;
use crate::record::{AnnotationField, RecordKind};

/// One sealed amendment to a grievance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationEntry {
    pub block_index: u64,
    pub field: AnnotationField,
    pub value: String,
    pub recorded_at: String,
}

/// Effective view of a grievance reconstructed from sealed records.
///
/// Sealed blocks are never edited, so the current status is the intake
/// status overridden by the last sealed status annotation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrievanceHistory {
    pub grievance_id: GrievanceId,
    pub status: Option<String>,
    pub intake_block: Option<u64>,
    pub annotations: Vec<AnnotationEntry>,
}

impl GrievanceHistory {
    /// `true` when nothing about this grievance has been sealed.
    pub fn is_empty(&self) -> bool {
        self.intake_block.is_none() && self.annotations.is_empty()
    }
}

/// Deterministic projections over the sealed chain.
pub struct ProjectionBuilder;

impl ProjectionBuilder {
    pub fn history(ledger: &Ledger, grievance_id: &GrievanceId) -> GrievanceHistory {
        let mut status = None;
        let mut intake_block = None;
        let mut annotations = Vec::new();

        for block in ledger.chain() {
            for record in block.records() {
                if &record.grievance_id != grievance_id {
                    continue;
                }
                match &record.kind {
                    RecordKind::Intake => {
                        if intake_block.is_none() {
                            intake_block = Some(block.index);
                            status.get_or_insert_with(|| record.status.clone());
                        }
                    }
                    RecordKind::Annotation { field, value } => {
                        if *field == AnnotationField::Status {
                            status = Some(value.clone());
                        }
                        annotations.push(AnnotationEntry {
                            block_index: block.index,
                            field: *field,
                            value: value.clone(),
                            recorded_at: record.created_at.display(),
                        });
                    }
                }
            }
        }

        GrievanceHistory {
            grievance_id: grievance_id.clone(),
            status,
            intake_block,
            annotations,
        }
    }

    pub fn latest_status(ledger: &Ledger, grievance_id: &GrievanceId) -> Option<String> {
        Self::history(ledger, grievance_id).status
    }
}
