use serde::{Deserialize, Serialize};

use crate::normalize::Record;

/// Per-plate well counts returned by the `get_id_of_plates_*` listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlateWellSummary {
    #[serde(rename = "_id")]
    pub plate_id: String,
    pub total_wells: u32,
    pub wells_with_library: u32,
    pub wells_without_library: u32,
}

impl Record for PlateWellSummary {
    const TIMESTAMP_FIELDS: &'static [&'static str] = &[];
    const IDENTIFIER_FIELDS: &'static [&'static str] = &[];
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageGroup {
    pub source_well: Option<String>,
    pub library_name: Option<String>,
}

/// Total volume drawn from one source well, from the cryo and solvent
/// usage reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageTotal {
    #[serde(rename = "_id")]
    pub group: UsageGroup,
    pub total: f64,
}

impl Record for UsageTotal {
    const TIMESTAMP_FIELDS: &'static [&'static str] = &[];
    const IDENTIFIER_FIELDS: &'static [&'static str] = &[];
}
