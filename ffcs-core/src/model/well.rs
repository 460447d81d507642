use std::sync::LazyLock;

use bson::oid::ObjectId;
use chrono::NaiveDateTime;
use garde::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{
    PlateKey,
    status::{Stage, WorkflowStatus},
};
use crate::{identifier, keyed_record, normalize::Record, timestamp, value::Document};

/// Row letter, two-digit column, subwell letter, e.g. `A01a`.
pub static WELL_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-P]\d{2}[a-d]$").unwrap());

/// Library concentrations arrive either as numbers or as free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Concentration {
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Well {
    #[serde(rename = "_id", with = "identifier::hex")]
    pub id: ObjectId,
    #[serde(flatten)]
    pub key: PlateKey,
    pub well: String,
    #[serde(default)]
    pub well_echo: Option<String>,
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
    #[serde(default)]
    pub x_echo: Option<f64>,
    #[serde(default)]
    pub y_echo: Option<f64>,

    #[serde(default)]
    pub soak_status: Option<WorkflowStatus>,
    #[serde(default, with = "timestamp::option")]
    pub soak_export_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub soak_transfer_status: Option<String>,
    #[serde(default, with = "timestamp::option")]
    pub soak_transfer_time: Option<NaiveDateTime>,
    /// Seconds between the Echo transfer and the last duration refresh.
    #[serde(default)]
    pub soak_duration: Option<f64>,

    #[serde(default)]
    pub cryo_status: Option<WorkflowStatus>,
    #[serde(default, with = "timestamp::option")]
    pub cryo_export_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub cryo_protection: bool,
    #[serde(default)]
    pub cryo_desired_concentration: Option<f64>,
    #[serde(default)]
    pub cryo_transfer_volume: Option<f64>,
    #[serde(default)]
    pub cryo_source_well: Option<String>,
    #[serde(default)]
    pub cryo_name: Option<String>,
    #[serde(default)]
    pub cryo_barcode: Option<String>,

    #[serde(default)]
    pub redesolve_status: Option<WorkflowStatus>,
    #[serde(default, with = "timestamp::option")]
    pub redesolve_export_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub redesolve_applied: bool,
    #[serde(default)]
    pub redesolve_transfer_volume: Option<f64>,
    #[serde(default)]
    pub redesolve_source_well: Option<String>,
    #[serde(default)]
    pub redesolve_name: Option<String>,
    #[serde(default)]
    pub redesolve_barcode: Option<String>,

    #[serde(default)]
    pub fished: bool,
    #[serde(default, with = "timestamp::option")]
    pub shifter_time_of_arrival: Option<NaiveDateTime>,
    #[serde(default, with = "timestamp::option")]
    pub shifter_time_of_departure: Option<NaiveDateTime>,
    #[serde(default, with = "timestamp::option")]
    pub shifter_duration: Option<NaiveDateTime>,
    #[serde(default)]
    pub shifter_comment: Option<String>,
    #[serde(default)]
    pub shifter_xtal_id: Option<String>,
    #[serde(default)]
    pub xtal_name: Option<String>,
    #[serde(default)]
    pub puck_barcode: Option<String>,
    #[serde(default)]
    pub puck_position: Option<String>,
    #[serde(default)]
    pub pin_barcode: Option<String>,
    #[serde(default)]
    pub puck_type: Option<String>,

    #[serde(default, with = "identifier::hex_option")]
    pub library_id: Option<ObjectId>,
    #[serde(default)]
    pub library_name: Option<String>,
    #[serde(default)]
    pub library_barcode: Option<String>,
    #[serde(default)]
    pub library_assigned: bool,
    #[serde(default)]
    pub compound_code: Option<String>,
    #[serde(default)]
    pub smiles: Option<String>,
    #[serde(default)]
    pub source_well: Option<String>,
    #[serde(default)]
    pub solvent_test: Option<bool>,
    #[serde(default)]
    pub library_concentration: Option<Concentration>,
    #[serde(default)]
    pub solvent_volume: Option<f64>,
    #[serde(default)]
    pub ligand_transfer_volume: Option<f64>,
    #[serde(default)]
    pub ligand_concentration: Option<f64>,

    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub exported_to_xls: bool,

    #[serde(flatten)]
    pub extra: Document,
}

impl Record for Well {
    const TIMESTAMP_FIELDS: &'static [&'static str] = &[
        "soakExportTime",
        "soakTransferTime",
        "cryoExportTime",
        "redesolveExportTime",
        "shifterTimeOfArrival",
        "shifterTimeOfDeparture",
        "shifterDuration",
    ];
    const IDENTIFIER_FIELDS: &'static [&'static str] = &["_id", "libraryId"];
}

keyed_record!(Well);

impl Well {
    #[must_use]
    pub fn status(&self, stage: Stage) -> Option<WorkflowStatus> {
        match stage {
            Stage::Soak => self.soak_status,
            Stage::Cryo => self.cryo_status,
            Stage::Redesolve => self.redesolve_status,
        }
    }

    /// The Echo position, falling back to the plate position.
    #[must_use]
    pub fn echo_position(&self) -> &str {
        self.well_echo.as_deref().unwrap_or(&self.well)
    }

    /// The numeric suffix of an `xtal-N` crystal name.
    #[must_use]
    pub fn xtal_number(&self) -> Option<u32> {
        self.xtal_name.as_deref().and_then(super::fishing::xtal_number)
    }
}

#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewWell {
    #[serde(flatten)]
    #[garde(dive)]
    pub key: PlateKey,
    #[garde(pattern(WELL_LABEL))]
    pub well: String,
    #[garde(inner(pattern(WELL_LABEL)))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub well_echo: Option<String>,
    #[garde(skip)]
    pub x: f64,
    #[garde(skip)]
    pub y: f64,
    #[garde(skip)]
    pub x_echo: f64,
    #[garde(skip)]
    pub y_echo: f64,
    /// Any further initial fields, such as a pre-set `soakStatus`.
    #[garde(skip)]
    #[serde(flatten)]
    pub fields: Document,
}

impl NewWell {
    #[must_use]
    pub fn new(key: PlateKey, well: &str, position: (f64, f64), echo: (f64, f64)) -> Self {
        Self {
            key,
            well: well.to_string(),
            well_echo: Some(well.to_string()),
            x: position.0,
            y: position.1,
            x_echo: echo.0,
            y_echo: echo.1,
            fields: Document::new(),
        }
    }
}
