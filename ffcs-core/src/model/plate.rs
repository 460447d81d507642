use bson::oid::ObjectId;
use chrono::NaiveDateTime;
use garde::Validate;
use serde::{Deserialize, Serialize};

use super::{PlateKey, status::WorkflowStatus};
use crate::{
    identifier, keyed_record, normalize::Record, timestamp,
    value::Document,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plate {
    #[serde(rename = "_id", with = "identifier::hex")]
    pub id: ObjectId,
    #[serde(flatten)]
    pub key: PlateKey,
    #[serde(default)]
    pub drop_volume: Option<f64>,
    #[serde(default)]
    pub plate_type: Option<String>,
    #[serde(default, with = "timestamp::option")]
    pub created_on: Option<NaiveDateTime>,
    #[serde(default, with = "timestamp::option")]
    pub last_imaged: Option<NaiveDateTime>,
    #[serde(default)]
    pub batch_id: Option<String>,
    #[serde(default)]
    pub soak_status: Option<WorkflowStatus>,
    #[serde(default, with = "timestamp::option")]
    pub soak_export_time: Option<NaiveDateTime>,
    #[serde(default, with = "timestamp::option")]
    pub soak_transfer_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub cryo_protection: bool,
    #[serde(default)]
    pub redesolve_applied: bool,
    #[serde(flatten)]
    pub extra: Document,
}

impl Record for Plate {
    const TIMESTAMP_FIELDS: &'static [&'static str] = &[
        "createdOn",
        "lastImaged",
        "soakExportTime",
        "soakTransferTime",
    ];
}

keyed_record!(Plate);

#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewPlate {
    #[serde(flatten)]
    #[garde(dive)]
    pub key: PlateKey,
    #[garde(range(min = 0.0))]
    pub drop_volume: f64,
    #[garde(skip)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plate_type: Option<String>,
    #[garde(skip)]
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "timestamp::option"
    )]
    pub created_on: Option<NaiveDateTime>,
    #[garde(skip)]
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "timestamp::option"
    )]
    pub last_imaged: Option<NaiveDateTime>,
    #[garde(skip)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_id: Option<String>,
}

impl NewPlate {
    /// A plate with the default 0.05 µL drop volume.
    #[must_use]
    pub fn new(key: PlateKey) -> Self {
        Self {
            key,
            drop_volume: 0.05,
            plate_type: None,
            created_on: None,
            last_imaged: None,
            batch_id: None,
        }
    }
}

/// Body of `mark_plate_done`, marking a plate as picked for the next step.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct PlateDone {
    #[garde(length(min = 1))]
    pub user_account: String,
    #[garde(length(min = 1))]
    pub campaign_id: String,
    #[garde(length(min = 1))]
    pub plate_id: String,
    #[garde(skip)]
    #[serde(with = "timestamp::option")]
    pub last_imaged: Option<NaiveDateTime>,
    #[garde(skip)]
    pub batch_id: Option<String>,
}

impl PlateDone {
    #[must_use]
    pub fn new(key: &PlateKey, last_imaged: Option<NaiveDateTime>, batch_id: Option<String>) -> Self {
        Self {
            user_account: key.user_account().to_string(),
            campaign_id: key.campaign_id().to_string(),
            plate_id: key.plate_id.clone(),
            last_imaged,
            batch_id,
        }
    }
}
