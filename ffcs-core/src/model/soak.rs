use std::sync::LazyLock;

use chrono::NaiveDateTime;
use garde::Validate;
use regex::Regex;
use serde::Serialize;

use super::{CampaignScope, PlateKey, well::Well};
use crate::timestamp;

/// Echo positions share the plate label format.
static ECHO_POSITION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-P]\d{2}[a-d]$").unwrap());

/// One entry of a plate-scope export.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct PlateExport {
    #[serde(rename = "_id")]
    #[garde(length(min = 1))]
    pub plate_id: String,
    #[serde(with = "timestamp::iso")]
    #[garde(skip)]
    pub soak_time: NaiveDateTime,
}

/// Body of the `*_selected_wells` exports. The service only needs each
/// well's `_id`, but expects the whole document.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct SelectedWellsExport {
    #[garde(length(min = 1))]
    pub user: String,
    #[garde(length(min = 1))]
    pub campaign_id: String,
    #[garde(length(min = 1))]
    pub data: Vec<Well>,
}

impl SelectedWellsExport {
    #[must_use]
    pub fn new(scope: &CampaignScope, data: Vec<Well>) -> Self {
        Self {
            user: scope.user_account.clone(),
            campaign_id: scope.campaign_id.clone(),
            data,
        }
    }
}

/// A transfer status line from an Echo survey file.
#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EchoTransfer {
    #[garde(length(min = 1))]
    pub plate_id: String,
    #[garde(pattern(ECHO_POSITION))]
    pub well_echo: String,
    #[garde(length(min = 1))]
    pub transfer_status: String,
}

/// Body of `mark_soak_for_well_in_echo_done`.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct EchoWellDone {
    #[garde(length(min = 1))]
    pub user: String,
    #[garde(length(min = 1))]
    pub campaign_id: String,
    #[garde(length(min = 1))]
    pub plate_id: String,
    #[garde(pattern(ECHO_POSITION))]
    pub well_echo: String,
    #[garde(length(min = 1))]
    pub transfer_status: String,
}

impl EchoWellDone {
    #[must_use]
    pub fn new(key: &PlateKey, well_echo: &str, transfer_status: &str) -> Self {
        Self {
            user: key.user_account().to_string(),
            campaign_id: key.campaign_id().to_string(),
            plate_id: key.plate_id.clone(),
            well_echo: well_echo.to_string(),
            transfer_status: transfer_status.to_string(),
        }
    }
}

/// Body of `update_soaking_duration` and similar well-list updates.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct WellsUpdate {
    #[garde(length(min = 1))]
    pub user: String,
    #[garde(length(min = 1))]
    pub campaign_id: String,
    #[garde(skip)]
    pub wells: Vec<Well>,
}

impl WellsUpdate {
    #[must_use]
    pub fn new(scope: &CampaignScope, wells: Vec<Well>) -> Self {
        Self {
            user: scope.user_account.clone(),
            campaign_id: scope.campaign_id.clone(),
            wells,
        }
    }
}
