use garde::Validate;
use serde::{Deserialize, Serialize};

pub mod fishing;
pub mod library;
pub mod notification;
pub mod plate;
pub mod soak;
pub mod status;
pub mod summary;
pub mod treatment;
pub mod well;

/// The (userAccount, campaignId) pair that scopes almost every document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CampaignScope {
    #[garde(length(min = 1))]
    pub user_account: String,
    #[garde(length(min = 1))]
    pub campaign_id: String,
}

impl CampaignScope {
    pub fn new(user_account: impl Into<String>, campaign_id: impl Into<String>) -> Self {
        Self {
            user_account: user_account.into(),
            campaign_id: campaign_id.into(),
        }
    }

    #[must_use]
    pub fn plate(&self, plate_id: impl Into<String>) -> PlateKey {
        PlateKey {
            scope: self.clone(),
            plate_id: plate_id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PlateKey {
    #[serde(flatten)]
    #[garde(dive)]
    pub scope: CampaignScope,
    #[garde(length(min = 1))]
    pub plate_id: String,
}

impl PlateKey {
    #[must_use]
    pub fn user_account(&self) -> &str {
        &self.scope.user_account
    }

    #[must_use]
    pub fn campaign_id(&self) -> &str {
        &self.scope.campaign_id
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Collection {
    Plates,
    Wells,
    Libraries,
    CampaignLibraries,
    Notifications,
}
