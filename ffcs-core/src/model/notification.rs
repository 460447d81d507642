use bson::oid::ObjectId;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::CampaignScope;
use crate::{identifier, keyed_record, normalize::Record, timestamp, value::Document};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(rename = "_id", with = "identifier::hex")]
    pub id: ObjectId,
    #[serde(flatten)]
    pub scope: CampaignScope,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, with = "timestamp::option")]
    pub timestamp: Option<NaiveDateTime>,
    #[serde(flatten)]
    pub extra: Document,
}

impl Record for Notification {
    const TIMESTAMP_FIELDS: &'static [&'static str] = &["timestamp"];
}

keyed_record!(Notification);
