use chrono::NaiveDateTime;
use ffcs_core::{
    Cursor,
    model::{CampaignScope, notification::Notification},
    outcome::{InsertOutcome, InsertShape},
    timestamp,
};

use super::{Client, campaign_path, segment};
use crate::{
    error::Result,
    transport::{Method, Request, Transport},
};

impl<T: Transport> Client<T> {
    /// # Errors
    pub fn send_notification(&self, scope: &CampaignScope, kind: &str) -> Result<InsertOutcome> {
        let path = format!("{}/{}", campaign_path("/send_notification", scope), segment(kind));
        let payload = self.exchange(&Request::new(Method::Post, path))?;

        Ok(InsertOutcome::from_payload(&payload, InsertShape::Status)?)
    }

    /// Notifications of a campaign created after `since`.
    ///
    /// # Errors
    pub fn get_notifications(&self, scope: &CampaignScope, since: NaiveDateTime) -> Result<Cursor<Notification>> {
        let path = format!(
            "{}/{}",
            campaign_path("/get_notifications", scope),
            segment(&timestamp::format(&since))
        );
        let notifications = self.many_under(&Request::get(path), "notifications")?;

        Ok(Cursor::new(notifications))
    }
}
