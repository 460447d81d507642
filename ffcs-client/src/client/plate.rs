use ffcs_core::{
    Cursor, Value,
    model::{
        CampaignScope, PlateKey,
        plate::{NewPlate, Plate, PlateDone},
        summary::{PlateWellSummary, UsageTotal},
    },
    outcome::{InsertOutcome, InsertShape},
};

use super::{Client, bool_field, campaign_path, scoped_query, segment, take_field};
use crate::{
    error::Result,
    transport::{Method, Request, Transport},
};

impl<T: Transport> Client<T> {
    /// # Errors
    pub fn get_plate(&self, key: &PlateKey) -> Result<Plate> {
        let path = format!(
            "{}/{}",
            campaign_path("/get_plate", &key.scope),
            segment(&key.plate_id)
        );

        self.one(&Request::get(path))
    }

    /// # Errors
    pub fn get_plates(&self, scope: &CampaignScope) -> Result<Cursor<Plate>> {
        self.cursor(&Request::get(campaign_path("/get_plates", scope)))
    }

    /// # Errors
    pub fn get_campaigns(&self, user_account: &str) -> Result<Vec<String>> {
        let payload = self.exchange(&Request::get(format!(
            "/get_campaigns/{}",
            segment(user_account)
        )))?;

        Ok(serde_json::from_value(payload)?)
    }

    /// # Errors
    pub fn add_plate(&self, plate: &NewPlate) -> Result<InsertOutcome> {
        self.insert("/add_plate/", plate, InsertShape::Acknowledged)
    }

    /// # Errors
    pub fn is_plate_in_database(&self, plate_id: &str) -> Result<bool> {
        let payload = self.exchange(&Request::get(format!(
            "/is_plate_in_database/{}",
            segment(plate_id)
        )))?;

        bool_field(&payload, "exists")
    }

    /// Plates of a user that have not yet been picked for a campaign step.
    ///
    /// # Errors
    pub fn get_unselected_plates(&self, user_account: &str) -> Result<Vec<Plate>> {
        self.many(&Request::get(format!(
            "/get_unselected_plates/{}",
            segment(user_account)
        )))
    }

    /// # Errors
    pub fn mark_plate_done(&self, done: &PlateDone) -> Result<Value> {
        let payload = self.write(Method::Put, "/mark_plate_done", done)?;

        Ok(Value::from(take_field(payload, "Result")?))
    }

    /// Plates with wells waiting to be soaked.
    ///
    /// # Errors
    pub fn get_id_of_plates_to_soak(&self, scope: &CampaignScope) -> Result<Vec<PlateWellSummary>> {
        self.many(&scoped_query("/get_id_of_plates_to_soak/", scope))
    }

    /// # Errors
    pub fn get_id_of_plates_to_cryo_soak(&self, scope: &CampaignScope) -> Result<Vec<PlateWellSummary>> {
        self.many(&scoped_query("/get_id_of_plates_to_cryo_soak/", scope))
    }

    /// # Errors
    pub fn get_id_of_plates_for_redesolve(
        &self,
        scope: &CampaignScope,
    ) -> Result<Vec<PlateWellSummary>> {
        self.many(&scoped_query("/get_id_of_plates_for_redesolve/", scope))
    }

    /// Volume drawn per cryoprotectant source well.
    ///
    /// # Errors
    pub fn get_cryo_usage(&self, scope: &CampaignScope) -> Result<Vec<UsageTotal>> {
        self.many(&Request::get(campaign_path("/get_cryo_usage", scope)))
    }

    /// Volume drawn per redesolve solvent source well.
    ///
    /// # Errors
    pub fn get_solvent_usage(&self, scope: &CampaignScope) -> Result<Vec<UsageTotal>> {
        self.many(&Request::get(campaign_path("/get_solvent_usage", scope)))
    }
}
