use ffcs_core::{
    Cursor, ObjectId, Value,
    model::{
        CampaignScope, PlateKey,
        soak::WellsUpdate,
        treatment::NotesUpdate,
        well::{NewWell, Well},
    },
    normalize::serialize,
    outcome::{InsertOutcome, InsertShape, UpdateOutcome, UpdateShape},
    value::Document,
};
use garde::Validate;
use serde_json::json;

use super::{Client, bool_field, campaign_path, count_field, field, scoped_query, segment};
use crate::{
    error::Result,
    transport::{Method, Request, Transport},
};

/// Query strings carry scalars as text.
fn query_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => match serialize(other) {
            serde_json::Value::String(s) => s,
            json => json.to_string(),
        },
    }
}

impl<T: Transport> Client<T> {
    /// # Errors
    pub fn add_well(&self, well: &NewWell) -> Result<InsertOutcome> {
        self.insert("/add_well/", well, InsertShape::Acknowledged)
    }

    /// Inserts many wells at once. The service acknowledges with nothing.
    ///
    /// # Errors
    /// Every well is validated before the single request is sent.
    pub fn add_wells(&self, wells: &[NewWell]) -> Result<()> {
        for well in wells {
            well.validate()?;
        }

        self.exchange(&Request::new(Method::Post, "/add_wells/").json(&wells)?)?;

        Ok(())
    }

    /// # Errors
    pub fn get_all_wells(&self, scope: &CampaignScope) -> Result<Cursor<Well>> {
        self.cursor(&scoped_query("/get_all_wells/", scope))
    }

    /// Wells of one plate, optionally narrowed by equality on further fields.
    ///
    /// # Errors
    pub fn get_wells_from_plate(&self, key: &PlateKey, filters: &Document) -> Result<Cursor<Well>> {
        let request = filters.iter().fold(
            scoped_query("/get_wells_from_plate/", &key.scope).query("plate_id", &key.plate_id),
            |request, (name, value)| request.query(name, query_value(value)),
        );

        self.cursor(&request)
    }

    /// # Errors
    pub fn get_one_well(&self, id: ObjectId) -> Result<Well> {
        self.one(&Request::get("/get_one_well/").query("well_id", id.to_hex()))
    }

    /// The SMILES of the fragment soaked into the crystal named `xtal_name`.
    ///
    /// # Errors
    pub fn get_smiles(&self, scope: &CampaignScope, xtal_name: &str) -> Result<Option<String>> {
        let payload = self.exchange(&scoped_query("/get_smiles/", scope).query("xtal_name", xtal_name))?;

        Ok(field(&payload, "smiles")?.as_str().map(str::to_string))
    }

    /// Wells carrying a compound but no cryoprotection match.
    ///
    /// # Errors
    pub fn get_not_matched_wells(&self, scope: &CampaignScope) -> Result<Vec<Well>> {
        self.many(&scoped_query("/get_not_matched_wells/", scope))
    }

    /// # Errors
    pub fn update_notes(&self, scope: &CampaignScope, well_id: ObjectId, note: &str) -> Result<Value> {
        let update = NotesUpdate {
            user: scope.user_account.clone(),
            campaign_id: scope.campaign_id.clone(),
            doc_id: well_id,
            note: note.to_string(),
        };

        self.write(Method::Patch, "/update_notes/", &update)
            .map(|payload| ffcs_core::identifier::recursive_restore(Value::from(payload)))
    }

    /// # Errors
    pub fn get_soaked_wells(&self, scope: &CampaignScope) -> Result<Vec<Well>> {
        self.many_under(&Request::get(campaign_path("/get_soaked_wells", scope)), "result")
    }

    /// # Errors
    pub fn get_number_of_unsoaked_wells(&self, scope: &CampaignScope) -> Result<u64> {
        let payload = self.exchange(&Request::get(campaign_path(
            "/get_number_of_unsoaked_wells",
            scope,
        )))?;

        count_field(&payload, "number_of_unsoaked_wells")
    }

    /// Stores the refreshed `soakDuration` of each well.
    ///
    /// # Errors
    pub fn update_soaking_duration(&self, scope: &CampaignScope, wells: Vec<Well>) -> Result<UpdateOutcome> {
        let body = WellsUpdate::new(scope, wells);
        body.validate()?;

        self.update(
            &Request::new(Method::Put, "/update_soaking_duration").json(&body)?,
            UpdateShape::Legacy,
        )
    }

    /// # Errors
    pub fn get_all_fished_wells(&self, scope: &CampaignScope) -> Result<Vec<Well>> {
        self.many_under(
            &Request::get(campaign_path("/get_all_fished_wells", scope)),
            "fished_wells",
        )
    }

    /// # Errors
    pub fn get_all_wells_not_exported_to_datacollection_xls(
        &self,
        scope: &CampaignScope,
    ) -> Result<Vec<Well>> {
        self.many_under(
            &Request::get(campaign_path(
                "/get_all_wells_not_exported_to_datacollection_xls",
                scope,
            )),
            "wells_not_exported_to_xls",
        )
    }

    /// # Errors
    pub fn mark_exported_to_xls(&self, wells: &[Well]) -> Result<UpdateOutcome> {
        let request = Request::new(Method::Put, "/mark_exported_to_xls").json(&json!({ "wells": wells }))?;

        self.update(&request, UpdateShape::Legacy)
    }

    /// # Errors
    pub fn is_crystal_already_fished(&self, plate_id: &str, well: &str) -> Result<bool> {
        let payload = self.exchange(&Request::get(format!(
            "/is_crystal_already_fished/{}/{}",
            segment(plate_id),
            segment(well)
        )))?;

        bool_field(&payload, "result")
    }
}
