use ffcs_core::{
    ObjectId, Value,
    model::{
        CampaignScope, PlateKey,
        status::{Stage, Transition},
        treatment::RedesolveRequest,
    },
    outcome::{UpdateOutcome, UpdateShape},
};
use garde::Validate;

use crate::{
    client::Client,
    error::Result,
    transport::{Method, Request, Transport},
};

impl<T: Transport> Client<T> {
    /// Schedules a well to be redissolved in a new solvent.
    ///
    /// # Errors
    pub fn redesolve_in_new_solvent(&self, request: &RedesolveRequest) -> Result<UpdateOutcome> {
        request.validate()?;

        let well = self.well_at(&request.target(), &request.target_well)?;
        self.guard_well(&well, Stage::Redesolve, Transition::SetPending)?;

        self.update(
            &Request::new(Method::Patch, "/redesolve_in_new_solvent/").json(request)?,
            UpdateShape::Counts,
        )
    }

    /// # Errors
    pub fn remove_new_solvent_from_well(&self, well_id: ObjectId) -> Result<UpdateOutcome> {
        let well = self.get_one_well(well_id)?;
        self.guard_well(&well, Stage::Redesolve, Transition::Clear)?;

        self.update(
            &Request::new(
                Method::Patch,
                format!("/remove_new_solvent_from_well/{}", well_id.to_hex()),
            ),
            UpdateShape::Counts,
        )
    }

    /// # Errors
    pub fn export_redesolve_to_soak(&self, key: &PlateKey) -> Result<UpdateOutcome> {
        self.export_plate(key, Stage::Redesolve, "/export_redesolve_to_soak/")
    }

    /// # Errors
    pub fn export_redesolve_to_soak_selected_wells(
        &self,
        scope: &CampaignScope,
        wells: &[ObjectId],
    ) -> Result<Value> {
        self.export_selected(
            scope,
            wells,
            Stage::Redesolve,
            "/export_redesolve_to_soak_selected_wells/",
        )
    }
}
