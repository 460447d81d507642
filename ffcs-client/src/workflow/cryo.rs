use ffcs_core::{
    ObjectId, Value,
    model::{
        CampaignScope, PlateKey,
        status::{Stage, Transition},
        treatment::CryoRequest,
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
    /// Attaches cryoprotectant parameters to a well, leaving its cryo status
    /// `pending`.
    ///
    /// # Errors
    pub fn add_cryo(&self, request: &CryoRequest) -> Result<UpdateOutcome> {
        request.validate()?;

        let well = self.well_at(&request.target(), &request.target_well)?;
        self.guard_well(&well, Stage::Cryo, Transition::SetPending)?;

        self.update(
            &Request::new(Method::Post, "/add_cryo/").json(request)?,
            UpdateShape::Counts,
        )
    }

    /// # Errors
    pub fn remove_cryo_from_well(&self, well_id: ObjectId) -> Result<UpdateOutcome> {
        let well = self.get_one_well(well_id)?;
        self.guard_well(&well, Stage::Cryo, Transition::Clear)?;

        self.update(
            &Request::new(Method::Patch, format!("/remove_cryo_from_well/{}", well_id.to_hex())),
            UpdateShape::Counts,
        )
    }

    /// Exports the cryoprotected wells of a plate and flags the plate.
    ///
    /// # Errors
    /// [`Error::State`](crate::Error::State) if no well carries cryoprotectant
    /// or one that does is already exported.
    pub fn export_cryo_to_soak(&self, key: &PlateKey) -> Result<UpdateOutcome> {
        self.export_plate(key, Stage::Cryo, "/export_cryo_to_soak/")
    }

    /// # Errors
    pub fn export_cryo_to_soak_selected_wells(&self, scope: &CampaignScope, wells: &[ObjectId]) -> Result<Value> {
        self.export_selected(scope, wells, Stage::Cryo, "/export_cryo_to_soak_selected_wells/")
    }
}
