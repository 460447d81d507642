use ffcs_core::{
    ObjectId, Value, document,
    model::{
        CampaignScope, PlateKey,
        soak::{EchoTransfer, EchoWellDone},
        status::{Stage, Transition},
    },
    outcome::{UpdateOutcome, UpdateShape},
};
use garde::Validate;
use itertools::Itertools;
use tracing::info;

use crate::{
    client::{Client, take_field},
    error::{Error, Result},
    transport::{Method, Request, Transport},
};

impl<T: Transport> Client<T> {
    /// Marks every well of a plate as exported to the Echo.
    ///
    /// # Errors
    /// [`Error::State`] if the plate has no wells or one of them is already
    /// past export.
    pub fn export_to_soak(&self, key: &PlateKey) -> Result<UpdateOutcome> {
        self.export_plate(key, Stage::Soak, "/export_to_soak/")
    }

    /// # Errors
    /// [`Error::State`] if any selected well is outside `scope` or already
    /// past export.
    pub fn export_to_soak_selected_wells(&self, scope: &CampaignScope, wells: &[ObjectId]) -> Result<Value> {
        self.export_selected(scope, wells, Stage::Soak, "/export_to_soak_selected_wells/")
    }

    /// Records the transfer status lines of an Echo survey. Each line must
    /// name an exported well of `scope`.
    ///
    /// # Errors
    pub fn import_soaking_results(&self, scope: &CampaignScope, transfers: &[EchoTransfer]) -> Result<Value> {
        if transfers.is_empty() {
            return Err(Error::InvalidRequest {
                message: "no transfers to import".to_string(),
            });
        }
        for transfer in transfers {
            transfer.validate()?;
        }

        for plate_id in transfers.iter().map(|t| t.plate_id.as_str()).unique() {
            let key = scope.plate(plate_id);
            let wells = self.get_wells_from_plate(&key, &document! {})?;

            for transfer in transfers.iter().filter(|t| t.plate_id == plate_id) {
                let well = wells
                    .original()
                    .iter()
                    .find(|well| well.echo_position() == transfer.well_echo)
                    .ok_or_else(|| {
                        Error::state(
                            "well",
                            format!("no well at Echo position {} on plate {plate_id}", transfer.well_echo),
                        )
                    })?;
                self.guard_well(well, Stage::Soak, Transition::Complete)?;
            }
        }

        info!(count = transfers.len(), "importing soaking results");

        let payload = self.exchange(&Request::new(Method::Post, "/import_soaking_results/").json(&transfers)?)?;

        Ok(Value::from(take_field(payload, "result")?))
    }

    /// Confirms the Echo transfer of one well.
    ///
    /// # Errors
    pub fn mark_soak_for_well_in_echo_done(
        &self,
        key: &PlateKey,
        well_echo: &str,
        transfer_status: &str,
    ) -> Result<UpdateOutcome> {
        let done = EchoWellDone::new(key, well_echo, transfer_status);
        done.validate()?;

        let well = self.well_at_echo(key, well_echo)?;
        self.guard_well(&well, Stage::Soak, Transition::Complete)?;

        self.update(
            &Request::new(Method::Post, "/mark_soak_for_well_in_echo_done/").json(&done)?,
            UpdateShape::Counts,
        )
    }
}
