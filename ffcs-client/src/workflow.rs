//! Composite operations that advance a well through soaking, cryoprotection,
//! redesolving, fishing and fragment assignment.
//!
//! Every write here is preceded by a read of the wells it touches and a
//! check of their current status against the client's
//! [`TransitionPolicy`](ffcs_core::model::status::TransitionPolicy). A
//! refused check never reaches the service.

use ffcs_core::{
    ObjectId, Value, identifier,
    model::{
        CampaignScope, PlateKey,
        soak::{PlateExport, SelectedWellsExport},
        status::Stage,
    },
    outcome::{UpdateOutcome, UpdateShape},
    timestamp,
};
use garde::Validate;
use tracing::info;

use crate::{
    client::Client,
    error::Result,
    transport::{Method, Request, Transport},
};

mod cryo;
mod fishing;
mod fragment;
mod guard;
mod redesolve;
mod soak;

pub use fragment::FragmentChoice;

impl<T: Transport> Client<T> {
    /// Plate-scope export: every well of the plate taking part in `stage`
    /// moves to `exported` and the service sets the plate's flag for `stage`.
    fn export_plate(&self, key: &PlateKey, stage: Stage, path: &str) -> Result<UpdateOutcome> {
        key.validate()?;
        let ready = self.guard_plate_export(key, stage)?;

        let entry = PlateExport {
            plate_id: key.plate_id.clone(),
            soak_time: timestamp::now(),
        };
        entry.validate()?;

        info!(plate = %key.plate_id, %stage, ready, "exporting plate");

        self.update(
            &Request::new(Method::Post, path).json(&[entry])?,
            UpdateShape::Counts,
        )
    }

    fn export_selected(
        &self,
        scope: &CampaignScope,
        wells: &[ObjectId],
        stage: Stage,
        path: &str,
    ) -> Result<Value> {
        let wells = self.guard_selected_export(scope, wells, stage)?;

        info!(count = wells.len(), %stage, "exporting selected wells");

        let payload = self.write(Method::Post, path, &SelectedWellsExport::new(scope, wells))?;

        Ok(identifier::recursive_restore(Value::from(payload)))
    }
}
