use ffcs_core::{
    ObjectId, document,
    model::{
        CampaignScope, PlateKey,
        status::{Stage, Transition, WorkflowStatus},
        well::Well,
    },
};
use tracing::warn;

use crate::{
    client::Client,
    error::{Error, Result},
    transport::Transport,
};

/// Whether a plate-scope export of `stage` concerns `well` at all.
fn takes_part(well: &Well, stage: Stage) -> bool {
    match stage {
        Stage::Soak => true,
        Stage::Cryo => well.cryo_protection,
        Stage::Redesolve => well.redesolve_applied,
    }
}

pub(super) fn require_scope(well: &Well, scope: &CampaignScope) -> Result<()> {
    if &well.key.scope == scope {
        return Ok(());
    }

    warn!(well = %well.id, campaign = well.key.campaign_id(), "well outside campaign");

    Err(Error::state(
        "well",
        format!(
            "{} belongs to {}/{}, not {}/{}",
            well.id,
            well.key.user_account(),
            well.key.campaign_id(),
            scope.user_account,
            scope.campaign_id
        ),
    ))
}

impl<T: Transport> Client<T> {
    /// The status `well` lands in after `transition`.
    ///
    /// # Errors
    /// [`Error::State`] if the policy refuses the move.
    pub(crate) fn guard_well(
        &self,
        well: &Well,
        stage: Stage,
        transition: Transition,
    ) -> Result<Option<WorkflowStatus>> {
        self.policy()
            .check(stage, well.status(stage), transition)
            .map_err(|err| {
                warn!(
                    well = %well.id,
                    plate = %well.key.plate_id,
                    label = %well.well,
                    %stage,
                    %transition,
                    "refusing transition"
                );

                Error::state(
                    "well",
                    format!("{} on plate {}: {err}", well.well, well.key.plate_id),
                )
            })
    }

    /// Number of wells on the plate that the export would move.
    ///
    /// The service moves every well of the plate that takes part in `stage`,
    /// so one such well the policy would not move refuses the whole export.
    pub(crate) fn guard_plate_export(&self, key: &PlateKey, stage: Stage) -> Result<usize> {
        let wells = self.get_wells_from_plate(key, &document! {})?;
        let taking_part: Vec<&Well> = wells
            .original()
            .iter()
            .filter(|well| takes_part(well, stage))
            .collect();

        if taking_part.is_empty() {
            warn!(plate = %key.plate_id, %stage, "no well takes part in export");

            return Err(Error::state(
                "plate",
                format!("plate {} has no well ready for {stage} export", key.plate_id),
            ));
        }

        for well in &taking_part {
            if let Err(err) = self.policy().check(stage, well.status(stage), Transition::Export) {
                warn!(plate = %key.plate_id, label = %well.well, %stage, "well blocks plate export");

                return Err(Error::state(
                    "plate",
                    format!("plate {} cannot be exported: {} {err}", key.plate_id, well.well),
                ));
            }
        }

        Ok(taking_part.len())
    }

    /// Re-reads each selected well and checks it may be exported.
    pub(crate) fn guard_selected_export(
        &self,
        scope: &CampaignScope,
        ids: &[ObjectId],
        stage: Stage,
    ) -> Result<Vec<Well>> {
        if ids.is_empty() {
            return Err(Error::InvalidRequest {
                message: "no wells selected".to_string(),
            });
        }

        ids.iter()
            .map(|&id| {
                let well = self.get_one_well(id)?;
                require_scope(&well, scope)?;
                self.guard_well(&well, stage, Transition::Export)?;

                Ok(well)
            })
            .collect()
    }

    /// The well of a plate at a plate position.
    pub(crate) fn well_at(&self, key: &PlateKey, label: &str) -> Result<Well> {
        self.find_well(key, "well", label, |well| well.well.as_str())
    }

    /// The well of a plate at an Echo position.
    pub(crate) fn well_at_echo(&self, key: &PlateKey, well_echo: &str) -> Result<Well> {
        self.find_well(key, "wellEcho", well_echo, Well::echo_position)
    }

    fn find_well(
        &self,
        key: &PlateKey,
        field: &str,
        label: &str,
        position: impl Fn(&Well) -> &str,
    ) -> Result<Well> {
        let mut wells = self.get_wells_from_plate(key, &document! { field => label })?;

        wells.find(|well| position(well) == label).ok_or_else(|| {
            warn!(plate = %key.plate_id, label, "no such well");

            Error::state("well", format!("no well {label} on plate {}", key.plate_id))
        })
    }
}
