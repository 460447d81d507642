use ffcs_core::{
    model::{
        CampaignScope,
        fishing::{FishingUpdate, ShifterReport},
        status::TransitionPolicy,
        well::Well,
    },
    outcome::{UpdateOutcome, UpdateShape},
};
use garde::Validate;
use itertools::Itertools;
use tracing::warn;

use crate::{
    client::{Client, campaign_path, count_field, segment},
    error::{Error, Result},
    transport::{Method, Request, Transport},
};

impl<T: Transport> Client<T> {
    fn guard_fishing(&self, report: &ShifterReport) -> Result<()> {
        report.validate()?;
        let label = report.well_label();

        if self.policy() == TransitionPolicy::Forward
            && self.is_crystal_already_fished(&report.plate_id, &label)?
        {
            warn!(plate = %report.plate_id, well = %label, "crystal already fished");

            return Err(Error::state(
                "well",
                format!("{label} on plate {} was already fished", report.plate_id),
            ));
        }

        Ok(())
    }

    /// Stamps one fishing-robot report on its well and names the crystal
    /// `{prefix}-{index}`.
    ///
    /// # Errors
    pub fn update_shifter_fishing_result(&self, update: &FishingUpdate) -> Result<UpdateOutcome> {
        update.validate()?;
        self.guard_fishing(&update.well_shifter_data)?;

        self.update(
            &Request::new(Method::Patch, "/update_shifter_fishing_result").json(update)?,
            UpdateShape::Counts,
        )
    }

    /// # Errors
    /// Every report is validated and checked before the batch is sent.
    /// Under [`TransitionPolicy::Forward`] a batch naming one well twice is
    /// refused with [`Error::State`].
    pub fn import_fishing_results(&self, reports: &[ShifterReport]) -> Result<UpdateOutcome> {
        for report in reports {
            report.validate()?;
        }

        let repeated = reports
            .iter()
            .map(|report| (report.plate_id.as_str(), report.well_label()))
            .duplicates()
            .next();
        if let (TransitionPolicy::Forward, Some((plate_id, label))) = (self.policy(), repeated) {
            warn!(plate = %plate_id, well = %label, "well fished twice in one batch");

            return Err(Error::state(
                "well",
                format!("{label} on plate {plate_id} appears more than once in the batch"),
            ));
        }

        for report in reports {
            self.guard_fishing(report)?;
        }

        self.update(
            &Request::new(Method::Post, "/import_fishing_results").json(&reports)?,
            UpdateShape::Counts,
        )
    }

    /// One more than the highest `xtal-N` crystal name on the plate, or 1,
    /// as counted by the service.
    ///
    /// # Errors
    /// [`Error::Contract`] if the reply has no `next_xtal_number`.
    pub fn get_next_xtal_number(&self, plate_id: &str) -> Result<u32> {
        let payload = self.exchange(&Request::get(format!("/get_next_xtal_number/{}", segment(plate_id))))?;
        let next = count_field(&payload, "next_xtal_number")?;

        u32::try_from(next).map_err(|_| Error::Format {
            field: "next_xtal_number".to_string(),
            value: next.to_string(),
            expected: "a crystal number".to_string(),
        })
    }

    /// The fished well of a campaign that left the robot last.
    ///
    /// # Errors
    pub fn find_last_fished_xtal(&self, scope: &CampaignScope) -> Result<Option<Well>> {
        let fished: Vec<Well> =
            self.many_under(&Request::get(campaign_path("/find_last_fished_xtal", scope)), "result")?;

        Ok(fished
            .into_iter()
            .filter(|well| well.shifter_time_of_departure.is_some())
            .max_by_key(|well| well.shifter_time_of_departure))
    }
}
