//! Fragment assignment spans two documents: the library's fragment list and
//! the well. The service has no transaction across them, so assignment runs
//! as a saga that marks the fragment used first and takes the mark back if
//! the well write fails. Both steps touch only the chosen fragment's `used`
//! flag, leaving marks set meanwhile by other clients alone.

use ffcs_core::{
    ObjectId, document,
    model::{
        CampaignScope,
        library::{LibraryReference, LibrarySource},
        status::TransitionPolicy,
        treatment::{Dosing, FragmentAssignment, ObjectUpdate},
    },
    outcome::{UpdateOutcome, UpdateShape},
};
use garde::Validate;
use tracing::{error, info, warn};

use crate::{
    client::Client,
    error::{Error, Result},
    transport::{Method, Request, Transport},
};

/// Names one assignment so that a retry reuses the same idempotency keys.
fn saga_key(well_id: ObjectId, library_id: ObjectId, compound_code: &str) -> String {
    format!("fragment:{}:{}:{compound_code}", well_id.to_hex(), library_id.to_hex())
}

/// The fragment to put into a well, named by its library and its position
/// in that library.
#[derive(Debug, Clone, PartialEq)]
pub struct FragmentChoice {
    pub library: LibrarySource,
    pub compound_code: String,
    pub well: String,
}

impl<T: Transport> Client<T> {
    fn write_fragment_use(
        &self,
        scope: &CampaignScope,
        source: LibrarySource,
        position: usize,
        used: bool,
        key: String,
    ) -> Result<()> {
        let update = ObjectUpdate {
            user_account: scope.user_account.clone(),
            campaign_id: scope.campaign_id.clone(),
            collection: source.collection(),
            doc_id: source.id(),
            kwargs: document! { format!("fragments.{position}.used") => used },
        };
        update.validate()?;

        let request = Request::new(Method::Put, "/update_by_object_id")
            .json(&update)?
            .idempotency_key(key);
        self.exchange(&request)?;

        Ok(())
    }

    /// Assigns a library fragment to a well.
    ///
    /// # Errors
    /// [`Error::State`] if the well already carries a fragment or the library
    /// has no such fragment. [`Error::Saga`] if the well could not be written
    /// after the fragment was marked used; `compensated` tells whether the
    /// mark was taken back.
    pub fn add_fragment_to_well(
        &self,
        well_id: ObjectId,
        choice: &FragmentChoice,
        dosing: Dosing,
    ) -> Result<UpdateOutcome> {
        dosing.validate()?;

        let well = self.get_one_well(well_id)?;
        if well.library_assigned {
            warn!(well = %well_id, "well already carries a fragment");

            return Err(Error::state(
                "well",
                format!("{} on plate {} already carries a fragment", well.well, well.key.plate_id),
            ));
        }

        let library = self.get_library(choice.library)?;
        let position = library
            .fragment_position(&choice.compound_code, &choice.well)
            .ok_or_else(|| {
                Error::state(
                    "library",
                    format!(
                        "{} has no fragment {} at {}",
                        library.library_name, choice.compound_code, choice.well
                    ),
                )
            })?;

        let was_used = library.fragments[position].used;
        let mut fragment = library.fragments[position].clone();
        fragment.used = true;

        let assignment = FragmentAssignment::new(LibraryReference::from(&library), well_id, fragment, dosing);
        assignment.validate()?;

        let base = saga_key(well_id, library.id, &choice.compound_code);
        let scope = &well.key.scope;

        info!(saga = %base, "marking fragment used");
        self.write_fragment_use(scope, choice.library, position, true, format!("{base}:mark-used"))?;

        info!(saga = %base, "assigning fragment to well");
        let assigned = Request::new(Method::Post, "/add_fragment_to_well/")
            .json(&assignment)
            .and_then(|request| {
                self.update(&request.idempotency_key(format!("{base}:assign")), UpdateShape::NestedLegacy)
            });

        let err = match assigned {
            Ok(outcome) => return Ok(outcome),
            Err(err) => err,
        };

        let compensated = if was_used {
            warn!(saga = %base, error = %err, "well write failed, fragment was already used");
            true
        } else {
            warn!(saga = %base, error = %err, "well write failed, reverting fragment");
            match self.write_fragment_use(scope, choice.library, position, false, format!("{base}:revert")) {
                Ok(()) => true,
                Err(revert) => {
                    error!(saga = %base, error = %revert, "could not revert fragment use");
                    false
                }
            }
        };

        Err(Error::Saga {
            step: "assign".to_string(),
            message: err.to_string(),
            compensated,
        })
    }

    /// Clears the fragment fields of a well. The fragment stays marked used.
    ///
    /// # Errors
    /// [`Error::State`] under [`TransitionPolicy::Forward`] if the well
    /// carries no fragment.
    pub fn remove_fragment_from_well(&self, well_id: ObjectId) -> Result<UpdateOutcome> {
        let well = self.get_one_well(well_id)?;

        if !well.library_assigned && self.policy() == TransitionPolicy::Forward {
            warn!(well = %well_id, "no fragment to remove");

            return Err(Error::state(
                "well",
                format!("{} on plate {} carries no fragment", well.well, well.key.plate_id),
            ));
        }

        self.update(
            &Request::new(Method::Post, "/remove_fragment_from_well/").query("well_id", well_id.to_hex()),
            UpdateShape::NestedLegacy,
        )
    }
}
