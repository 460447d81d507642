//! Request bodies that attach or change treatment parameters on one well.

use bson::oid::ObjectId;
use garde::Validate;
use serde::Serialize;

use super::{
    CampaignScope, PlateKey,
    library::{Fragment, LibraryReference},
};
use crate::{identifier, value::Document};

#[derive(Debug, Clone, Serialize, Validate)]
pub struct CryoRequest {
    #[garde(length(min = 1))]
    pub user_account: String,
    #[garde(length(min = 1))]
    pub campaign_id: String,
    #[garde(length(min = 1))]
    pub target_plate: String,
    #[garde(length(min = 1))]
    pub target_well: String,
    #[garde(range(min = 0.0))]
    pub cryo_desired_concentration: f64,
    #[garde(range(min = 0.0))]
    pub cryo_transfer_volume: f64,
    #[garde(length(min = 1))]
    pub cryo_source_well: String,
    #[garde(length(min = 1))]
    pub cryo_name: String,
    #[garde(skip)]
    pub cryo_barcode: String,
}

impl CryoRequest {
    #[must_use]
    pub fn target(&self) -> PlateKey {
        CampaignScope::new(&self.user_account, &self.campaign_id).plate(&self.target_plate)
    }
}

#[derive(Debug, Clone, Serialize, Validate)]
pub struct RedesolveRequest {
    #[garde(length(min = 1))]
    pub user_account: String,
    #[garde(length(min = 1))]
    pub campaign_id: String,
    #[garde(length(min = 1))]
    pub target_plate: String,
    #[garde(length(min = 1))]
    pub target_well: String,
    #[garde(range(min = 0.0))]
    pub redesolve_transfer_volume: f64,
    #[garde(length(min = 1))]
    pub redesolve_source_well: String,
    #[garde(length(min = 1))]
    pub redesolve_name: String,
    #[garde(skip)]
    pub redesolve_barcode: String,
}

impl RedesolveRequest {
    #[must_use]
    pub fn target(&self) -> PlateKey {
        CampaignScope::new(&self.user_account, &self.campaign_id).plate(&self.target_plate)
    }
}

/// The solvent and ligand amounts used when a fragment goes into a well.
#[derive(Debug, Clone, Copy, PartialEq, Validate)]
pub struct Dosing {
    #[garde(range(min = 0.0))]
    pub solvent_volume: f64,
    #[garde(range(min = 0.0))]
    pub ligand_transfer_volume: f64,
    #[garde(range(min = 0.0))]
    pub ligand_concentration: f64,
    #[garde(skip)]
    pub is_solvent_test: bool,
}

/// Body of `add_fragment_to_well`.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct FragmentAssignment {
    #[garde(skip)]
    pub library: LibraryReference,
    #[garde(skip)]
    #[serde(with = "identifier::hex")]
    pub well_id: ObjectId,
    #[garde(dive)]
    pub fragment: Fragment,
    #[garde(range(min = 0.0))]
    pub solvent_volume: f64,
    #[garde(range(min = 0.0))]
    pub ligand_transfer_volume: f64,
    #[garde(range(min = 0.0))]
    pub ligand_concentration: f64,
    #[garde(skip)]
    pub is_solvent_test: bool,
}

impl FragmentAssignment {
    #[must_use]
    pub fn new(library: LibraryReference, well_id: ObjectId, fragment: Fragment, dosing: Dosing) -> Self {
        let Dosing {
            solvent_volume,
            ligand_transfer_volume,
            ligand_concentration,
            is_solvent_test,
        } = dosing;

        Self {
            library,
            well_id,
            fragment,
            solvent_volume,
            ligand_transfer_volume,
            ligand_concentration,
            is_solvent_test,
        }
    }
}

#[derive(Debug, Clone, Serialize, Validate)]
pub struct NotesUpdate {
    #[garde(length(min = 1))]
    pub user: String,
    #[garde(length(min = 1))]
    pub campaign_id: String,
    #[garde(skip)]
    #[serde(with = "identifier::hex")]
    pub doc_id: ObjectId,
    #[garde(skip)]
    pub note: String,
}

/// Body of `update_by_object_id`: a generic field update on one document.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct ObjectUpdate {
    #[garde(length(min = 1))]
    pub user_account: String,
    #[garde(length(min = 1))]
    pub campaign_id: String,
    #[garde(skip)]
    pub collection: super::Collection,
    #[garde(skip)]
    #[serde(with = "identifier::hex")]
    pub doc_id: ObjectId,
    #[garde(length(min = 1))]
    pub kwargs: Document,
}
