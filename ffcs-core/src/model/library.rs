use bson::oid::ObjectId;
use garde::Validate;
use serde::{Deserialize, Serialize};

use super::{CampaignScope, Collection, well::Concentration};
use crate::{identifier, normalize::Record, value::Document};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Fragment {
    #[garde(length(min = 1))]
    pub compound_code: String,
    #[garde(skip)]
    pub smiles: String,
    #[garde(length(min = 1))]
    pub well: String,
    #[garde(skip)]
    #[serde(default)]
    pub used: bool,
    #[garde(skip)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub library_concentration: Option<Concentration>,
    #[garde(skip)]
    #[serde(flatten)]
    pub extra: Document,
}

impl Fragment {
    #[must_use]
    pub fn new(compound_code: &str, smiles: &str, well: &str) -> Self {
        Self {
            compound_code: compound_code.to_string(),
            smiles: smiles.to_string(),
            well: well.to_string(),
            used: false,
            library_concentration: None,
            extra: Document::new(),
        }
    }
}

/// A fragment library. Global libraries have no scope; campaign libraries
/// belong to one user and campaign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Library {
    #[serde(rename = "_id", with = "identifier::hex")]
    pub id: ObjectId,
    #[serde(flatten)]
    pub scope: Option<CampaignScope>,
    pub library_name: String,
    #[serde(default)]
    pub library_barcode: Option<String>,
    #[serde(default)]
    pub fragments: Vec<Fragment>,
}

impl Record for Library {
    const TIMESTAMP_FIELDS: &'static [&'static str] = &[];
}

impl Library {
    #[must_use]
    pub fn collection(&self) -> Collection {
        if self.scope.is_some() {
            Collection::CampaignLibraries
        } else {
            Collection::Libraries
        }
    }

    #[must_use]
    pub fn fragment_position(&self, compound_code: &str, well: &str) -> Option<usize> {
        self.fragments
            .iter()
            .position(|f| f.compound_code == compound_code && f.well == well)
    }
}

/// Where a library lives: the shared collection or a campaign's own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibrarySource {
    Global(ObjectId),
    Campaign(ObjectId),
}

impl LibrarySource {
    #[must_use]
    pub fn id(self) -> ObjectId {
        match self {
            Self::Global(id) | Self::Campaign(id) => id,
        }
    }

    #[must_use]
    pub fn collection(self) -> Collection {
        match self {
            Self::Global(_) => Collection::Libraries,
            Self::Campaign(_) => Collection::CampaignLibraries,
        }
    }
}

#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewLibrary {
    #[garde(dive)]
    #[serde(flatten)]
    pub scope: Option<CampaignScope>,
    #[garde(length(min = 1))]
    pub library_name: String,
    #[garde(skip)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub library_barcode: Option<String>,
    #[garde(length(min = 1), dive)]
    pub fragments: Vec<Fragment>,
}

/// The library fields copied onto a well when one of its fragments is assigned.
#[derive(Debug, Clone, Serialize)]
pub struct LibraryReference {
    #[serde(rename = "_id", with = "identifier::hex")]
    pub id: ObjectId,
    #[serde(rename = "libraryName")]
    pub name: String,
    #[serde(rename = "libraryBarcode")]
    pub barcode: Option<String>,
}

impl From<&Library> for LibraryReference {
    fn from(library: &Library) -> Self {
        Self {
            id: library.id,
            name: library.library_name.clone(),
            barcode: library.library_barcode.clone(),
        }
    }
}
