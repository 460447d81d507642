use ffcs_core::{
    ObjectId,
    model::{
        CampaignScope,
        library::{Library, LibrarySource, NewLibrary},
    },
    outcome::{InsertOutcome, InsertShape},
};
use serde_json::json;

use super::{Client, count_field};
use crate::{
    error::{Error, Result},
    transport::{Method, Request, Transport},
};

fn require_scope(library: &NewLibrary) -> Result<()> {
    if library.scope.is_none() {
        return Err(Error::InvalidRequest {
            message: format!("campaign library {} has no campaign", library.library_name),
        });
    }

    Ok(())
}

impl<T: Transport> Client<T> {
    /// Every global library.
    ///
    /// # Errors
    pub fn get_libraries(&self) -> Result<Vec<Library>> {
        self.many(&Request::get("/get_libraries/"))
    }

    /// # Errors
    pub fn get_campaign_libraries(&self, scope: &CampaignScope) -> Result<Vec<Library>> {
        let body = json!({
            "user": scope.user_account,
            "campaign_id": scope.campaign_id,
        });

        self.many(&Request::new(Method::Post, "/get_campaign_libraries/").json(&body)?)
    }

    /// # Errors
    pub fn get_one_library(&self, id: ObjectId) -> Result<Library> {
        self.one(&Request::get("/get_one_library/").query("library_id", id.to_hex()))
    }

    /// # Errors
    pub fn get_one_campaign_library(&self, id: ObjectId) -> Result<Library> {
        self.one(&Request::get("/get_one_campaign_library/").query("library_id", id.to_hex()))
    }

    /// # Errors
    pub fn get_library(&self, source: LibrarySource) -> Result<Library> {
        match source {
            LibrarySource::Global(id) => self.get_one_library(id),
            LibrarySource::Campaign(id) => self.get_one_campaign_library(id),
        }
    }

    /// Adds a global library.
    ///
    /// # Errors
    pub fn import_library(&self, library: &NewLibrary) -> Result<InsertOutcome> {
        self.insert("/import_library/", library, InsertShape::NestedResult)
    }

    /// # Errors
    /// [`Error::InvalidRequest`] if `library` is not scoped to a campaign.
    pub fn add_campaign_library(&self, library: &NewLibrary) -> Result<InsertOutcome> {
        require_scope(library)?;

        self.insert("/add_campaign_library/", library, InsertShape::Acknowledged)
    }

    /// Same as [`Client::add_campaign_library`] through the older endpoint.
    ///
    /// # Errors
    pub fn insert_campaign_library(&self, library: &NewLibrary) -> Result<InsertOutcome> {
        require_scope(library)?;

        self.insert("/insert_campaign_library/", library, InsertShape::Acknowledged)
    }

    /// Number of wells of a campaign that use a library.
    ///
    /// # Errors
    pub fn get_library_usage_count(&self, scope: &CampaignScope, library_id: ObjectId) -> Result<u64> {
        let request = Request::get("/get_library_usage_count/")
            .query("user", &scope.user_account)
            .query("campaign_id", &scope.campaign_id)
            .query("library_id", library_id.to_hex());

        count_field(&self.exchange(&request)?, "count")
    }

    /// Alias of [`Client::get_library_usage_count`].
    ///
    /// # Errors
    pub fn count_libraries_in_campaign(&self, scope: &CampaignScope, library_id: ObjectId) -> Result<u64> {
        self.get_library_usage_count(scope, library_id)
    }
}
