use ffcs_core::{
    ObjectId, Value,
    model::{CampaignScope, Collection, treatment::ObjectUpdate},
    normalize::serialize_document,
    value::Document,
};

use super::{Client, segment};
use crate::{
    error::Result,
    transport::{Method, Request, Transport},
};

impl<T: Transport> Client<T> {
    /// Asks the service whether it can reach its database.
    ///
    /// # Errors
    /// Any failure to get an answer is returned, never folded into `false`.
    pub fn check_if_db_connected(&self) -> Result<Value> {
        self.untyped(&Request::get("/check_if_db_connected"))
    }

    /// # Errors
    pub fn delete_by_id(&self, collection: Collection, id: ObjectId) -> Result<Value> {
        let path = format!("/delete_by_id/{collection}/{}", id.to_hex());

        self.untyped(&Request::new(Method::Delete, path))
    }

    /// # Errors
    pub fn delete_by_query(&self, collection: Collection, query: &Document) -> Result<Value> {
        let request = Request::new(Method::Post, format!("/delete_by_query/{collection}"))
            .json(&serialize_document(query))?;

        self.untyped(&request)
    }

    /// Sets `fields` on one document. Timestamps and identifiers in `fields`
    /// are lowered to their wire form.
    ///
    /// # Errors
    pub fn update_by_object_id(
        &self,
        scope: &CampaignScope,
        collection: Collection,
        id: ObjectId,
        fields: Document,
    ) -> Result<Value> {
        let update = ObjectUpdate {
            user_account: scope.user_account.clone(),
            campaign_id: scope.campaign_id.clone(),
            collection,
            doc_id: id,
            kwargs: fields,
        };

        self.write(Method::Put, "/update_by_object_id", &update)
            .map(|payload| ffcs_core::identifier::recursive_restore(Value::from(payload)))
    }

    /// The owner of a plate, as `{"user": ..., "campaign_id": ...}`.
    ///
    /// # Errors
    pub fn find_user_from_plate_id(&self, plate_id: &str) -> Result<Value> {
        self.untyped(&Request::get(format!(
            "/find_user_from_plate_id/{}",
            segment(plate_id)
        )))
    }
}
