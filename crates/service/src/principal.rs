use mongodb::bson::oid::ObjectId;

use models::user::UserSummary;

/// Authenticated caller, threaded explicitly into every operation that makes
/// an authorization decision. There is no ambient "current user" state.
#[derive(Debug, Clone)]
pub struct Principal {
    pub id: ObjectId,
    pub fullname: String,
    pub is_admin: bool,
}

impl Principal {
    /// Denormalized form embedded into owned records.
    pub fn summary(&self) -> UserSummary {
        UserSummary { id: self.id.to_hex(), fullname: self.fullname.clone() }
    }
}
