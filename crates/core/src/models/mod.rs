pub mod account;
pub mod category;
pub mod expense;
pub mod family;
pub mod goals;
pub mod settings;
pub mod snapshot;
pub mod summary;

/// Short random identifier for members, suggestions and snapshots.
pub(crate) fn short_id() -> String {
    let mut id = uuid::Uuid::new_v4().simple().to_string();
    id.truncate(8);
    id
}
