use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("No {entity} matches {filter}")]
    NoMatch { entity: &'static str, filter: String },

    #[error("Validation failed: {0}")]
    Validation(String),
}
