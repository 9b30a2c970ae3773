//! Error type shared by the user and post store ports.

use super::define_port_error;

define_port_error! {
    /// Failures raised by datastore adapters.
    pub enum StoreError {
        /// The datastore could not be reached or a connection could not be checked out.
        Connection { message: String } => "datastore connection failed: {message}",
        /// A query or mutation failed during execution.
        Query { message: String } => "datastore query failed: {message}",
        /// A uniqueness constraint rejected the write.
        Conflict { message: String } => "datastore constraint violated: {message}",
        /// A foreign key pointed at a row that no longer exists.
        MissingReference { message: String } => "referenced record missing: {message}",
    }
}

impl From<StoreError> for crate::domain::Error {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Connection { message } => {
                Self::service_unavailable(format!("datastore unavailable: {message}"))
            }
            StoreError::Query { message } => Self::internal(format!("datastore error: {message}")),
            StoreError::Conflict { message } => Self::conflict(message),
            StoreError::MissingReference { message } => Self::not_found(message),
        }
    }
}
