//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod cache_key;
mod datastore_probe;
mod post_store;
mod store_error;
mod user_cache;
mod user_store;

pub use cache_key::{UserCacheKey, UserCacheKeyValidationError};
#[cfg(test)]
pub use datastore_probe::MockDatastoreProbe;
pub use datastore_probe::DatastoreProbe;
#[cfg(test)]
pub use post_store::MockPostStore;
pub use post_store::PostStore;
pub use store_error::StoreError;
#[cfg(test)]
pub use user_cache::MockUserCache;
pub use user_cache::{NoOpUserCache, UserCache, UserCacheError};
#[cfg(test)]
pub use user_store::MockUserStore;
pub use user_store::UserStore;
