//! Service layer providing the resource CRUD operations on top of models.
//! - Builds Mongo criteria/sort documents from loosely-typed filters.
//! - One driver call per operation; results reshaped into view types.
//! - Provides clear error types; storage failures are logged and re-thrown.

pub mod car_service;
pub mod errors;
pub mod principal;
pub mod review_service;
pub mod user_service;

#[cfg(test)]
pub mod test_support;
