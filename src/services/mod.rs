//! Business logic services.
//!
//! Services hold the registry and recorder logic, separated from HTTP
//! handlers. They validate input, talk to the store traits and log state
//! changes.

pub mod facility_service;
pub mod keyfob_service;
pub mod scan_service;
pub mod test_data_service;
