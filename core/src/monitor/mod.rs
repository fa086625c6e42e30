//! Status monitors backing the HTTP endpoints.

pub mod host;
pub mod nvme;
pub mod ping;
