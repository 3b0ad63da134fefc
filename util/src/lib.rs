//! Shared plumbing for the marksheet workspace: configuration, storage paths,
//! the report store collaborator and test helpers.

pub mod config;
pub mod paths;
pub mod report_store;
pub mod test_helpers;
