//! Static checks run before any specification leaves the crate.
pub mod references;
pub mod topology;
