//! License key issuance and activation

pub mod keygen;
pub mod store;

pub use keygen::{generate, is_well_formed};
pub use store::LicenseStore;
