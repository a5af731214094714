//! `greenerp-suppliers` — supplier registry domain.

pub mod supplier;

pub use supplier::{NewSupplier, Supplier, SupplierPatch};
