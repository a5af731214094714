//! Declarative permission table.
//!
//! One table maps each gated operation to the roles allowed to perform it,
//! and one function consults it. Routes never compare role strings ad hoc.

use thiserror::Error;

use crate::Role;

/// Operations gated by role.
///
/// Plain reads (list/get of items, suppliers, orders) are open to any
/// authenticated role and therefore have no entry here.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Create or update a catalog item.
    CatalogWrite,
    /// Delete a catalog item.
    CatalogDelete,
    /// Create or update a supplier.
    SupplierWrite,
    /// Delete a supplier.
    SupplierDelete,
    /// Create a purchase order or update its status.
    OrderWrite,
    /// Read the reporting endpoints.
    ReportRead,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::CatalogWrite => "catalog.write",
            Operation::CatalogDelete => "catalog.delete",
            Operation::SupplierWrite => "suppliers.write",
            Operation::SupplierDelete => "suppliers.delete",
            Operation::OrderWrite => "orders.write",
            Operation::ReportRead => "reports.read",
        }
    }
}

impl core::fmt::Display for Operation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The roles allowed to perform an operation.
pub fn allowed_roles(operation: Operation) -> &'static [Role] {
    use Role::*;
    match operation {
        Operation::CatalogWrite => &[Admin, ProcurementManager],
        Operation::CatalogDelete => &[Admin],
        Operation::SupplierWrite => &[Admin, ProcurementManager],
        Operation::SupplierDelete => &[Admin],
        Operation::OrderWrite => &[Admin, ProcurementManager],
        Operation::ReportRead => &[Admin, SustainabilityManager],
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("role '{role}' is not permitted to perform '{operation}'")]
    Forbidden {
        role: &'static str,
        operation: &'static str,
    },
}

/// Authorize a role for an operation.
///
/// - No IO
/// - No panics
/// - Pure policy check against the table above
pub fn authorize(role: Role, operation: Operation) -> Result<(), AuthzError> {
    if allowed_roles(operation).contains(&role) {
        Ok(())
    } else {
        Err(AuthzError::Forbidden {
            role: role.as_str(),
            operation: operation.as_str(),
        })
    }
}
