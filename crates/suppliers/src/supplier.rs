use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use greenerp_core::{DomainError, DomainResult, SupplierId};

/// A supplier record.
///
/// Only the name is required; everything else is descriptive.
/// `sustainability_score` is self-reported and feeds the reporting side only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: SupplierId,
    pub name: String,
    pub contact_email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub sustainability_score: f64,
    pub certifications: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NewSupplier {
    pub name: String,
    pub contact_email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub sustainability_score: f64,
    pub certifications: Option<String>,
}

impl Supplier {
    pub fn create(new: NewSupplier, now: DateTime<Utc>) -> DomainResult<Self> {
        let name = new.name.trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("name is required"));
        }

        Ok(Self {
            id: SupplierId::new(),
            name,
            contact_email: new.contact_email,
            phone: new.phone,
            address: new.address,
            sustainability_score: new.sustainability_score,
            certifications: new.certifications,
            created_at: now,
        })
    }

    /// Apply a partial update: only fields present in the patch overwrite
    /// current values.
    pub fn apply_patch(&mut self, patch: SupplierPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(contact_email) = patch.contact_email {
            self.contact_email = Some(contact_email);
        }
        if let Some(phone) = patch.phone {
            self.phone = Some(phone);
        }
        if let Some(address) = patch.address {
            self.address = Some(address);
        }
        if let Some(score) = patch.sustainability_score {
            self.sustainability_score = score;
        }
        if let Some(certifications) = patch.certifications {
            self.certifications = Some(certifications);
        }
    }
}

/// Partial supplier update; absent fields retain their prior values.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SupplierPatch {
    pub name: Option<String>,
    pub contact_email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub sustainability_score: Option<f64>,
    pub certifications: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_supplier() -> NewSupplier {
        NewSupplier {
            name: "EcoSupply Co".to_string(),
            contact_email: Some("sales@ecosupply.example".to_string()),
            phone: None,
            address: None,
            sustainability_score: 8.5,
            certifications: Some("ISO 14001".to_string()),
        }
    }

    #[test]
    fn create_requires_name() {
        let mut new = new_supplier();
        new.name = "  ".to_string();
        assert!(Supplier::create(new, Utc::now()).is_err());
    }

    #[test]
    fn patch_overwrites_only_present_fields() {
        let mut supplier = Supplier::create(new_supplier(), Utc::now()).unwrap();

        supplier.apply_patch(SupplierPatch {
            phone: Some("+49 30 1234".to_string()),
            ..Default::default()
        });

        assert_eq!(supplier.phone.as_deref(), Some("+49 30 1234"));
        assert_eq!(supplier.name, "EcoSupply Co");
        assert_eq!(supplier.sustainability_score, 8.5);
        assert_eq!(supplier.certifications.as_deref(), Some("ISO 14001"));
    }
}
