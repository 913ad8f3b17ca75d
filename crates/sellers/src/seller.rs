use serde::{Deserialize, Serialize};

use marketstat_core::{validate_email, DomainError, DomainResult, Entity, SellerId};

/// A persisted seller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seller {
    pub id: SellerId,
    pub name: String,
    pub email: String,
}

impl Entity for Seller {
    type Id = SellerId;

    const KIND: &'static str = "Seller";

    fn id(&self) -> SellerId {
        self.id
    }
}

/// Input for creating a seller. The store assigns the id and enforces email
/// uniqueness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSeller {
    pub name: String,
    pub email: String,
}

impl NewSeller {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    /// Reject input before it reaches the store.
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("seller name must not be empty"));
        }
        validate_email(&self.email)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_seller_passes() {
        assert!(NewSeller::new("Acme", "a@x.com").validate().is_ok());
    }

    #[test]
    fn blank_name_is_rejected() {
        let err = NewSeller::new("   ", "a@x.com").validate().unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn malformed_email_is_rejected() {
        let err = NewSeller::new("Acme", "not-an-email").validate().unwrap_err();
        assert_eq!(err, DomainError::validation("Invalid email format"));
    }

    #[test]
    fn seller_serializes_with_plain_id() {
        let seller = Seller {
            id: SellerId::from_i64(3),
            name: "Acme".into(),
            email: "a@x.com".into(),
        };
        let json = serde_json::to_value(&seller).unwrap();
        assert_eq!(json, serde_json::json!({"id": 3, "name": "Acme", "email": "a@x.com"}));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: a non-blank name with a well-formed email always validates.
            #[test]
            fn well_formed_input_validates(
                name in "[A-Za-z][A-Za-z0-9 ]{0,40}",
                local in "[a-z0-9]{1,12}",
                domain in "[a-z]{1,12}",
            ) {
                let seller = NewSeller::new(name, format!("{local}@{domain}.com"));
                prop_assert!(seller.validate().is_ok());
            }
        }
    }
}
