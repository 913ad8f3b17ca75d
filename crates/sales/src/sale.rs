use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use marketstat_core::{DomainError, DomainResult, Entity, ProductId, SaleId};

/// A persisted sale. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    pub id: SaleId,
    pub product_id: ProductId,
    pub quantity: i64,
    pub sale_date: DateTime<Utc>,
}

impl Entity for Sale {
    type Id = SaleId;

    const KIND: &'static str = "Sale";

    fn id(&self) -> SaleId {
        self.id
    }
}

/// Input for recording a sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSale {
    pub product_id: ProductId,
    pub quantity: i64,
    /// Defaults to the creation time when absent. A timestamp without an
    /// offset is read as UTC.
    #[serde(default, deserialize_with = "deserialize_sale_date")]
    pub sale_date: Option<DateTime<Utc>>,
}

const NAIVE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Parse an RFC 3339 timestamp, or a naive ISO 8601 one taken to be UTC.
pub fn parse_sale_date(raw: &str) -> DomainResult<DateTime<Utc>> {
    if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
        return Ok(t.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, NAIVE_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| DomainError::validation(format!("invalid sale_date {raw:?}: {e}")))
}

fn deserialize_sale_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|raw| parse_sale_date(&raw).map_err(<D::Error as serde::de::Error>::custom))
        .transpose()
}

impl NewSale {
    pub fn validate(&self) -> DomainResult<()> {
        if self.quantity <= 0 {
            return Err(DomainError::validation("quantity must be a positive integer"));
        }
        Ok(())
    }

    /// The effective sale date, falling back to `now`.
    pub fn sale_date_or(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.sale_date.unwrap_or(now)
    }
}
