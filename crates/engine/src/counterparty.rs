use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The other side of an invoice or payment.
///
/// Stored as two nullable soft references (`customer_id`, `supplier_id`);
/// exactly one of them is set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Counterparty {
    Customer(Uuid),
    Supplier(Uuid),
}

impl Counterparty {
    #[must_use]
    pub fn customer_id(self) -> Option<Uuid> {
        match self {
            Self::Customer(id) => Some(id),
            Self::Supplier(_) => None,
        }
    }

    #[must_use]
    pub fn supplier_id(self) -> Option<Uuid> {
        match self {
            Self::Supplier(id) => Some(id),
            Self::Customer(_) => None,
        }
    }

    #[must_use]
    pub fn id(self) -> Uuid {
        match self {
            Self::Customer(id) | Self::Supplier(id) => id,
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            Self::Customer(_) => "customer",
            Self::Supplier(_) => "supplier",
        }
    }
}
