use serde::{Deserialize, Serialize};

/// The customer and marketplace an advertisement is selected for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestContext {
    pub customer_id: String,
    pub marketplace_id: String,
}

impl RequestContext {
    pub fn new(customer_id: impl Into<String>, marketplace_id: impl Into<String>) -> Self {
        Self {
            customer_id: customer_id.into(),
            marketplace_id: marketplace_id.into(),
        }
    }

    /// A customer is recognized when the request carries a customer id.
    pub fn is_recognized(&self) -> bool {
        !self.customer_id.trim().is_empty()
    }
}
