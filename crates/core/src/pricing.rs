use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::domain::order::{OrderDraft, OrderItem, OrderRequest};
use crate::domain::product::{Product, ProductId};
use crate::errors::ValidationError;

/// How requested quantities below one are treated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantityPolicy {
    /// Silently raise the quantity to one.
    #[default]
    Clamp,
    /// Fail the order with a validation error.
    Reject,
}

impl QuantityPolicy {
    pub fn normalize(self, product_id: ProductId, requested: i64) -> Result<u32, ValidationError> {
        let quantity = match self {
            Self::Clamp => requested.max(1),
            Self::Reject if requested < 1 => {
                return Err(ValidationError::NonPositiveQuantity { product_id, quantity: requested })
            }
            Self::Reject => requested,
        };

        u32::try_from(quantity)
            .map_err(|_| ValidationError::QuantityTooLarge { product_id, quantity: requested })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Clamp => "clamp",
            Self::Reject => "reject",
        }
    }
}

impl std::str::FromStr for QuantityPolicy {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "clamp" => Ok(Self::Clamp),
            "reject" => Ok(Self::Reject),
            other => Err(ConfigError::Validation(format!(
                "unsupported quantity policy `{other}` (expected clamp|reject)"
            ))),
        }
    }
}

pub fn order_total(items: &[OrderItem]) -> Decimal {
    items.iter().map(OrderItem::line_total).sum()
}

/// Prices an order against already-resolved products.
///
/// Lines are processed in request order and the first failing line decides
/// the error. Each item snapshots the product's current price, so the draft
/// carries everything needed to persist the order without another lookup.
pub fn price_order(
    request: &OrderRequest,
    products: &HashMap<ProductId, Product>,
    policy: QuantityPolicy,
) -> Result<OrderDraft, ValidationError> {
    let mut total = Decimal::ZERO;
    let mut items = Vec::with_capacity(request.lines.len());

    for line in &request.lines {
        let product = products
            .get(&line.product_id)
            .ok_or(ValidationError::UnknownProduct { product_id: line.product_id })?;
        let quantity = policy.normalize(product.id, line.quantity)?;

        let line_total = product
            .price
            .checked_mul(Decimal::from(quantity))
            .ok_or(ValidationError::AmountOverflow { product_id: product.id })?;
        total = total
            .checked_add(line_total)
            .ok_or(ValidationError::AmountOverflow { product_id: product.id })?;

        items.push(OrderItem { product_id: product.id, quantity, price: product.price });
    }

    Ok(OrderDraft { customer: request.customer.clone(), total, items })
}
