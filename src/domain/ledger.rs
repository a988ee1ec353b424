use bigdecimal::BigDecimal;

use super::order::ConfirmedOrder;

/// Session-local record of confirmed pre-orders, in confirmation order.
#[derive(Debug, Clone)]
pub struct OrderLedger {
    orders: Vec<ConfirmedOrder>,
    base_offset: BigDecimal,
}

impl OrderLedger {
    pub fn new(base_offset: BigDecimal) -> Self {
        Self {
            orders: Vec::new(),
            base_offset,
        }
    }

    pub fn push(&mut self, order: ConfirmedOrder) {
        self.orders.push(order);
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn newest_first(&self) -> impl Iterator<Item = &ConfirmedOrder> {
        self.orders.iter().rev()
    }

    /// Base offset plus every confirmed amount. Derived on each call.
    pub fn total_raised(&self) -> BigDecimal {
        self.orders
            .iter()
            .fold(self.base_offset.clone(), |acc, order| acc + order.amount())
    }
}
