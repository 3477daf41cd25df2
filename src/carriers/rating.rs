use super::domain::{
    Carrier, DeliveryType, OrderMetrics, PriceRule, RateQuote, RuleOperator, SaleOrder,
};

/// Errors raised by base rate computation.
#[derive(Debug, thiserror::Error)]
pub enum RateError {
    #[error("carrier does not deliver to the order's shipping address")]
    NotAvailableForAddress,
    #[error("no price rule matching this order; delivery cost cannot be computed")]
    NoMatchingPriceRule,
    #[error("delivery type '{0}' has no base rate computation")]
    UnsupportedDeliveryType(&'static str),
}

/// Capability seam for base price computation.
pub trait RateQuoter: Send + Sync {
    fn rate(&self, carrier: &Carrier, order: &SaleOrder) -> Result<RateQuote, RateError>;
}

/// Standard quoter dispatching on the carrier's pricing engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardRateQuoter;

impl RateQuoter for StandardRateQuoter {
    fn rate(&self, carrier: &Carrier, order: &SaleOrder) -> Result<RateQuote, RateError> {
        match carrier.delivery_type {
            DeliveryType::Fixed => Ok(RateQuote {
                carrier: carrier.id,
                price: carrier.fixed_price,
            }),
            DeliveryType::BaseOnRule => {
                let price = first_matching_rule_price(&carrier.price_rules, &order.metrics)
                    .ok_or(RateError::NoMatchingPriceRule)?;
                Ok(RateQuote {
                    carrier: carrier.id,
                    price,
                })
            }
            // Grid carriers have no pricing of their own; they are rated
            // through the destination router.
            DeliveryType::BaseOnDestination => Err(RateError::UnsupportedDeliveryType(
                carrier.delivery_type.label(),
            )),
        }
    }
}

/// First rule whose condition accepts the order wins; rules are evaluated in
/// their stored order.
pub(crate) fn first_matching_rule_price(
    rules: &[PriceRule],
    metrics: &OrderMetrics,
) -> Option<f64> {
    rules
        .iter()
        .find(|rule| rule.condition_holds(metrics))
        .map(|rule| rule.price_for(metrics))
}

impl PriceRule {
    fn condition_holds(&self, metrics: &OrderMetrics) -> bool {
        let value = metrics.value_for(self.variable);
        match self.operator {
            RuleOperator::Eq => value == self.threshold,
            RuleOperator::Le => value <= self.threshold,
            RuleOperator::Lt => value < self.threshold,
            RuleOperator::Ge => value >= self.threshold,
            RuleOperator::Gt => value > self.threshold,
        }
    }

    fn price_for(&self, metrics: &OrderMetrics) -> f64 {
        self.base_price + self.factor * metrics.value_for(self.factor_variable)
    }
}
