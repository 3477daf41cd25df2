use std::sync::{Arc, Mutex};

use crate::carriers::booking::{
    BookingError, CarrierLookup, ShipmentBooker, StandardShipmentBooker,
};
use crate::carriers::dispatch::DestinationRouter;
use crate::carriers::domain::{
    Address, BookingResult, Carrier, CarrierDraft, CarrierId, CompanyId, DeliveryType,
    DestinationRule, OrderMetrics, Picking, PriceRule, RuleOperator, RuleVariable, SaleOrder,
};
use crate::carriers::matching::RuleAddressMatcher;
use crate::carriers::rating::StandardRateQuoter;
use crate::carriers::registry::CarrierRegistry;

pub(super) fn madrid() -> Address {
    Address {
        country: "ES".to_string(),
        state: Some("Madrid".to_string()),
        zip: Some("28003".to_string()),
    }
}

pub(super) fn lisbon() -> Address {
    Address {
        country: "PT".to_string(),
        state: Some("Lisboa".to_string()),
        zip: Some("1000".to_string()),
    }
}

pub(super) fn chicago() -> Address {
    Address {
        country: "US".to_string(),
        state: Some("IL".to_string()),
        zip: Some("60601".to_string()),
    }
}

pub(super) fn metrics(weight: f64) -> OrderMetrics {
    OrderMetrics {
        weight,
        volume: 0.4,
        untaxed_total: 120.0,
        quantity: 3.0,
    }
}

pub(super) fn order(shipping_address: Address, weight: f64) -> SaleOrder {
    SaleOrder {
        shipping_address,
        metrics: metrics(weight),
    }
}

pub(super) fn picking(recipient: Address, carrier: CarrierId, weight: f64) -> Picking {
    Picking {
        recipient,
        company: CompanyId(1),
        carrier,
        metrics: metrics(weight),
    }
}

pub(super) fn destination(countries: &[&str]) -> DestinationRule {
    DestinationRule {
        countries: countries.iter().map(|country| country.to_string()).collect(),
        states: Vec::new(),
        zip_prefixes: Vec::new(),
    }
}

pub(super) fn fixed_draft(name: &str, countries: &[&str], price: f64) -> CarrierDraft {
    let mut draft = CarrierDraft::new(name, DeliveryType::Fixed);
    draft.destination = destination(countries);
    draft.fixed_price = price;
    draft
}

pub(super) fn rule_draft(name: &str, countries: &[&str], rules: Vec<PriceRule>) -> CarrierDraft {
    let mut draft = CarrierDraft::new(name, DeliveryType::BaseOnRule);
    draft.destination = destination(countries);
    draft.price_rules = rules;
    draft
}

pub(super) fn weight_rule(operator: RuleOperator, threshold: f64, base_price: f64) -> PriceRule {
    PriceRule {
        variable: RuleVariable::Weight,
        operator,
        threshold,
        base_price,
        factor: 0.0,
        factor_variable: RuleVariable::Weight,
    }
}

/// Two-zone grid used across the routing tests: a fixed Madrid zone keyed on
/// the `28` zip prefix, then a rule-based zone covering the peninsula.
pub(super) fn spanish_grid(registry: &CarrierRegistry) -> (CarrierId, CarrierId, CarrierId) {
    let parent = registry.create(CarrierDraft::new(
        "National grid",
        DeliveryType::BaseOnDestination,
    ));

    let mut metro = fixed_draft("Madrid metro", &["ES"], 5.5);
    metro.destination.zip_prefixes = vec!["28".to_string()];
    let metro = registry
        .create_child(parent, metro)
        .expect("metro zone attaches");

    let peninsula = registry
        .create_child(
            parent,
            rule_draft(
                "Peninsula",
                &["ES", "PT"],
                vec![
                    weight_rule(RuleOperator::Le, 10.0, 8.0),
                    PriceRule {
                        variable: RuleVariable::Weight,
                        operator: RuleOperator::Gt,
                        threshold: 10.0,
                        base_price: 8.0,
                        factor: 0.5,
                        factor_variable: RuleVariable::Weight,
                    },
                ],
            ),
        )
        .expect("peninsula zone attaches");

    (parent, metro, peninsula)
}

pub(super) fn recording_router(
    registry: CarrierRegistry,
) -> (
    DestinationRouter<RuleAddressMatcher, StandardRateQuoter, RecordingBooker>,
    RecordingBooker,
) {
    let booker = RecordingBooker::default();
    let router = DestinationRouter::with_capabilities(
        registry,
        RuleAddressMatcher,
        StandardRateQuoter,
        booker.clone(),
    );
    (router, booker)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct BookingCall {
    pub(super) invoked: CarrierId,
    pub(super) picking_carrier: CarrierId,
}

/// Booker that records every attempt before delegating to the standard one.
#[derive(Default, Clone)]
pub(super) struct RecordingBooker {
    calls: Arc<Mutex<Vec<BookingCall>>>,
}

impl RecordingBooker {
    pub(super) fn calls(&self) -> Vec<BookingCall> {
        self.calls.lock().expect("booking call mutex poisoned").clone()
    }
}

impl ShipmentBooker for RecordingBooker {
    fn book(
        &self,
        carrier: &Carrier,
        picking: &Picking,
        lookup: &dyn CarrierLookup,
    ) -> Result<BookingResult, BookingError> {
        self.calls
            .lock()
            .expect("booking call mutex poisoned")
            .push(BookingCall {
                invoked: carrier.id,
                picking_carrier: picking.carrier,
            });
        StandardShipmentBooker.book(carrier, picking, lookup)
    }
}
