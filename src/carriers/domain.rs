use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for carrier records.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct CarrierId(pub u64);

impl fmt::Display for CarrierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier wrapper for the company a carrier or picking belongs to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct CompanyId(pub u32);

/// Pricing engine backing a carrier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryType {
    Fixed,
    BaseOnRule,
    BaseOnDestination,
}

impl DeliveryType {
    pub const fn label(self) -> &'static str {
        match self {
            DeliveryType::Fixed => "fixed",
            DeliveryType::BaseOnRule => "base_on_rule",
            DeliveryType::BaseOnDestination => "base_on_destination",
        }
    }
}

/// Derived routing flag: a carrier either serves one destination itself or
/// groups destination-specific children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DestinationType {
    One,
    Multi,
}

impl DestinationType {
    pub const fn label(self) -> &'static str {
        match self {
            DestinationType::One => "one",
            DestinationType::Multi => "multi",
        }
    }
}

/// Shipping address evaluated against carrier destination rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub country: String,
    pub state: Option<String>,
    pub zip: Option<String>,
}

/// Destination criteria for a carrier. Every populated criterion must accept
/// an address; a rule with no criteria matches everywhere.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationRule {
    pub countries: Vec<String>,
    pub states: Vec<String>,
    pub zip_prefixes: Vec<String>,
}

/// Order quantity a pricing rule conditions or scales on. `Price` reads the
/// order's untaxed total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleVariable {
    Weight,
    Volume,
    Price,
    Quantity,
}

/// Comparison operator for rule conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleOperator {
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = ">")]
    Gt,
}

/// One rule of a rule-based pricing table: when `variable operator threshold`
/// holds, the shipping price is `base_price + factor * factor_variable`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRule {
    pub variable: RuleVariable,
    pub operator: RuleOperator,
    pub threshold: f64,
    pub base_price: f64,
    pub factor: f64,
    pub factor_variable: RuleVariable,
}

/// A delivery method record. Carriers are stored in a `CarrierRegistry`,
/// which owns the parent/children hierarchy and the `destination_type`
/// derivation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Carrier {
    pub id: CarrierId,
    pub name: String,
    pub delivery_type: DeliveryType,
    pub destination_type: DestinationType,
    pub parent: Option<CarrierId>,
    pub children: Vec<CarrierId>,
    pub company: Option<CompanyId>,
    pub destination: DestinationRule,
    pub fixed_price: f64,
    pub price_rules: Vec<PriceRule>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Field set used to create carriers; identifiers, hierarchy links, and
/// timestamps are assigned by the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarrierDraft {
    pub name: String,
    pub delivery_type: DeliveryType,
    pub company: Option<CompanyId>,
    pub destination: DestinationRule,
    pub fixed_price: f64,
    pub price_rules: Vec<PriceRule>,
}

impl CarrierDraft {
    pub fn new(name: impl Into<String>, delivery_type: DeliveryType) -> Self {
        Self {
            name: name.into(),
            delivery_type,
            company: None,
            destination: DestinationRule::default(),
            fixed_price: 0.0,
            price_rules: Vec::new(),
        }
    }
}

/// Order totals the rule engine prices against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderMetrics {
    pub weight: f64,
    pub volume: f64,
    pub untaxed_total: f64,
    pub quantity: f64,
}

impl OrderMetrics {
    pub fn value_for(&self, variable: RuleVariable) -> f64 {
        match variable {
            RuleVariable::Weight => self.weight,
            RuleVariable::Volume => self.volume,
            RuleVariable::Price => self.untaxed_total,
            RuleVariable::Quantity => self.quantity,
        }
    }
}

/// Sales order snapshot used for rate quotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleOrder {
    pub shipping_address: Address,
    pub metrics: OrderMetrics,
}

/// Shipment unit routed to a carrier. The `carrier` reference is the field
/// the router temporarily reassigns while probing destination children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Picking {
    pub recipient: Address,
    pub company: CompanyId,
    pub carrier: CarrierId,
    pub metrics: OrderMetrics,
}

/// Computed shipping price for an order, tagged with the carrier that
/// priced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateQuote {
    pub carrier: CarrierId,
    pub price: f64,
}

/// Result of booking one picking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingResult {
    pub exact_price: f64,
    pub tracking_number: Option<String>,
}
