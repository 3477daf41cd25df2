//! Destination-based routing for delivery carriers.
//!
//! A carrier normally serves one destination with one pricing engine. This
//! crate adds a grid form: a parent carrier whose destination children each
//! cover a zone, with availability, rate quotation, and shipment booking
//! dispatched to the first child matching the target address. Grids can be
//! built programmatically against [`CarrierRegistry`], declared in TOML via
//! [`GridConfig`], or appended from CSV zone sheets with
//! [`carriers::ZoneImporter`].

pub mod carriers;
pub mod config;
pub mod error;
pub mod telemetry;

pub use carriers::{
    Address, BookingError, BookingResult, Carrier, CarrierDraft, CarrierFilter, CarrierId,
    CarrierRegistry, CompanyId, DeliveryType, DestinationRouter, DestinationRule, DestinationType,
    DispatchError, OrderMetrics, Picking, PriceRule, RateError, RateQuote, RegistryError,
    RuleOperator, RuleVariable, SaleOrder, SearchContext,
};
pub use config::GridConfig;
pub use error::{Error, Result};
