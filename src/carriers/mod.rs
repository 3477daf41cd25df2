//! Carrier records, capability seams, and the destination router.
//!
//! A carrier with the destination-based pricing engine is a *grid*: it owns
//! an ordered set of destination children and answers rate and booking calls
//! by delegating to whichever child covers the target address. The registry
//! keeps grids out of normal carrier listings, and the router implements the
//! delegation.

pub mod booking;
pub(crate) mod destination;
pub mod dispatch;
pub mod domain;
pub mod import;
pub mod matching;
pub mod rating;
pub mod registry;

#[cfg(test)]
mod tests;

pub use booking::{
    BookingError, CarrierLookup, CarrierReassignment, ShipmentBooker, StandardShipmentBooker,
};
pub use destination::{apply_destination_type, derive_destination_type};
pub use dispatch::{DestinationRouter, DispatchError};
pub use domain::{
    Address, BookingResult, Carrier, CarrierDraft, CarrierId, CompanyId, DeliveryType,
    DestinationRule, DestinationType, OrderMetrics, Picking, PriceRule, RateQuote, RuleOperator,
    RuleVariable, SaleOrder,
};
pub use import::{ZoneImportError, ZoneImporter};
pub use matching::{AddressMatcher, RuleAddressMatcher};
pub use rating::{RateError, RateQuoter, StandardRateQuoter};
pub use registry::{CarrierFilter, CarrierRegistry, RegistryError, SearchContext};
