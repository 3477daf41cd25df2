use super::domain::{BookingResult, Carrier, CarrierId, DeliveryType, Picking};
use super::rating::first_matching_rule_price;

/// Errors raised by base shipment booking.
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("picking references unknown carrier {0}")]
    UnknownCarrier(CarrierId),
    #[error("no price rule matching this picking; delivery cost cannot be computed")]
    NoMatchingPriceRule,
    #[error("delivery type '{0}' has no base booking behavior")]
    UnsupportedDeliveryType(&'static str),
}

/// Record access needed by bookers that resolve the picking's carrier
/// reference at booking time. Implemented by `CarrierRegistry`.
pub trait CarrierLookup {
    fn carrier(&self, id: CarrierId) -> Option<Carrier>;
}

/// Capability seam for base shipment booking.
pub trait ShipmentBooker: Send + Sync {
    fn book(
        &self,
        carrier: &Carrier,
        picking: &Picking,
        lookup: &dyn CarrierLookup,
    ) -> Result<BookingResult, BookingError>;
}

/// Standard booker dispatching on the carrier's pricing engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardShipmentBooker;

impl ShipmentBooker for StandardShipmentBooker {
    fn book(
        &self,
        carrier: &Carrier,
        picking: &Picking,
        lookup: &dyn CarrierLookup,
    ) -> Result<BookingResult, BookingError> {
        match carrier.delivery_type {
            DeliveryType::Fixed => Ok(BookingResult {
                exact_price: carrier.fixed_price,
                tracking_number: None,
            }),
            DeliveryType::BaseOnRule => {
                // Rule pricing reads the carrier currently referenced by the
                // picking, not the invoked one. The destination router leans
                // on this when it substitutes a child behind the reference.
                let priced = lookup
                    .carrier(picking.carrier)
                    .ok_or(BookingError::UnknownCarrier(picking.carrier))?;
                let price = first_matching_rule_price(&priced.price_rules, &picking.metrics)
                    .ok_or(BookingError::NoMatchingPriceRule)?;
                Ok(BookingResult {
                    exact_price: price,
                    tracking_number: None,
                })
            }
            DeliveryType::BaseOnDestination => Err(BookingError::UnsupportedDeliveryType(
                carrier.delivery_type.label(),
            )),
        }
    }
}

/// Scoped reassignment of a picking's carrier reference.
///
/// The original reference is put back when the guard drops, so every exit
/// path out of a booking attempt restores the picking.
pub struct CarrierReassignment<'a> {
    picking: &'a mut Picking,
    original: CarrierId,
}

impl<'a> CarrierReassignment<'a> {
    pub fn new(picking: &'a mut Picking, substitute: CarrierId) -> Self {
        let original = picking.carrier;
        picking.carrier = substitute;
        Self { picking, original }
    }

    /// View of the picking while the substitute reference is in place.
    pub fn picking(&self) -> &Picking {
        self.picking
    }
}

impl Drop for CarrierReassignment<'_> {
    fn drop(&mut self) {
        self.picking.carrier = self.original;
    }
}
