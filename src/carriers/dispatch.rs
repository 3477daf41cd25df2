use tracing::debug;

use super::booking::{
    BookingError, CarrierReassignment, ShipmentBooker, StandardShipmentBooker,
};
use super::domain::{
    Address, BookingResult, Carrier, CarrierId, DeliveryType, DestinationType, Picking,
    RateQuote, SaleOrder,
};
use super::matching::{AddressMatcher, RuleAddressMatcher};
use super::rating::{RateError, RateQuoter, StandardRateQuoter};
use super::registry::CarrierRegistry;

/// Errors surfaced by router operations.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("unknown carrier {0}")]
    UnknownCarrier(CarrierId),
    #[error("There is no matching delivery rule.")]
    NoMatchingDeliveryRule,
    #[error(transparent)]
    Rate(#[from] RateError),
    #[error(transparent)]
    Booking(#[from] BookingError),
}

/// Routes carrier operations by destination.
///
/// A `one` carrier answers availability, rate quotation, and booking with
/// its own pricing engine. A `multi` carrier delegates each call to the
/// first of its children covering the target address, in the children's
/// stored order.
pub struct DestinationRouter<
    M = RuleAddressMatcher,
    Q = StandardRateQuoter,
    B = StandardShipmentBooker,
> {
    registry: CarrierRegistry,
    matcher: M,
    quoter: Q,
    booker: B,
}

impl DestinationRouter {
    /// Router over the standard capability set.
    pub fn new(registry: CarrierRegistry) -> Self {
        Self::with_capabilities(
            registry,
            RuleAddressMatcher,
            StandardRateQuoter,
            StandardShipmentBooker,
        )
    }
}

impl<M, Q, B> DestinationRouter<M, Q, B>
where
    M: AddressMatcher,
    Q: RateQuoter,
    B: ShipmentBooker,
{
    pub fn with_capabilities(
        registry: CarrierRegistry,
        matcher: M,
        quoter: Q,
        booker: B,
    ) -> Self {
        Self {
            registry,
            matcher,
            quoter,
            booker,
        }
    }

    pub fn registry(&self) -> &CarrierRegistry {
        &self.registry
    }

    /// Filter `ids` down to the carriers usable for `partner`. A `multi`
    /// carrier is usable when any of its children covers the address; a
    /// `one` carrier when it covers the address itself. Unknown ids are
    /// skipped; input order is preserved.
    pub fn available_carriers(&self, ids: &[CarrierId], partner: &Address) -> Vec<CarrierId> {
        let mut available = Vec::new();
        for &id in ids {
            let carrier = match self.registry.get(id) {
                Some(carrier) => carrier,
                None => continue,
            };
            let usable = match carrier.destination_type {
                DestinationType::One => self.matcher.matches(&carrier, partner),
                DestinationType::Multi => self
                    .registry
                    .children_of(id)
                    .iter()
                    .any(|child| self.matcher.matches(child, partner)),
            };
            if usable {
                available.push(id);
            }
        }
        available
    }

    /// Price an order. Direct carriers gate on their own destination rule
    /// and then price with their engine. Grid carriers delegate to the first
    /// child matching the shipping address; `Ok(None)` means no child
    /// matched, which is a miss, not a zero-priced quote.
    pub fn rate_shipment(
        &self,
        id: CarrierId,
        order: &SaleOrder,
    ) -> Result<Option<RateQuote>, DispatchError> {
        let carrier = self
            .registry
            .get(id)
            .ok_or(DispatchError::UnknownCarrier(id))?;

        match carrier.destination_type {
            DestinationType::One => {
                if !self.matcher.matches(&carrier, &order.shipping_address) {
                    return Err(RateError::NotAvailableForAddress.into());
                }
                let quote = self.quoter.rate(&carrier, order)?;
                Ok(Some(quote))
            }
            DestinationType::Multi => {
                for child in self.registry.children_of(id) {
                    if self.matcher.matches(&child, &order.shipping_address) {
                        debug!(
                            parent = %id,
                            child = %child.id,
                            "destination child selected for rate quotation"
                        );
                        let quote = self.quoter.rate(&child, order)?;
                        return Ok(Some(quote));
                    }
                }
                Ok(None)
            }
        }
    }

    /// Book shipments. Direct carriers book each picking with their own
    /// engine. Grid carriers route every picking to the first child that
    /// produces a result, and fail the whole call when a picking exhausts
    /// all candidates. One result per picking, in input order.
    pub fn send_shipping(
        &self,
        id: CarrierId,
        pickings: &mut [Picking],
    ) -> Result<Vec<BookingResult>, DispatchError> {
        let carrier = self
            .registry
            .get(id)
            .ok_or(DispatchError::UnknownCarrier(id))?;

        if carrier.destination_type == DestinationType::One {
            let mut results = Vec::with_capacity(pickings.len());
            for picking in pickings.iter() {
                results.push(self.booker.book(&carrier, picking, &self.registry)?);
            }
            return Ok(results);
        }

        let children = self.registry.children_of(id);
        let mut results = Vec::with_capacity(pickings.len());
        for picking in pickings.iter_mut() {
            results.push(self.route_picking(&children, picking)?);
        }
        Ok(results)
    }

    /// Scan `children` in stored order for one that can take `picking`.
    ///
    /// Children restricted to another company are skipped. A fixed child
    /// matching the recipient address books immediately, without its engine
    /// being invoked. Any other child is attempted with the picking's
    /// carrier reference temporarily reassigned to it; a failed attempt is
    /// swallowed and the scan moves on. The reassignment guard restores the
    /// reference on every exit path.
    fn route_picking(
        &self,
        children: &[Carrier],
        picking: &mut Picking,
    ) -> Result<BookingResult, DispatchError> {
        for child in children {
            if child.company.is_some() && child.company != Some(picking.company) {
                continue;
            }

            if child.delivery_type == DeliveryType::Fixed {
                if self.matcher.matches(child, &picking.recipient) {
                    return Ok(BookingResult {
                        exact_price: child.fixed_price,
                        tracking_number: None,
                    });
                }
                continue;
            }

            let reassignment = CarrierReassignment::new(picking, child.id);
            let attempt = self
                .booker
                .book(child, reassignment.picking(), &self.registry);
            drop(reassignment);

            match attempt {
                Ok(result) => return Ok(result),
                Err(error) => {
                    debug!(
                        child = %child.id,
                        %error,
                        "booking attempt failed; trying next destination child"
                    );
                }
            }
        }

        Err(DispatchError::NoMatchingDeliveryRule)
    }
}
