use super::domain::{DeliveryType, DestinationType};

/// Derive the routing flag from the pricing engine selection: the
/// destination-based engine is what makes a carrier a grid.
pub fn derive_destination_type(delivery_type: DeliveryType) -> DestinationType {
    match delivery_type {
        DeliveryType::BaseOnDestination => DestinationType::Multi,
        DeliveryType::Fixed | DeliveryType::BaseOnRule => DestinationType::One,
    }
}

/// Apply a manual `destination_type` write back onto `delivery_type`.
///
/// Switching to `Multi` forces the destination-based engine. Switching away
/// resets `delivery_type` to `Fixed` only while it still holds the
/// now-invalid destination-based value; any other engine choice is kept so a
/// repeated non-multi write cannot clobber it.
pub fn apply_destination_type(
    delivery_type: DeliveryType,
    destination_type: DestinationType,
) -> DeliveryType {
    match destination_type {
        DestinationType::Multi => DeliveryType::BaseOnDestination,
        DestinationType::One if delivery_type == DeliveryType::BaseOnDestination => {
            DeliveryType::Fixed
        }
        DestinationType::One => delivery_type,
    }
}
