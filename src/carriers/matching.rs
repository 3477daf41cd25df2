use super::domain::{Address, Carrier, DestinationRule};

/// Capability seam for destination checks. Kept behind a trait so routing
/// can be exercised with scripted matchers in tests.
pub trait AddressMatcher: Send + Sync {
    fn matches(&self, carrier: &Carrier, address: &Address) -> bool;
}

/// Standard matcher: evaluates the carrier's stored destination rule.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleAddressMatcher;

impl AddressMatcher for RuleAddressMatcher {
    fn matches(&self, carrier: &Carrier, address: &Address) -> bool {
        carrier.destination.accepts(address)
    }
}

impl DestinationRule {
    /// Every populated criterion must accept the address; an empty rule
    /// matches every address.
    pub fn accepts(&self, address: &Address) -> bool {
        if !self.countries.is_empty()
            && !self
                .countries
                .iter()
                .any(|country| country.eq_ignore_ascii_case(&address.country))
        {
            return false;
        }

        if !self.states.is_empty() {
            let accepted = match address.state.as_deref() {
                Some(state) => self
                    .states
                    .iter()
                    .any(|candidate| candidate.eq_ignore_ascii_case(state)),
                None => false,
            };
            if !accepted {
                return false;
            }
        }

        if !self.zip_prefixes.is_empty() {
            let accepted = match address.zip.as_deref() {
                Some(zip) => self
                    .zip_prefixes
                    .iter()
                    .any(|prefix| zip.starts_with(prefix.as_str())),
                None => false,
            };
            if !accepted {
                return false;
            }
        }

        true
    }
}
