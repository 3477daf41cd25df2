use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use tracing::debug;

use super::booking::CarrierLookup;
use super::destination::{apply_destination_type, derive_destination_type};
use super::domain::{
    Carrier, CarrierDraft, CarrierId, CompanyId, DeliveryType, DestinationType,
};

/// Errors raised by carrier record maintenance.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("unknown carrier {0}")]
    UnknownCarrier(CarrierId),
    #[error("carrier {child} is already attached to carrier {parent}")]
    AlreadyAttached { parent: CarrierId, child: CarrierId },
    #[error("carrier {child} is not a child of carrier {parent}")]
    NotAChild { parent: CarrierId, child: CarrierId },
    #[error("attaching carrier {child} under carrier {parent} would create a cycle")]
    HierarchyCycle { parent: CarrierId, child: CarrierId },
}

/// Call context for search operations. Child carriers used purely as
/// destination rules stay hidden unless `show_children_carriers` is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchContext {
    pub show_children_carriers: bool,
}

impl SearchContext {
    pub fn with_children() -> Self {
        Self {
            show_children_carriers: true,
        }
    }
}

/// Optional field predicates applied by `search` on top of the child filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CarrierFilter {
    pub delivery_type: Option<DeliveryType>,
    pub destination_type: Option<DestinationType>,
    pub company: Option<CompanyId>,
    pub name_contains: Option<String>,
}

impl CarrierFilter {
    fn accepts(&self, carrier: &Carrier) -> bool {
        if let Some(delivery_type) = self.delivery_type {
            if carrier.delivery_type != delivery_type {
                return false;
            }
        }
        if let Some(destination_type) = self.destination_type {
            if carrier.destination_type != destination_type {
                return false;
            }
        }
        if let Some(company) = self.company {
            if carrier.company != Some(company) {
                return false;
            }
        }
        if let Some(needle) = &self.name_contains {
            if !carrier
                .name
                .to_lowercase()
                .contains(&needle.to_lowercase())
            {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Default)]
struct RegistryState {
    records: BTreeMap<CarrierId, Carrier>,
    next_id: u64,
}

impl RegistryState {
    fn allocate_id(&mut self) -> CarrierId {
        self.next_id += 1;
        CarrierId(self.next_id)
    }

    /// Whether `candidate` appears in `node`'s parent chain.
    fn is_ancestor(&self, candidate: CarrierId, node: CarrierId) -> bool {
        let mut cursor = node;
        while let Some(record) = self.records.get(&cursor) {
            match record.parent {
                Some(parent) if parent == candidate => return true,
                Some(parent) => cursor = parent,
                None => return false,
            }
        }
        false
    }
}

fn record_from_draft(id: CarrierId, draft: CarrierDraft, now: DateTime<Utc>) -> Carrier {
    Carrier {
        id,
        name: draft.name,
        destination_type: derive_destination_type(draft.delivery_type),
        delivery_type: draft.delivery_type,
        parent: None,
        children: Vec::new(),
        company: draft.company,
        destination: draft.destination,
        fixed_price: draft.fixed_price,
        price_rules: draft.price_rules,
        created_at: now,
        updated_at: now,
    }
}

/// Clonable handle over the shared in-memory carrier store.
///
/// The registry owns the parent/children hierarchy: hierarchy links are only
/// written through `create_child`, `attach_child`, `detach_child`, and
/// `delete`, and the `destination_type` derivation is re-applied after every
/// field write so the flag can never drift from `delivery_type`.
#[derive(Clone, Default)]
pub struct CarrierRegistry {
    state: Arc<Mutex<RegistryState>>,
}

impl CarrierRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        self.state.lock().expect("carrier registry mutex poisoned")
    }

    /// Create a root carrier and return its assigned id.
    pub fn create(&self, draft: CarrierDraft) -> CarrierId {
        let mut state = self.lock();
        let id = state.allocate_id();
        let record = record_from_draft(id, draft, Utc::now());
        state.records.insert(id, record);
        id
    }

    /// Create a carrier directly attached under `parent`. The child is
    /// appended at the end of the parent's stored child order.
    pub fn create_child(
        &self,
        parent: CarrierId,
        draft: CarrierDraft,
    ) -> Result<CarrierId, RegistryError> {
        let mut state = self.lock();
        if !state.records.contains_key(&parent) {
            return Err(RegistryError::UnknownCarrier(parent));
        }

        let now = Utc::now();
        let id = state.allocate_id();
        let mut record = record_from_draft(id, draft, now);
        record.parent = Some(parent);
        state.records.insert(id, record);

        if let Some(record) = state.records.get_mut(&parent) {
            record.children.push(id);
            record.updated_at = now;
        }

        Ok(id)
    }

    /// Cloned snapshot of a record.
    pub fn get(&self, id: CarrierId) -> Option<Carrier> {
        self.lock().records.get(&id).cloned()
    }

    /// Children of `id` in their stored order. This is the router's direct
    /// access path; unlike `search`, it never hides parented records.
    pub fn children_of(&self, id: CarrierId) -> Vec<Carrier> {
        let state = self.lock();
        match state.records.get(&id) {
            Some(record) => record
                .children
                .iter()
                .filter_map(|child| state.records.get(child).cloned())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Attach an existing root carrier under `parent`.
    pub fn attach_child(
        &self,
        parent: CarrierId,
        child: CarrierId,
    ) -> Result<(), RegistryError> {
        let mut state = self.lock();
        if !state.records.contains_key(&parent) {
            return Err(RegistryError::UnknownCarrier(parent));
        }
        match state.records.get(&child) {
            None => return Err(RegistryError::UnknownCarrier(child)),
            Some(record) => {
                if let Some(current) = record.parent {
                    return Err(RegistryError::AlreadyAttached {
                        parent: current,
                        child,
                    });
                }
            }
        }
        if parent == child || state.is_ancestor(child, parent) {
            return Err(RegistryError::HierarchyCycle { parent, child });
        }

        let now = Utc::now();
        if let Some(record) = state.records.get_mut(&child) {
            record.parent = Some(parent);
            record.updated_at = now;
        }
        if let Some(record) = state.records.get_mut(&parent) {
            record.children.push(child);
            record.updated_at = now;
        }
        Ok(())
    }

    /// Detach a child from `parent`, turning it back into a root carrier.
    pub fn detach_child(
        &self,
        parent: CarrierId,
        child: CarrierId,
    ) -> Result<(), RegistryError> {
        let mut state = self.lock();
        if !state.records.contains_key(&parent) {
            return Err(RegistryError::UnknownCarrier(parent));
        }
        let attached = match state.records.get(&child) {
            None => return Err(RegistryError::UnknownCarrier(child)),
            Some(record) => record.parent == Some(parent),
        };
        if !attached {
            return Err(RegistryError::NotAChild { parent, child });
        }

        let now = Utc::now();
        if let Some(record) = state.records.get_mut(&child) {
            record.parent = None;
            record.updated_at = now;
        }
        if let Some(record) = state.records.get_mut(&parent) {
            record.children.retain(|&existing| existing != child);
            record.updated_at = now;
        }
        Ok(())
    }

    /// Delete a carrier together with all transitive children, returning the
    /// removed ids (the requested carrier first). Unknown ids remove nothing.
    pub fn delete(&self, id: CarrierId) -> Vec<CarrierId> {
        let mut state = self.lock();
        if !state.records.contains_key(&id) {
            return Vec::new();
        }

        if let Some(parent) = state.records.get(&id).and_then(|record| record.parent) {
            if let Some(record) = state.records.get_mut(&parent) {
                record.children.retain(|&existing| existing != id);
                record.updated_at = Utc::now();
            }
        }

        let mut removed = Vec::new();
        let mut queue = vec![id];
        while let Some(next) = queue.pop() {
            if let Some(record) = state.records.remove(&next) {
                queue.extend(record.children.iter().copied());
                removed.push(next);
            }
        }

        if removed.len() > 1 {
            debug!(
                carrier = %id,
                cascaded = removed.len() - 1,
                "cascade removed destination children"
            );
        }

        removed
    }

    /// Rewrite the pricing engine; the `destination_type` flag is re-derived.
    pub fn set_delivery_type(
        &self,
        id: CarrierId,
        delivery_type: DeliveryType,
    ) -> Result<(), RegistryError> {
        self.modify(id, |carrier| carrier.delivery_type = delivery_type)
    }

    /// Manually set the routing flag; the inverse mapping writes the change
    /// back onto `delivery_type`.
    pub fn set_destination_type(
        &self,
        id: CarrierId,
        destination_type: DestinationType,
    ) -> Result<(), RegistryError> {
        self.modify(id, |carrier| {
            carrier.delivery_type =
                apply_destination_type(carrier.delivery_type, destination_type);
        })
    }

    /// Apply a field update to a record. Hierarchy bookkeeping belongs to
    /// the registry, so the closure cannot move the record in the tree or
    /// change its identity; `destination_type` is re-derived afterward.
    pub fn modify<F>(&self, id: CarrierId, mutate: F) -> Result<(), RegistryError>
    where
        F: FnOnce(&mut Carrier),
    {
        let mut state = self.lock();
        let carrier = state
            .records
            .get_mut(&id)
            .ok_or(RegistryError::UnknownCarrier(id))?;

        let parent_before = carrier.parent;
        let children_before = carrier.children.clone();
        let created_before = carrier.created_at;

        mutate(carrier);

        carrier.id = id;
        carrier.parent = parent_before;
        carrier.children = children_before;
        carrier.created_at = created_before;
        carrier.destination_type = derive_destination_type(carrier.delivery_type);
        carrier.updated_at = Utc::now();
        Ok(())
    }

    /// List records matching `filter`. Children are excluded unless the
    /// context carries the `show_children_carriers` override.
    pub fn search(&self, filter: &CarrierFilter, ctx: &SearchContext) -> Vec<Carrier> {
        let state = self.lock();
        state
            .records
            .values()
            .filter(|carrier| ctx.show_children_carriers || carrier.parent.is_none())
            .filter(|carrier| filter.accepts(carrier))
            .cloned()
            .collect()
    }

    /// Case-insensitive name lookup returning `(id, name)` pairs up to
    /// `limit`. An empty needle matches every visible record. The child
    /// filter applies exactly as in `search`.
    pub fn name_search(
        &self,
        needle: &str,
        ctx: &SearchContext,
        limit: usize,
    ) -> Vec<(CarrierId, String)> {
        let needle = needle.to_lowercase();
        let state = self.lock();
        state
            .records
            .values()
            .filter(|carrier| ctx.show_children_carriers || carrier.parent.is_none())
            .filter(|carrier| needle.is_empty() || carrier.name.to_lowercase().contains(&needle))
            .take(limit)
            .map(|carrier| (carrier.id, carrier.name.clone()))
            .collect()
    }
}

impl CarrierLookup for CarrierRegistry {
    fn carrier(&self, id: CarrierId) -> Option<Carrier> {
        self.get(id)
    }
}
