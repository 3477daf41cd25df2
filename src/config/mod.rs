//! Declarative definition of a destination grid.
//!
//! A grid file describes one parent carrier and its destination zones in
//! TOML. `GridConfig::instantiate` turns the definition into live records in
//! a registry, which keeps fixture grids and embedder setup code out of the
//! routing modules.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::carriers::domain::{
    CarrierDraft, CarrierId, CompanyId, DeliveryType, DestinationRule, PriceRule, RuleOperator,
    RuleVariable,
};
use crate::carriers::registry::{CarrierRegistry, RegistryError};

/// Errors raised while loading or instantiating a grid definition.
#[derive(Debug, thiserror::Error)]
pub enum GridConfigError {
    #[error("failed to read grid definition: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid grid definition: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("grid carrier name must not be empty")]
    UnnamedCarrier,
    #[error("grid must declare at least one zone")]
    EmptyGrid,
    #[error("zone {index} must declare a name")]
    UnnamedZone { index: usize },
    #[error("zone '{zone}' cannot use the destination-based delivery type")]
    NestedDestinationZone { zone: String },
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Top-level grid definition: one parent carrier plus its zones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    pub carrier: GridCarrierConfig,
    #[serde(default)]
    pub zones: Vec<GridZoneConfig>,
}

/// The parent carrier section of a grid definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridCarrierConfig {
    pub name: String,
    #[serde(default)]
    pub company: Option<CompanyId>,
}

/// One destination zone of the grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridZoneConfig {
    pub name: String,
    #[serde(default = "default_zone_delivery_type")]
    pub delivery_type: DeliveryType,
    #[serde(default)]
    pub countries: Vec<String>,
    #[serde(default)]
    pub states: Vec<String>,
    #[serde(default)]
    pub zip_prefixes: Vec<String>,
    #[serde(default)]
    pub fixed_price: f64,
    #[serde(default)]
    pub rules: Vec<GridRuleConfig>,
    #[serde(default)]
    pub company: Option<CompanyId>,
}

fn default_zone_delivery_type() -> DeliveryType {
    DeliveryType::Fixed
}

/// One pricing rule of a rule-based zone. `factor_variable` falls back to
/// the condition variable when omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridRuleConfig {
    pub variable: RuleVariable,
    pub operator: RuleOperator,
    pub threshold: f64,
    #[serde(default)]
    pub base_price: f64,
    #[serde(default)]
    pub factor: f64,
    #[serde(default)]
    pub factor_variable: Option<RuleVariable>,
}

impl GridRuleConfig {
    fn price_rule(&self) -> PriceRule {
        PriceRule {
            variable: self.variable,
            operator: self.operator,
            threshold: self.threshold,
            base_price: self.base_price,
            factor: self.factor,
            factor_variable: self.factor_variable.unwrap_or(self.variable),
        }
    }
}

impl GridZoneConfig {
    fn draft(&self) -> CarrierDraft {
        CarrierDraft {
            name: self.name.clone(),
            delivery_type: self.delivery_type,
            company: self.company,
            destination: DestinationRule {
                countries: self.countries.clone(),
                states: self.states.clone(),
                zip_prefixes: self.zip_prefixes.clone(),
            },
            fixed_price: self.fixed_price,
            price_rules: self.rules.iter().map(GridRuleConfig::price_rule).collect(),
        }
    }
}

impl GridConfig {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, GridConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, GridConfigError> {
        let config: GridConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), GridConfigError> {
        if self.carrier.name.trim().is_empty() {
            return Err(GridConfigError::UnnamedCarrier);
        }
        if self.zones.is_empty() {
            return Err(GridConfigError::EmptyGrid);
        }
        for (index, zone) in self.zones.iter().enumerate() {
            if zone.name.trim().is_empty() {
                return Err(GridConfigError::UnnamedZone { index });
            }
            if zone.delivery_type == DeliveryType::BaseOnDestination {
                return Err(GridConfigError::NestedDestinationZone {
                    zone: zone.name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Create the declared parent carrier and its zones in `registry`,
    /// returning the parent's id. Zones keep the declaration order.
    pub fn instantiate(&self, registry: &CarrierRegistry) -> Result<CarrierId, GridConfigError> {
        let mut draft =
            CarrierDraft::new(self.carrier.name.clone(), DeliveryType::BaseOnDestination);
        draft.company = self.carrier.company;
        let parent = registry.create(draft);

        for zone in &self.zones {
            registry.create_child(parent, zone.draft())?;
        }

        Ok(parent)
    }
}
