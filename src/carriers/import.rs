//! CSV import of destination zones into an existing carrier grid.
//!
//! Grids are commonly maintained in a spreadsheet with one row per zone.
//! The importer appends each row as a destination child of the given parent
//! carrier, preserving the sheet's row order.

use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use super::domain::{CarrierDraft, CarrierId, DeliveryType, DestinationRule};
use super::registry::{CarrierRegistry, RegistryError};

#[derive(Debug)]
pub enum ZoneImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Registry(RegistryError),
    UnknownDeliveryType { zone: String, value: String },
}

impl std::fmt::Display for ZoneImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ZoneImportError::Io(err) => write!(f, "failed to read zone sheet: {}", err),
            ZoneImportError::Csv(err) => write!(f, "invalid zone CSV data: {}", err),
            ZoneImportError::Registry(err) => {
                write!(f, "could not append zone to the destination grid: {}", err)
            }
            ZoneImportError::UnknownDeliveryType { zone, value } => {
                write!(f, "zone '{}' declares unsupported delivery type '{}'", zone, value)
            }
        }
    }
}

impl std::error::Error for ZoneImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ZoneImportError::Io(err) => Some(err),
            ZoneImportError::Csv(err) => Some(err),
            ZoneImportError::Registry(err) => Some(err),
            ZoneImportError::UnknownDeliveryType { .. } => None,
        }
    }
}

impl From<std::io::Error> for ZoneImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ZoneImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<RegistryError> for ZoneImportError {
    fn from(err: RegistryError) -> Self {
        Self::Registry(err)
    }
}

pub struct ZoneImporter;

impl ZoneImporter {
    pub fn from_path<P: AsRef<Path>>(
        registry: &CarrierRegistry,
        parent: CarrierId,
        path: P,
    ) -> Result<Vec<CarrierId>, ZoneImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(registry, parent, file)
    }

    /// Append every zone row as a destination child of `parent`, returning
    /// the created ids in sheet order. The whole sheet is parsed before the
    /// first child is created, so a malformed row leaves the grid untouched.
    pub fn from_reader<R: Read>(
        registry: &CarrierRegistry,
        parent: CarrierId,
        reader: R,
    ) -> Result<Vec<CarrierId>, ZoneImportError> {
        let drafts = parse_zones(reader)?;
        let mut created = Vec::with_capacity(drafts.len());
        for draft in drafts {
            created.push(registry.create_child(parent, draft)?);
        }
        Ok(created)
    }
}

fn parse_zones<R: Read>(reader: R) -> Result<Vec<CarrierDraft>, ZoneImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut drafts = Vec::new();

    for record in csv_reader.deserialize::<ZoneRow>() {
        let row = record?;
        // Blank zone names are sheet padding, not data.
        if row.zone.is_empty() {
            continue;
        }
        drafts.push(row.into_draft()?);
    }

    Ok(drafts)
}

#[derive(Debug, Deserialize)]
struct ZoneRow {
    #[serde(rename = "Zone")]
    zone: String,
    #[serde(rename = "Countries", default, deserialize_with = "empty_string_as_none")]
    countries: Option<String>,
    #[serde(rename = "States", default, deserialize_with = "empty_string_as_none")]
    states: Option<String>,
    #[serde(
        rename = "Zip Prefixes",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    zip_prefixes: Option<String>,
    #[serde(
        rename = "Delivery Type",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    delivery_type: Option<String>,
    #[serde(rename = "Price", default)]
    price: Option<f64>,
}

impl ZoneRow {
    fn into_draft(self) -> Result<CarrierDraft, ZoneImportError> {
        let delivery_type = match self.delivery_type.as_deref() {
            None => DeliveryType::Fixed,
            Some("fixed") => DeliveryType::Fixed,
            Some("base_on_rule") => DeliveryType::BaseOnRule,
            Some(other) => {
                return Err(ZoneImportError::UnknownDeliveryType {
                    zone: self.zone,
                    value: other.to_string(),
                })
            }
        };

        Ok(CarrierDraft {
            name: self.zone,
            delivery_type,
            company: None,
            destination: DestinationRule {
                countries: split_list(self.countries),
                states: split_list(self.states),
                zip_prefixes: split_list(self.zip_prefixes),
            },
            fixed_price: self.price.unwrap_or_default(),
            price_rules: Vec::new(),
        })
    }
}

fn split_list(raw: Option<String>) -> Vec<String> {
    match raw {
        Some(value) => value
            .split(|c| c == ',' || c == ';')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(str::to_string)
            .collect(),
        None => Vec::new(),
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
