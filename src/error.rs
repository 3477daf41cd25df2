use crate::carriers::booking::BookingError;
use crate::carriers::dispatch::DispatchError;
use crate::carriers::import::ZoneImportError;
use crate::carriers::rating::RateError;
use crate::carriers::registry::RegistryError;
use crate::config::GridConfigError;
use crate::telemetry::TelemetryError;
use std::fmt;

#[derive(Debug)]
pub enum Error {
    Registry(RegistryError),
    Rate(RateError),
    Booking(BookingError),
    Dispatch(DispatchError),
    GridConfig(GridConfigError),
    ZoneImport(ZoneImportError),
    Telemetry(TelemetryError),
}

pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Registry(err) => write!(f, "registry error: {}", err),
            Error::Rate(err) => write!(f, "rating error: {}", err),
            Error::Booking(err) => write!(f, "booking error: {}", err),
            Error::Dispatch(err) => write!(f, "dispatch error: {}", err),
            Error::GridConfig(err) => write!(f, "grid configuration error: {}", err),
            Error::ZoneImport(err) => write!(f, "zone import error: {}", err),
            Error::Telemetry(err) => write!(f, "telemetry error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Registry(err) => Some(err),
            Error::Rate(err) => Some(err),
            Error::Booking(err) => Some(err),
            Error::Dispatch(err) => Some(err),
            Error::GridConfig(err) => Some(err),
            Error::ZoneImport(err) => Some(err),
            Error::Telemetry(err) => Some(err),
        }
    }
}

impl From<RegistryError> for Error {
    fn from(value: RegistryError) -> Self {
        Self::Registry(value)
    }
}

impl From<RateError> for Error {
    fn from(value: RateError) -> Self {
        Self::Rate(value)
    }
}

impl From<BookingError> for Error {
    fn from(value: BookingError) -> Self {
        Self::Booking(value)
    }
}

impl From<DispatchError> for Error {
    fn from(value: DispatchError) -> Self {
        Self::Dispatch(value)
    }
}

impl From<GridConfigError> for Error {
    fn from(value: GridConfigError) -> Self {
        Self::GridConfig(value)
    }
}

impl From<ZoneImportError> for Error {
    fn from(value: ZoneImportError) -> Self {
        Self::ZoneImport(value)
    }
}

impl From<TelemetryError> for Error {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}
