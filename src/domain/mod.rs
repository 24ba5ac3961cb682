//! Module for the types defining the meter-reading domain.

mod account;
mod reading;

pub use account::{Account, AccountId};
pub use reading::{MeterReading, MeterValue, ParsedReading};
