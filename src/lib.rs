//! Timestamp handling for the VendorBazaar marketplace client.
//!
//! Values read from the backend are turned into [`time::RawTimestamp`]
//! variants by [`store::raw_from_value`], normalized to a
//! [`time::CanonicalInstant`] and rendered as short list labels
//! (`"10:30 AM"`, `"Yesterday"`, `"6/15/2024"`) by
//! [`time::RelativeFormatter`].

pub mod config;
pub mod error;
pub mod store;
pub mod time;
pub mod ui;
