//! `givetrack` - a local log of donations and volunteer hours
//!
//! Form input is validated, normalized into typed records, appended to a
//! JSON collection kept in a key-value store, and rendered as a table with a
//! running total. The store is the only source of truth: every render reads
//! it fresh.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod clock;
pub mod collection;
pub mod config;
pub mod donation;
pub mod error;
pub mod logging;
pub mod numeric;
pub mod render;
pub mod store;
pub mod view;
pub mod volunteer;

pub use clock::{Clock, FixedClock, SystemClock};
pub use collection::{Collection, MalformedPolicy, Record};
pub use config::Config;
pub use donation::{Donation, DonationForm, DonationTracker};
pub use error::{Error, Result, ValidationError};
pub use logging::init_logging;
pub use render::TableEntry;
pub use store::{KeyValueStore, MemoryStore, SqliteStore};
pub use view::{BufferedView, DeleteKey, OutputFormat, TableRow, TrackerView};
pub use volunteer::{RatingSelection, VolunteerForm, VolunteerLog, VolunteerTracker};
