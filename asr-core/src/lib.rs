//! Core types for airport safety-inspection reports.
//!
//! A [`Report`](report::Report) is one inspection submission for one airport.
//! Its items carry a [`Status`](report::Status) each, which the dashboard
//! counts into a [`Tally`](tally::Tally). Listings never hold photo payloads;
//! they work on the output of [`summarize`](summary::summarize).

pub mod airport;
pub mod error;
pub mod id;
pub mod import;
pub mod report;
pub mod summary;
pub mod tally;

pub use error::{Error, Result};
pub use report::{Report, ReportId, ReportItem, Slot, Status};
