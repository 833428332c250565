//! Roll-point raffle desk: scrape dice rolls out of pasted chat logs, pick
//! winners, and keep per-staff statistics over the recorded draws.

pub mod config;
pub mod raffle;
pub mod router;
pub mod server;
pub mod store;
