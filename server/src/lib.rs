//! `psort-server` sorts batches of integer arrays over HTTP.
//!
//! A request carries a batch of independent arrays; the service answers with every array sorted
//! ascending at its original index, plus the time the sorting took. Two routes expose two
//! execution strategies so their latency can be compared:
//! - `/process-single` sorts the arrays one after another on a single thread
//! - `/process-concurrent` fans out one task per array and joins them before answering
//!
//! Core modules:
//! - [`processing`]: the two strategies and their timing
//! - [`wire`]: JSON request/response bodies
//! - [`server`]: axum server wiring
//! - [`config`]: service config (YAML)
//! - [`client`]: HTTP client, startup self-test and batch generator

pub mod client;
pub mod config;
pub mod processing;
pub mod server;
pub mod wire;
