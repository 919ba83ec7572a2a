// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only wiring in main.rs.
pub mod app;
pub mod config;
pub mod normalizer;
pub mod orp;
pub mod pacing;
pub mod playback;
pub mod runtime;
pub mod samples;
pub mod source;
pub mod typing;
pub mod ui;

/// App tick cadence in milliseconds. 50ms keeps the playback deadline
/// check and the progress readout responsive at the fastest supported
/// pace.
pub const TICK_RATE_MS: u64 = 50;
