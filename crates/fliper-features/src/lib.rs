//! FliPer Feature Engine
//!
//! Reduces a high-pass filtered power density spectrum into the four
//! noise-corrected band powers (Fp07, Fp7, Fp20, Fp50) used as
//! classification features for stellar surface gravity.

mod bands;
mod error;
mod fliper;
mod spectrum;
mod statistics;

pub use bands::{BandConfig, DEFAULT_LOW_EDGES, DEFAULT_NOISE_TAIL, NYQUIST_BOUND_UHZ};
pub use error::FliperError;
pub use fliper::{average_power_in_band, FliperExtractor, FliperValues};
pub use spectrum::PowerSpectrum;
pub use statistics::BandStatistics;
