pub mod demod;
pub mod filter;
pub mod gate;
pub mod nco;
pub mod power;
pub mod window;

pub use demod::DifferentialDemod;
pub use filter::CascadedLowPass;
pub use gate::{ChirpGate, GateOutput};
pub use nco::Nco;
pub use power::PowerEstimator;
pub use window::EnergyWindow;
