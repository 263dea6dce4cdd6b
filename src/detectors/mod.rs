//! The four independent pattern detectors: cycles, fan-in/out,
//! layered shells, and two-hop exposure.

pub mod cycles;
pub mod fan;
pub mod shells;
pub mod two_hop;

pub use cycles::find_cycles;
pub use fan::detect_fan_in_out;
pub use shells::find_layered_shells;
pub use two_hop::find_two_hop_exposed;
