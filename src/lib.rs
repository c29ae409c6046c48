/*!
Initial state and buffer layout for a 2D granular impact simulation: a packed
lattice of equal discs and one impactor falling onto it.
*/

mod platform;
mod simulation;

pub use simulation::*;

/// Avoids 'unused' warnings.
#[cfg(not(target_arch = "wasm32"))]
pub use platform::start;
