pub mod backend;
pub mod env;
pub mod spaces;

pub use backend::{ButtonPresses, EmulationBackend, Frame, Info, NUM_BUTTONS};
pub use env::{RenderMode, StreetFighterEnv, OBS_SIZE};
