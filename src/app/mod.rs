pub mod controller;
pub mod intent;
pub mod state;

pub use controller::{AppController, CommandOutcome};
pub use intent::{CalcAction, Command};
pub use state::AppState;
