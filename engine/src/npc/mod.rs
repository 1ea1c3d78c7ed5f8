mod decision;
mod diagnostics;
mod manager;
mod registry;
mod types;

pub use decision::{Decision, DecisionEngine, DecisionError, DecisionKind, WorldView};
pub use diagnostics::{DecisionDiagnostics, DecisionFailure, DiagnosticsCollector};
pub use manager::NpcManager;
pub use registry::NpcRegistry;
pub use types::{Difficulty, NpcConfig, NpcSnake, NpcState, Personality, PersonalityConfig};
