mod condition;
mod engine;
mod helpers;
mod interpolate;
mod script;

pub use condition::evaluate_condition;
pub use engine::{StoryEngine, StoryEngineOptions, DEFAULT_MAX_AUTO_ADVANCE};
pub use interpolate::interpolate;
pub use script::{extract_script_fragments, strip_script_fragments, ScriptExecutor, ScriptLimits};
