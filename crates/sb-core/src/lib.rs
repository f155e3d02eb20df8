pub mod error;
pub mod project;
pub mod snapshot;
pub mod types;
pub mod value;
pub mod variable;

pub use error::StoryError;
pub use project::*;
pub use snapshot::VariableSnapshot;
pub use types::*;
pub use value::*;
pub use variable::*;
