pub mod project;
pub mod run;
pub mod seats;
pub mod states;
pub mod types;

pub use project::{Projection, project, project_cmd};
pub use run::run_cmd;
pub use seats::seats_cmd;
pub use states::states_cmd;
