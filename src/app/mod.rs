mod state;
pub mod worker;

pub use state::{ActivityKind, App, Panel};
