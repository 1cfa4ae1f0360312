// Docker supervision — subprocess invocation, status, compose lifecycle, daemon wait.

pub mod classify;
pub mod engine;
pub mod lifecycle;
pub mod run;
pub mod supervisor;
pub mod testing;
pub mod types;
mod wait;

pub use classify::classify_error;
pub use run::{CommandRunner, InvokeError, SystemRunner};
pub use supervisor::{Supervisor, SupervisorOptions};
pub use types::{
    BuildOptions, ClassifiedError, CommandOutput, CommandSpec, ContainerDetails, ContainerState,
    ContainerStatus, DaemonStatus, ErrorCode, FullStatus, LifecycleResult, StartOptions,
    StopOptions,
};
