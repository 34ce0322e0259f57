mod build;
mod clean;
mod create;
mod run;

pub use build::cmd_build;
pub use clean::cmd_clean;
pub use create::cmd_create;
pub use run::cmd_run;
