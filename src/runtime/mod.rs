pub mod app;

pub use app::{run_app, status_report, RunArgs};
