//! Command implementations for certcheck

pub mod batch;
pub mod check;
pub mod favorites;
pub mod watch;

pub use batch::run_batch;
pub use check::run_check;
pub use favorites::run_favorites;
pub use watch::run_watch;
