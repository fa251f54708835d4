//! Command implementations.

pub mod models;
pub mod run;
pub mod validate;

pub use self::models::execute_models;
pub use self::run::execute_run;
pub use self::validate::execute_validate;
