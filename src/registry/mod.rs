// 12.0: registry. creates one market per underlying, owns the shared ledger and the
// protocol parameters, and runs every market operation atomically.

mod admin;
mod core;
mod operations;
mod results;

pub use self::core::Registry;
pub use results::RegistryError;
