/// Database layer
///
/// # Modules
///
/// - `pool`: connection pool lifecycle (create, acquire, health check, drain)
/// - `migrations`: schema migrations for `users`, `departments` and `beds`
///
/// Row models live in the `models` module at crate root level.

pub mod migrations;
pub mod pool;
