//! SeaORM entities for the `users` and `tasks` tables.

pub mod prelude;

pub mod sea_orm_active_enums;
pub mod task;
pub mod user;
