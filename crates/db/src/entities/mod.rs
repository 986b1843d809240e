//! `SeaORM` entity definitions.

pub mod forms;
pub mod submissions;
pub mod users;
