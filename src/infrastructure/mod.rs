pub mod clock;
pub mod iex;
pub mod sqlite;
