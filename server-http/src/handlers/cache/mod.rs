pub mod health;
pub mod read_through;
