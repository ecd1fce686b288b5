pub mod generate_handler;

pub use generate_handler::{generate_rooms, generate_study, health_check};
