// handlers/mod.rs - one module per resource, all behind the token gate
pub mod health;
pub mod projects;
pub mod reports;
