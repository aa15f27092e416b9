pub mod assets;
pub mod blessing;
pub mod health;
