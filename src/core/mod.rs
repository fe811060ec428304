pub mod config;
pub mod effect;
pub mod palette;
pub mod particle;
