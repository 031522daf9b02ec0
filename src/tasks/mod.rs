pub mod delay;
pub mod runner;
