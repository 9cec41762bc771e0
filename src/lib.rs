pub mod astro;
pub mod consts;
pub mod error;
pub mod file;
pub mod math;
pub mod planner;
