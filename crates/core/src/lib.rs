#![forbid(unsafe_code)]

pub mod demo;
pub mod lenient;
pub mod model;
pub mod time;

pub use time::Clock;
