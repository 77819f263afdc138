//! Domain types

pub mod bar;

pub use bar::Bar;
