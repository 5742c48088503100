//! Test modules for the executor crate.

mod helpers;
