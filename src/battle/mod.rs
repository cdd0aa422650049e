pub mod calculators;
pub mod commands;
pub mod engine;
pub mod runner;
pub mod state;

#[cfg(test)]
pub(crate) mod tests;
