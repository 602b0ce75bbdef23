//! Data module - CSV loading and the in-memory dataset

mod dataset;
mod loader;

pub use dataset::{Dataset, Field, Record};
pub use loader::DataLoader;

#[cfg(test)]
pub(crate) use dataset::tests::{record, sample_dataset};
