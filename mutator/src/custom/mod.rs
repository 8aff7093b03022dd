//! Custom LibAFL components for comux-shaped inputs.

mod comux_mutator;

pub use comux_mutator::ComuxMutator;
