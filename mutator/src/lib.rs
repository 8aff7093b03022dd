//! Structure-aware mutation of comux containers.
//!
//! A grey-box fuzzer mutating a comux file blindly would shred the container
//! framing long before it found anything interesting in the payloads. This
//! crate teaches the fuzzer about the format: inputs are parsed, transformed
//! by one of six strategies that preserve the container's invariants
//! (payload havoc, byte reshuffling, schedule bumping, chunk splitting,
//! chunk splicing, dictionary swaps), and re-encoded.
//!
//! Two integration surfaces are provided:
//!
//! - [`coordinator::GurthangMutator`] plus the exported `afl_custom_*`
//!   symbols, for hosts that load a custom-mutator shared object. This
//!   covers judging queue entries, scaling the per-input fuzz budget,
//!   single-shot mutation, havoc, describe, and the three-callback trimming
//!   state machine.
//! - [`custom::ComuxMutator`], a [`libafl::mutators::Mutator`] implementation
//!   for driving the same strategies from a LibAFL campaign.

pub mod config;
pub mod coordinator;
pub mod custom;
pub mod dict;
pub mod havoc;
pub mod strategy;

mod afl;

// re-export libAFL and libAFL_bolts
pub use libafl;
pub use libafl_bolts;
