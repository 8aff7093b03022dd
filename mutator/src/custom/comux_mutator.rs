use core::marker::PhantomData;
use std::borrow::Cow;

use libafl::inputs::{HasMutatorBytes, Input, ResizableMutator};
use libafl::mutators::{MutationResult, Mutator};
use libafl::state::{HasCorpus, HasRand};
use libafl::Error;
use libafl_bolts::rands::Rand;
use libafl_bolts::Named;
use rand::rngs::StdRng;
use rand::SeedableRng;

use comux::Manifest;

use crate::coordinator::parse_lenient;
use crate::dict::Dictionary;
use crate::strategy;

/// A LibAFL mutator that keeps comux containers well-formed: the input is
/// parsed, one structure-preserving strategy is applied, and the result is
/// re-encoded over the input bytes. Inputs that don't parse as containers
/// are skipped rather than shredded.
pub struct ComuxMutator<S> {
    dicts: Vec<Dictionary>,
    phantom: PhantomData<S>,
}

impl<S> ComuxMutator<S> {
    pub fn new(dicts: Vec<Dictionary>) -> Self {
        Self {
            dicts,
            phantom: PhantomData,
        }
    }
}

impl<S> Named for ComuxMutator<S> {
    fn name(&self) -> &Cow<'static, str> {
        &Cow::Borrowed("ComuxMutator")
    }
}

impl<S, I> Mutator<I, S> for ComuxMutator<S>
where
    S: HasRand + HasCorpus<I>,
    I: Input + HasMutatorBytes + ResizableMutator<u8>,
{
    fn mutate(&mut self, state: &mut S, input: &mut I) -> Result<MutationResult, Error> {
        let state_u64 = state.rand_mut().next();
        let mut rng = StdRng::seed_from_u64(state_u64);

        let Some((mut header, mut chunks)) = parse_lenient(input.mutator_bytes()) else {
            return Ok(MutationResult::Skipped);
        };
        if strategy::mutate_once(&mut header, &mut chunks, &self.dicts, &mut rng, None).is_none() {
            return Ok(MutationResult::Skipped);
        }

        let mut manifest = Manifest { header, chunks };
        let new_bytes = manifest.to_bytes();
        input.resize(0, 0);
        input.extend(&new_bytes);
        Ok(MutationResult::Mutated)
    }

    fn post_exec(
        &mut self,
        _state: &mut S,
        _new_corpus_id: Option<libafl::corpus::CorpusId>,
    ) -> Result<(), Error> {
        Ok(())
    }
}
