//! The six manifest transformations and the strategy-selection loop.
//!
//! Every strategy leaves the container well-formed: connection ids stay in
//! range, every connection keeps at least one chunk, and the relative
//! delivery order of surviving chunks within a connection is preserved.

use comux::{flags, Chunk, Header};
use rand::Rng;

use crate::dict::Dictionary;
use crate::havoc;

pub const STRATEGY_COUNT: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// One blind twiddle of a random chunk's payload.
    DataHavoc,
    /// Reverse a sub-range of a payload, or swap two of its bytes.
    DataExtra,
    /// Move a chunk's schedule value within its same-connection window.
    SchedBump,
    /// Split one chunk's payload across two chunks.
    Split,
    /// Merge two delivery-adjacent chunks of one connection.
    Splice,
    /// Replace a dictionary word in a payload with another from the same
    /// dictionary.
    DictSwap,
}

pub const ALL_STRATEGIES: [Strategy; STRATEGY_COUNT] = [
    Strategy::DataHavoc,
    Strategy::DataExtra,
    Strategy::SchedBump,
    Strategy::Split,
    Strategy::Splice,
    Strategy::DictSwap,
];

impl Strategy {
    /// Short tag used for corpus-file naming.
    pub fn tag(self) -> &'static str {
        match self {
            Strategy::DataHavoc => "chunk_havoc",
            Strategy::DataExtra => "chunk_extra",
            Strategy::SchedBump => "chunk_sched_bump",
            Strategy::Split => "chunk_split",
            Strategy::Splice => "chunk_splice",
            Strategy::DictSwap => "chunk_dict_swap",
        }
    }

    fn index(self) -> usize {
        ALL_STRATEGIES
            .iter()
            .position(|s| *s == self)
            .expect("strategy is listed")
    }
}

/// Picks a random still-available strategy, walking forward from a random
/// starting point.
fn choose(rng: &mut impl Rng, unavailable: &[bool; STRATEGY_COUNT]) -> Option<Strategy> {
    let start = rng.random_range(0..STRATEGY_COUNT);
    (0..STRATEGY_COUNT)
        .map(|k| (start + k) % STRATEGY_COUNT)
        .find(|&i| !unavailable[i])
        .map(|i| ALL_STRATEGIES[i])
}

/// Applies exactly one strategy to the parsed container. Strategies the
/// manifest cannot support are disqualified up front; a strategy that finds
/// no suitable chunk at runtime is marked unavailable and another is picked.
/// Returns the strategy that ran, or `None` when every strategy was
/// exhausted and the container is unchanged.
pub fn mutate_once(
    header: &mut Header,
    chunks: &mut Vec<Chunk>,
    dicts: &[Dictionary],
    rng: &mut impl Rng,
    forced: Option<Strategy>,
) -> Option<Strategy> {
    if chunks.is_empty() {
        return None;
    }

    let mut unavailable = [false; STRATEGY_COUNT];
    if header.num_conns < 2 {
        unavailable[Strategy::SchedBump.index()] = true;
    }
    if dicts.is_empty() {
        unavailable[Strategy::DictSwap.index()] = true;
    }

    let mut strat = forced.or_else(|| choose(rng, &unavailable));
    while let Some(s) = strat {
        let applied = match s {
            Strategy::DataHavoc => {
                let idx = rng.random_range(0..chunks.len());
                havoc::surgical_havoc(&mut chunks[idx].data, rng);
                true
            }
            Strategy::DataExtra => {
                let idx = rng.random_range(0..chunks.len());
                data_extra(&mut chunks[idx].data, rng);
                true
            }
            Strategy::SchedBump => sched_bump(chunks, rng),
            Strategy::Split => {
                if split(chunks, rng) {
                    header.num_chunks += 1;
                    true
                } else {
                    false
                }
            }
            Strategy::Splice => {
                if splice(header.num_conns, chunks, rng) {
                    header.num_chunks -= 1;
                    true
                } else {
                    false
                }
            }
            Strategy::DictSwap => dict_swap(chunks, dicts, rng),
        };
        if applied {
            tracing::debug!("applied strategy {}", s.tag());
            return Some(s);
        }
        tracing::debug!("strategy {} found no suitable chunk", s.tag());
        unavailable[s.index()] = true;
        strat = choose(rng, &unavailable);
    }
    None
}

/// Reverses a random sub-range, or swaps two byte positions. Payloads too
/// small for either fall back to the havoc primitive.
fn data_extra(data: &mut [u8], rng: &mut impl Rng) {
    let len = data.len();
    if len >= 3 && rng.random_bool(0.5) {
        let size = rng.random_range(0..len);
        let idx = rng.random_range(0..len - size.max(1) + 1);
        data[idx..idx + size].reverse();
    } else if len >= 2 {
        let a = rng.random_range(0..len);
        let mut b = a;
        while b == a {
            b = rng.random_range(0..len);
        }
        data.swap(a, b);
    } else {
        havoc::surgical_havoc(data, rng);
    }
}

/// The window `[lo, hi)` a chunk's schedule value can move inside without
/// changing its delivery order relative to other chunks on the same
/// connection: `lo` is the next-lower neighbor's schedule plus one (or 0
/// with no lower neighbor), `hi` is the next-higher neighbor's schedule (or
/// one past the largest schedule in the file). `None` when the window has no
/// room for a different value.
pub(crate) fn sched_bounds(chunks: &[Chunk], idx: usize) -> Option<(u32, u32)> {
    let me = &chunks[idx];
    let mut max_sched = 0u32;
    let mut lower: Option<i64> = None;
    let mut higher: Option<i64> = None;
    for (i, c) in chunks.iter().enumerate() {
        max_sched = max_sched.max(c.sched);
        if i == idx || c.conn_id != me.conn_id {
            continue;
        }
        let diff = c.sched as i64 - me.sched as i64;
        if diff < 0 && lower.map_or(true, |d| diff > d) {
            lower = Some(diff);
        }
        if diff > 0 && higher.map_or(true, |d| diff < d) {
            higher = Some(diff);
        }
    }

    let lo = match lower {
        None => 0,
        Some(d) => me.sched as i64 + d + 1,
    };
    let hi = match higher {
        None => max_sched as i64 + 1,
        Some(d) => me.sched as i64 + d,
    }
    .min(u32::MAX as i64);
    if hi - lo < 2 {
        return None;
    }
    Some((lo as u32, hi as u32))
}

/// Picks a chunk with schedule wiggle room and moves its schedule to a
/// different value inside the window.
fn sched_bump(chunks: &mut [Chunk], rng: &mut impl Rng) -> bool {
    let n = chunks.len();
    let start = rng.random_range(0..n);
    for k in 0..n {
        let idx = (start + k) % n;
        let Some((lo, hi)) = sched_bounds(chunks, idx) else {
            continue;
        };
        let current = chunks[idx].sched;
        let mut fresh = current;
        while fresh == current {
            fresh = rng.random_range(lo..hi);
        }
        tracing::debug!("schedule bumped from {current} to {fresh} within [{lo}, {hi})");
        chunks[idx].sched = fresh;
        return true;
    }
    false
}

/// Splits a chunk's payload at a random interior position. The original
/// keeps the left half; a new chunk on the same connection takes the right
/// half and slots in directly after it in delivery order. A response wait
/// belongs to whichever piece is delivered last, so `AWAIT_RESPONSE` moves
/// to the new chunk.
fn split(chunks: &mut Vec<Chunk>, rng: &mut impl Rng) -> bool {
    let n = chunks.len();
    let start = rng.random_range(0..n);
    for k in 0..n {
        let idx = (start + k) % n;
        if chunks[idx].data.len() < 2 {
            continue;
        }
        let Some((lo, hi)) = sched_bounds(chunks, idx) else {
            continue;
        };

        let at = rng.random_range(1..chunks[idx].data.len());
        let right = chunks[idx].data.split_off(at);
        let original = &mut chunks[idx];
        original.data_len = original.data.len() as u64;

        let mut fresh = Chunk::with_data(original.conn_id, original.sched.saturating_add(1), 0, right);
        while fresh.sched >= hi && original.sched > lo {
            original.sched -= 1;
            fresh.sched -= 1;
        }
        if original.flags & flags::AWAIT_RESPONSE != 0 {
            original.flags &= !flags::AWAIT_RESPONSE;
            fresh.flags |= flags::AWAIT_RESPONSE;
        }
        tracing::debug!(
            "split chunk {idx} into payloads of {} and {} bytes (scheds {} and {})",
            original.data.len(),
            fresh.data.len(),
            original.sched,
            fresh.sched
        );
        chunks.insert(idx + 1, fresh);
        return true;
    }
    false
}

/// Merges two chunks of one connection that are adjacent in its delivery
/// order: the later chunk's payload is appended to the earlier one and the
/// later chunk is deleted, propagating its response wait.
fn splice(num_conns: u32, chunks: &mut Vec<Chunk>, rng: &mut impl Rng) -> bool {
    if chunks.len() < 2 || num_conns == 0 {
        return false;
    }

    let mut counts = vec![0u32; num_conns as usize];
    for c in chunks.iter() {
        counts[c.conn_id as usize] += 1;
    }
    let start = rng.random_range(0..num_conns as usize);
    let Some(conn_id) = (0..num_conns as usize)
        .map(|k| (start + k) % num_conns as usize)
        .find(|&cid| counts[cid] > 1)
    else {
        return false;
    };

    // this connection's chunks, sorted into delivery order
    let mut idxs: Vec<usize> = (0..chunks.len())
        .filter(|&i| chunks[i].conn_id == conn_id as u32)
        .collect();
    idxs.sort_by_key(|&i| chunks[i].sched);

    let pair = rng.random_range(0..idxs.len() - 1);
    let (earlier, later) = (idxs[pair], idxs[pair + 1]);

    let moved = std::mem::take(&mut chunks[later].data);
    let moved_flags = chunks[later].flags;
    chunks[earlier].append_data(&moved);
    if moved_flags & flags::AWAIT_RESPONSE != 0 {
        chunks[earlier].flags |= flags::AWAIT_RESPONSE;
    }
    tracing::debug!(
        "spliced chunks {earlier} and {later} (conn_id={conn_id}) into one of {} bytes",
        chunks[earlier].data.len()
    );
    chunks.remove(later);
    true
}

/// Finds a chunk containing any word from any dictionary and replaces one
/// occurrence with a different word from the same dictionary.
fn dict_swap(chunks: &mut [Chunk], dicts: &[Dictionary], rng: &mut impl Rng) -> bool {
    if dicts.is_empty() {
        return false;
    }
    let n = chunks.len();
    let start = rng.random_range(0..n);
    for k in 0..n {
        let chunk = &mut chunks[(start + k) % n];
        for dict in dicts {
            let words = dict.words();
            let wstart = rng.random_range(0..words.len());
            let Some((found, offset)) = (0..words.len())
                .map(|j| (wstart + j) % words.len())
                .find_map(|wi| find_subslice(&chunk.data, &words[wi]).map(|off| (wi, off)))
            else {
                continue;
            };

            let mut swap = found;
            while swap == found {
                swap = rng.random_range(0..words.len());
            }
            let old_len = words[found].len();
            let replacement = &words[swap];
            let mut fresh = Vec::with_capacity(chunk.data.len() - old_len + replacement.len());
            fresh.extend_from_slice(&chunk.data[..offset]);
            fresh.extend_from_slice(replacement);
            fresh.extend_from_slice(&chunk.data[offset + old_len..]);
            chunk.data = fresh;
            chunk.data_len = chunk.data.len() as u64;
            tracing::debug!(
                "swapped dictionary word {:?} for {:?}",
                String::from_utf8_lossy(&words[found]),
                String::from_utf8_lossy(replacement)
            );
            return true;
        }
    }
    false
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}
