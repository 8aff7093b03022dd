//! The coordinator behind the host fuzzer's custom-mutator hooks: judging
//! queue entries, scaling the per-input fuzz budget, one mutation per fuzz
//! call, describe tags, and the trimming state machine. The host treats this
//! as an opaque handle; every buffer handed back is owned here.

use std::ffi::CString;
use std::fs::File;
use std::io::{BufReader, Seek, SeekFrom};
use std::path::Path;

use comux::{flags, Chunk, Header, Manifest, CHUNK_HEADER_LEN, HEADER_LEN, MAX_CHUNKS, MAX_CONNS};
use gurthang_util::fatality;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{self, MutConfig};
use crate::dict::{Dictionary, MAX_DICTS};
use crate::strategy::{self, Strategy};

pub struct GurthangMutator {
    rng: StdRng,
    config: MutConfig,
    dicts: Vec<Dictionary>,
    /// Output of the most recent fuzz/havoc/trim call.
    out: Vec<u8>,
    describe: String,
    describe_c: CString,
    last_fuzz_count: u32,
    /// Strategy override for the next fuzz call, used by the havoc hook.
    forced: Option<Strategy>,
    trim: Option<TrimState>,
}

impl GurthangMutator {
    /// Initializes from the environment: log sink, budget bounds, trim cap,
    /// dictionaries. Bad configuration is fatal here, before any fuzzing
    /// begins.
    pub fn new(seed: u64) -> GurthangMutator {
        let debug = std::env::var(config::ENV_DEBUG).is_ok();
        gurthang_util::log::init_from_env(config::ENV_LOG, debug);

        let cfg = MutConfig::from_env();
        if cfg.dict_paths.len() > MAX_DICTS {
            fatality!("you cannot specify more than {MAX_DICTS} dictionaries");
        }
        let mut dicts = Vec::with_capacity(cfg.dict_paths.len());
        for path in &cfg.dict_paths {
            match Dictionary::from_file(path) {
                Ok(dict) => {
                    tracing::info!("loaded dictionary with {} words: {}", dict.len(), path.display());
                    dicts.push(dict);
                }
                Err(err) => fatality!("the dictionary file couldn't be loaded: {err}"),
            }
        }

        let mutator = GurthangMutator::with_config(seed, cfg, dicts);
        tracing::info!("mutator initialized");
        mutator
    }

    /// Direct constructor, bypassing the environment.
    pub fn with_config(seed: u64, config: MutConfig, dicts: Vec<Dictionary>) -> GurthangMutator {
        GurthangMutator {
            rng: StdRng::seed_from_u64(seed),
            config,
            dicts,
            out: Vec::new(),
            describe: String::from("ss_"),
            describe_c: CString::default(),
            last_fuzz_count: 0,
            forced: None,
            trim: None,
        }
    }

    /// Accept/reject veto over a queue entry the host fuzzer proposes to
    /// keep. Parses the header and every chunk header (payloads are skipped,
    /// not loaded) and rejects anything the replay side would refuse: parse
    /// errors, bound violations, out-of-range connection ids, unknown flag
    /// bits, payload lengths overrunning the file, or a connection with no
    /// chunks.
    pub fn judge(&mut self, path: &Path) -> bool {
        tracing::debug!("judging test case: {}", path.display());
        let Ok(file) = File::open(path) else {
            return false;
        };
        let size = match file.metadata() {
            Ok(meta) => meta.len(),
            Err(_) => return false,
        };
        let mut src = BufReader::new(file);

        let Ok(header) = Header::read_from(&mut src) else {
            return false;
        };
        if header.validate().is_err() {
            return false;
        }

        let mut conn_counts = vec![0u32; header.num_conns as usize];
        let mut pos = HEADER_LEN as u64;
        for _ in 0..header.num_chunks {
            let Ok(chunk) = Chunk::header_read_from(&mut src) else {
                return false;
            };
            pos += CHUNK_HEADER_LEN as u64;
            if chunk.validate(header.num_conns).is_err() {
                return false;
            }
            conn_counts[chunk.conn_id as usize] += 1;

            pos = match pos.checked_add(chunk.data_len) {
                Some(next) if next <= size => next,
                _ => return false, // the declared payload overruns the file
            };
            if src.seek(SeekFrom::Start(pos)).is_err() {
                return false;
            }
        }
        conn_counts.iter().all(|&count| count > 0)
    }

    /// How many fuzz attempts this input deserves, in
    /// `[fuzz_min, fuzz_max]`. Multi-connection inputs and inputs with finer
    /// chunking get scaled up, since they carry richer orderings to explore;
    /// plain inputs get scaled back down once the running budget nears the
    /// top of the range.
    pub fn fuzz_count(&mut self, input: &[u8]) -> u32 {
        let min = self.config.fuzz_min;
        let max = self.config.fuzz_max;
        let current = self.last_fuzz_count.max(min);
        let reduced = (current / 8).max(min);
        let threshold = ((max.saturating_sub(min) as u64 * 3) / 4) as u32 + min;
        let mut adjusted = current as u64;

        let reduce = |mutator: &mut Self| {
            mutator.last_fuzz_count = reduced;
            reduced
        };

        let Ok((header, mut pos)) = Header::decode(input) else {
            return reduce(self);
        };
        if header.num_conns == 0
            || header.num_conns > MAX_CONNS
            || header.num_chunks == 0
            || header.num_chunks > MAX_CHUNKS
        {
            return reduce(self);
        }

        if header.num_conns > 1 {
            adjusted = adjusted.saturating_mul(header.num_conns.max(3) as u64);
        } else if self.last_fuzz_count >= threshold {
            adjusted /= 2;
        }

        for _ in 0..header.num_chunks {
            let remainder = input.get(pos..).unwrap_or(&[]);
            let Ok((chunk, used)) = Chunk::header_decode(remainder) else {
                return reduce(self);
            };
            if chunk.validate(header.num_conns).is_err() {
                return reduce(self);
            }
            pos = pos.saturating_add(used).saturating_add(chunk.data_len as usize);
        }

        if header.num_chunks > header.num_conns {
            adjusted = adjusted.saturating_mul((header.num_chunks - header.num_conns).max(3) as u64);
        } else if self.last_fuzz_count >= threshold {
            adjusted /= 2;
        }

        let clamped = (adjusted.min(max as u64) as u32).max(min);
        tracing::debug!("adjusted fuzz count: {} -> {clamped}", self.last_fuzz_count);
        self.last_fuzz_count = clamped;
        clamped
    }

    /// One structure-aware mutation: parse, pin the version to 0, clear
    /// reserved and `NO_SHUTDOWN` flag bits, run one strategy, re-encode
    /// with recomputed offsets. Inputs too damaged to parse, or outputs that
    /// would not fit `max_len`, come back unchanged.
    pub fn fuzz(&mut self, input: &[u8], max_len: usize) -> &[u8] {
        self.describe.clear();
        self.describe.push_str("ss_");
        let forced = self.forced.take();

        self.out.clear();
        match parse_lenient(input) {
            Some((mut header, mut chunks)) => {
                if let Some(applied) =
                    strategy::mutate_once(&mut header, &mut chunks, &self.dicts, &mut self.rng, forced)
                {
                    self.describe.push_str(applied.tag());
                }
                let mut manifest = Manifest { header, chunks };
                if manifest.encoded_len() > max_len {
                    tracing::debug!("not enough buffer space to re-encode, no mutations done");
                    self.out.extend_from_slice(input);
                } else {
                    self.out = manifest.to_bytes();
                }
            }
            None => {
                tracing::debug!("input is not a usable container, leaving it unchanged");
                self.out.extend_from_slice(input);
            }
        }
        &self.out
    }

    /// The havoc-stage variant of [`GurthangMutator::fuzz`]: the strategy is
    /// pinned to payload havoc.
    pub fn havoc_mutation(&mut self, input: &[u8], max_len: usize) -> &[u8] {
        self.forced = Some(Strategy::DataHavoc);
        self.fuzz(input, max_len)
    }

    /// Probability (percent) that the host runs our havoc mutation when it
    /// considers one: always.
    pub fn havoc_probability(&self) -> u8 {
        100
    }

    /// Short tag naming the last-used strategy, for corpus-file naming.
    pub fn describe(&self) -> &str {
        &self.describe
    }

    /// C-string view of [`GurthangMutator::describe`], owned by the
    /// coordinator.
    pub fn describe_cstr(&mut self) -> &CString {
        self.describe_c = CString::new(self.describe.as_bytes()).unwrap_or_default();
        &self.describe_c
    }

    /// Starts a trimming stage: pick a random chunk, decide how many bytes
    /// each step removes, and split the case into the bytes before the
    /// chunk, the chunk itself, and the bytes after it. Returns the number
    /// of steps the host should run; 0 opts out of trimming this case.
    pub fn init_trim(&mut self, input: &[u8]) -> i32 {
        self.trim = None;

        let Ok((header, mut pos)) = Header::decode(input) else {
            return 0;
        };
        if header.num_conns == 0
            || header.num_conns > MAX_CONNS
            || header.num_chunks == 0
            || header.num_chunks > MAX_CHUNKS
        {
            return 0;
        }

        let target = self.rng.random_range(0..header.num_chunks);
        let mut chosen: Option<(Chunk, usize, usize)> = None; // (chunk, offset, span)
        for i in 0..header.num_chunks {
            let begin = pos;
            let remainder = input.get(pos..).unwrap_or(&[]);
            let Ok((mut chunk, used)) = Chunk::header_decode(remainder) else {
                return 0;
            };
            pos += used;
            if i == target {
                let taken = chunk.data_decode(&input[pos..]);
                pos += taken;
                chosen = Some((chunk, begin, used + taken));
            } else {
                pos = pos.saturating_add(chunk.data_len as usize);
            }
        }
        let Some((chunk, offset, span)) = chosen else {
            return 0;
        };
        if chunk.data.len() < 2 || offset + span > input.len() {
            return 0;
        }

        let bytes_per_step = ((0.025 * chunk.data.len() as f64).ceil() as usize).max(1);
        let mut steps = (chunk.data.len() / bytes_per_step).saturating_sub(1) as i64;
        if self.config.trim_steps_max >= 0 {
            steps = steps.min(self.config.trim_steps_max);
        }
        if steps <= 0 {
            return 0;
        }

        tracing::debug!(
            "trim stage: {steps} steps over a {}-byte chunk, removing {bytes_per_step} byte(s) per step",
            chunk.data.len()
        );
        self.trim = Some(TrimState {
            head: input[..offset].to_vec(),
            tail: input[offset + span..].to_vec(),
            snapshot: chunk.clone(),
            chunk,
            bytes_per_step,
            steps: steps as i32,
            count: 0,
            last_succeeded: true,
            success_count: 0,
        });
        steps as i32
    }

    /// One trim step: snapshot the chunk if the previous step held, delete a
    /// handful of random payload positions, and re-encode head, chunk, tail.
    pub fn trim(&mut self) -> &[u8] {
        self.out.clear();
        let Some(state) = self.trim.as_mut() else {
            return &self.out;
        };

        if state.last_succeeded {
            state.snapshot = state.chunk.clone();
        }

        let len = state.chunk.data.len();
        if len > 0 {
            let mut remove: Vec<usize> = (0..state.bytes_per_step)
                .map(|_| self.rng.random_range(0..len))
                .collect();
            // duplicate indices collapse to a single deletion
            remove.sort_unstable();
            remove.dedup();

            let source = &state.snapshot.data;
            let mut kept = Vec::with_capacity(source.len());
            let mut next = 0;
            for (i, byte) in source.iter().enumerate() {
                if next < remove.len() && remove[next] == i {
                    next += 1;
                    continue;
                }
                kept.push(*byte);
            }
            state.chunk.data = kept;
            state.chunk.data_len = state.chunk.data.len() as u64;
        }

        self.out.extend_from_slice(&state.head);
        let mut chunk_header = [0u8; CHUNK_HEADER_LEN];
        state
            .chunk
            .header_encode_into(&mut chunk_header)
            .expect("fixed-size buffer");
        self.out.extend_from_slice(&chunk_header);
        self.out.extend_from_slice(&state.chunk.data);
        self.out.extend_from_slice(&state.tail);
        &self.out
    }

    /// Outcome of the last trim step. A failed step restores the chunk from
    /// its snapshot. Once enough steps have elapsed, a success ratio under
    /// 10% returns the final step index so the host gives up early.
    pub fn post_trim(&mut self, success: bool) -> i32 {
        let Some(state) = self.trim.as_mut() else {
            return 0;
        };

        if !success {
            state.chunk = state.snapshot.clone();
        }
        state.count += 1;
        state.last_succeeded = success;
        if success {
            state.success_count += 1;
        }

        let gate = ((state.steps as f64 * 0.25).ceil() as i32).max(100);
        if state.count >= gate {
            let ratio = state.success_count as f64 / state.count as f64;
            if ratio < 0.1 {
                tracing::debug!(
                    "under a 10% trim success rate after {} steps, bailing out early",
                    state.count
                );
                return state.steps;
            }
        }
        state.count
    }
}

/// Parses as much of a container as the fuzz hook can repair: the version
/// field is pinned to 0, unknown flag bits and `NO_SHUTDOWN` are cleared,
/// and payload lengths are capped to the bytes actually present. `None`
/// means the input is too damaged to mutate structurally.
pub(crate) fn parse_lenient(bytes: &[u8]) -> Option<(Header, Vec<Chunk>)> {
    let (mut header, mut pos) = Header::decode(bytes).ok()?;
    if header.num_conns == 0
        || header.num_conns > MAX_CONNS
        || header.num_chunks == 0
        || header.num_chunks > MAX_CHUNKS
    {
        return None;
    }
    header.version = 0;

    let mut chunks = Vec::with_capacity(header.num_chunks as usize);
    for _ in 0..header.num_chunks {
        let (mut chunk, used) = Chunk::header_decode(bytes.get(pos..)?).ok()?;
        pos += used;
        if chunk.conn_id >= header.num_conns {
            return None;
        }
        // drop reserved bits, and NO_SHUTDOWN with them: a suppressed
        // half-close hangs targets that read to EOF, and the host would
        // flag the hang as a finding
        chunk.flags &= flags::ALL & !flags::NO_SHUTDOWN;
        let taken = chunk.data_decode(&bytes[pos..]);
        pos += taken;
        chunks.push(chunk);
    }
    Some((header, chunks))
}

struct TrimState {
    head: Vec<u8>,
    tail: Vec<u8>,
    chunk: Chunk,
    snapshot: Chunk,
    bytes_per_step: usize,
    steps: i32,
    count: i32,
    last_succeeded: bool,
    success_count: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use comux::Manifest;
    use std::io::Write;

    const STATIC_SEED: u64 = 7355608;

    fn mutator() -> GurthangMutator {
        GurthangMutator::with_config(STATIC_SEED, MutConfig::default(), Vec::new())
    }

    fn sample_bytes() -> Vec<u8> {
        let mut m = Manifest::new(2);
        m.push_chunk(Chunk::with_data(0, 1, 0, b"GET / HTTP/1.1\r\n\r\n".to_vec()));
        m.push_chunk(Chunk::with_data(1, 0, flags::AWAIT_RESPONSE, b"PING".to_vec()));
        m.push_chunk(Chunk::with_data(0, 2, 0, b"Host: localhost\r\n\r\n".to_vec()));
        m.to_bytes()
    }

    fn write_case(bytes: &[u8]) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(bytes).unwrap();
        f
    }

    #[test]
    fn judge_accepts_well_formed_containers() {
        let case = write_case(&sample_bytes());
        assert!(mutator().judge(case.path()));
    }

    #[test]
    fn judge_rejects_bad_magic() {
        let mut bytes = sample_bytes();
        bytes[0] = b'x';
        let case = write_case(&bytes);
        assert!(!mutator().judge(case.path()));
    }

    #[test]
    fn judge_rejects_nonzero_version() {
        let mut bytes = sample_bytes();
        bytes[8] = 7;
        let case = write_case(&bytes);
        assert!(!mutator().judge(case.path()));
    }

    #[test]
    fn judge_rejects_out_of_bounds_conn_id() {
        let mut m = Manifest::new(2);
        m.push_chunk(Chunk::with_data(0, 0, 0, b"a".to_vec()));
        m.push_chunk(Chunk::with_data(5, 1, 0, b"b".to_vec()));
        let case = write_case(&m.to_bytes());
        assert!(!mutator().judge(case.path()));
    }

    #[test]
    fn judge_rejects_unknown_flag_bits() {
        let mut m = Manifest::new(1);
        let mut chunk = Chunk::with_data(0, 0, 0, b"a".to_vec());
        chunk.flags = 0x40;
        m.push_chunk(chunk);
        let case = write_case(&m.to_bytes());
        assert!(!mutator().judge(case.path()));
    }

    #[test]
    fn judge_rejects_payload_overrunning_file() {
        let mut bytes = sample_bytes();
        // inflate the first chunk's declared length past the end of the file
        let len_field = HEADER_LEN + 4;
        bytes[len_field..len_field + 8].copy_from_slice(&100_000u64.to_le_bytes());
        let case = write_case(&bytes);
        assert!(!mutator().judge(case.path()));
    }

    #[test]
    fn judge_rejects_chunkless_connection() {
        let mut m = Manifest::new(3);
        m.push_chunk(Chunk::with_data(0, 0, 0, b"a".to_vec()));
        m.push_chunk(Chunk::with_data(2, 1, 0, b"b".to_vec()));
        let case = write_case(&m.to_bytes());
        assert!(!mutator().judge(case.path()));
    }

    #[test]
    fn judge_rejects_truncated_chunk_list() {
        let bytes = sample_bytes();
        let case = write_case(&bytes[..bytes.len() - 10]);
        assert!(!mutator().judge(case.path()));
    }

    #[test]
    fn fuzz_output_stays_well_formed() {
        let mut m = mutator();
        let input = sample_bytes();
        for _ in 0..100 {
            let out = m.fuzz(&input, 1 << 20).to_vec();
            let (manifest, _) = Manifest::decode(&out).expect("fuzz output must parse");
            assert_eq!(manifest.header.version, 0);
            assert_eq!(manifest.header.num_chunks as usize, manifest.chunks.len());
            for chunk in &manifest.chunks {
                assert!(chunk.conn_id < manifest.header.num_conns);
                assert_eq!(chunk.flags & !flags::ALL, 0);
            }
        }
    }

    #[test]
    fn fuzz_clears_no_shutdown() {
        let mut m = Manifest::new(1);
        m.push_chunk(Chunk::with_data(0, 0, flags::NO_SHUTDOWN, b"DATA".to_vec()));
        let input = m.to_bytes();

        let mut mutator = mutator();
        for _ in 0..20 {
            let out = mutator.fuzz(&input, 1 << 20).to_vec();
            let (manifest, _) = Manifest::decode(&out).unwrap();
            for chunk in &manifest.chunks {
                assert_eq!(chunk.flags & flags::NO_SHUTDOWN, 0);
            }
        }
    }

    #[test]
    fn fuzz_repairs_nonzero_version() {
        let mut input = sample_bytes();
        input[8] = 3;
        let mut m = mutator();
        let out = m.fuzz(&input, 1 << 20).to_vec();
        let (manifest, _) = Manifest::decode(&out).expect("version is repaired");
        assert_eq!(manifest.header.version, 0);
    }

    #[test]
    fn fuzz_returns_garbage_unchanged() {
        let mut m = mutator();
        let garbage = b"definitely not a container".to_vec();
        assert_eq!(m.fuzz(&garbage, 1 << 20), garbage.as_slice());
    }

    #[test]
    fn fuzz_returns_input_unchanged_when_output_cannot_fit() {
        let input = sample_bytes();
        let mut m = mutator();
        assert_eq!(m.fuzz(&input, 10), input.as_slice());
    }

    #[test]
    fn describe_names_the_last_strategy() {
        let mut m = mutator();
        let input = sample_bytes();
        m.havoc_mutation(&input, 1 << 20);
        assert_eq!(m.describe(), "ss_chunk_havoc");
        assert_eq!(m.describe_cstr().to_bytes(), b"ss_chunk_havoc");
    }

    #[test]
    fn havoc_probability_is_total() {
        assert_eq!(mutator().havoc_probability(), 100);
    }

    #[test]
    fn fuzz_count_scales_up_for_multiple_connections() {
        let mut m = mutator();
        let input = sample_bytes(); // 2 conns, 3 chunks
        let count = m.fuzz_count(&input);
        // 512 * 3 (conns) * 3 (extra chunking)
        assert_eq!(count, 4608);
        // the budget keeps compounding from the previous value until capped
        assert_eq!(m.fuzz_count(&input), crate::config::FUZZ_MAX_DEFAULT);
    }

    #[test]
    fn fuzz_count_reduces_for_unparseable_input() {
        let mut m = mutator();
        m.last_fuzz_count = 4096;
        let count = m.fuzz_count(b"junk");
        assert_eq!(count, 512); // 4096/8 = 512, already at the minimum
    }

    #[test]
    fn fuzz_count_halves_single_connection_inputs_near_the_cap() {
        let mut single = Manifest::new(1);
        single.push_chunk(Chunk::with_data(0, 0, 0, b"x".to_vec()));
        let input = single.to_bytes();

        let mut m = mutator();
        m.last_fuzz_count = 32768; // in the upper quartile of [512, 32768]
        // halved twice (one connection, no extra chunking): 32768/4 = 8192
        assert_eq!(m.fuzz_count(&input), 8192);
    }

    #[test]
    fn trim_steps_follow_chunk_size() {
        let mut m = Manifest::new(1);
        m.push_chunk(Chunk::with_data(0, 0, 0, vec![b'A'; 100]));
        let input = m.to_bytes();

        let mut mutator = mutator();
        let steps = mutator.init_trim(&input);
        // 2.5% of 100 bytes rounds up to 3 bytes per step, 100/3 - 1 = 32 steps
        assert_eq!(steps, 32);
    }

    #[test]
    fn trim_output_shrinks_and_stays_well_formed() {
        let mut m = Manifest::new(1);
        m.push_chunk(Chunk::with_data(0, 0, 0, vec![b'A'; 200]));
        let input = m.to_bytes();

        let mut mutator = mutator();
        let steps = mutator.init_trim(&input);
        assert!(steps > 0);

        let mut last_len = input.len();
        for step in 0..steps.min(10) {
            let out = mutator.trim().to_vec();
            assert!(out.len() < last_len, "a successful step always shrinks");
            let (manifest, _) = Manifest::decode(&out).expect("trimmed case must parse");
            assert_eq!(manifest.header.num_chunks, 1);
            last_len = out.len();
            assert_eq!(mutator.post_trim(true), step + 1);
        }
    }

    #[test]
    fn failed_trim_step_restores_the_chunk() {
        // a 30-byte payload trims exactly one byte per step, so lengths are
        // exact: a failed step restores the byte the attempt removed
        let mut m = Manifest::new(1);
        m.push_chunk(Chunk::with_data(0, 0, 0, vec![b'A'; 30]));
        let input = m.to_bytes();

        let mut mutator = mutator();
        assert_eq!(mutator.init_trim(&input), 29);

        let first = mutator.trim().to_vec();
        assert_eq!(first.len(), input.len() - 1);
        mutator.post_trim(false);
        let second = mutator.trim().to_vec();
        assert_eq!(second.len(), input.len() - 1);

        // whereas a successful step keeps its removal
        mutator.post_trim(true);
        let third = mutator.trim().to_vec();
        assert_eq!(third.len(), input.len() - 2);
    }

    #[test]
    fn trim_leaves_surrounding_chunks_untouched() {
        let mut m = Manifest::new(2);
        m.push_chunk(Chunk::with_data(0, 0, 0, vec![b'H'; 64]));
        m.push_chunk(Chunk::with_data(1, 1, 0, vec![b'T'; 64]));
        let input = m.to_bytes();

        let mut mutator = mutator();
        let steps = mutator.init_trim(&input);
        assert!(steps > 0);
        let out = mutator.trim().to_vec();
        let (manifest, _) = Manifest::decode(&out).expect("trimmed case must parse");
        assert_eq!(manifest.chunks.len(), 2);
        // exactly one of the two chunks shrank
        let lens: Vec<usize> = manifest.chunks.iter().map(|c| c.data.len()).collect();
        assert!(lens.contains(&64));
        assert!(lens.iter().any(|&l| l < 64));
    }

    #[test]
    fn trim_opts_out_of_damaged_or_tiny_cases() {
        let mut mutator = mutator();
        assert_eq!(mutator.init_trim(b"junk"), 0);

        let mut m = Manifest::new(1);
        m.push_chunk(Chunk::with_data(0, 0, 0, b"x".to_vec()));
        assert_eq!(mutator.init_trim(&m.to_bytes()), 0);
    }
}
