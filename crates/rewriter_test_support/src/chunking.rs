//! Ways of splitting one document into write calls.
//!
//! A rewriter must produce the same output however its input is split, so
//! tests run every case under several chunk plans.

use std::fmt;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BoundaryPolicy {
    /// Only split between UTF-8 characters.
    Utf8Aligned,
    /// Split anywhere, including inside multi-byte characters.
    ByteStream,
}

impl fmt::Display for BoundaryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryPolicy::Utf8Aligned => f.write_str("utf8"),
            BoundaryPolicy::ByteStream => f.write_str("bytes"),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ChunkPlan {
    /// Every chunk has `size` bytes, except possibly the last.
    Fixed { size: usize, policy: BoundaryPolicy },
    /// Chunk sizes in order; whatever remains is one final chunk.
    Sizes {
        sizes: Vec<usize>,
        policy: BoundaryPolicy,
    },
    /// Split points; normalized to sorted, unique and inside the input.
    Boundaries {
        indices: Vec<usize>,
        policy: BoundaryPolicy,
    },
}

impl fmt::Display for ChunkPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChunkPlan::Fixed { size, policy } => write!(f, "fixed size={size} policy={policy}"),
            ChunkPlan::Sizes { sizes, policy } => {
                write!(f, "sizes policy={policy} sizes={sizes:?}")
            }
            ChunkPlan::Boundaries { indices, policy } => {
                write!(f, "boundaries policy={policy} indices={indices:?}")
            }
        }
    }
}

impl ChunkPlan {
    pub fn fixed(size: usize) -> Self {
        Self::Fixed {
            size,
            policy: BoundaryPolicy::Utf8Aligned,
        }
    }

    pub fn fixed_unaligned(size: usize) -> Self {
        Self::Fixed {
            size,
            policy: BoundaryPolicy::ByteStream,
        }
    }

    pub fn sizes_unaligned(sizes: impl Into<Vec<usize>>) -> Self {
        Self::Sizes {
            sizes: sizes.into(),
            policy: BoundaryPolicy::ByteStream,
        }
    }

    pub fn boundaries(indices: impl Into<Vec<usize>>) -> Self {
        Self::Boundaries {
            indices: indices.into(),
            policy: BoundaryPolicy::Utf8Aligned,
        }
    }

    pub fn boundaries_unaligned(indices: impl Into<Vec<usize>>) -> Self {
        Self::Boundaries {
            indices: indices.into(),
            policy: BoundaryPolicy::ByteStream,
        }
    }

    /// Split `input` into chunks.
    ///
    /// For `Utf8Aligned` plans, split points inside a character are moved
    /// forward to the next character boundary.
    pub fn split<'a>(&self, input: &'a str) -> Vec<&'a [u8]> {
        let len = input.len();
        let mut points = match self {
            ChunkPlan::Fixed { size, .. } => {
                assert!(*size > 0, "chunk size must be > 0");
                (1..len.div_ceil(*size)).map(|i| i * size).collect()
            }
            ChunkPlan::Sizes { sizes, .. } => {
                let mut offset = 0;
                let mut points = Vec::with_capacity(sizes.len());
                for size in sizes {
                    assert!(*size > 0, "chunk size must be > 0");
                    offset += size;
                    points.push(offset);
                }
                points
            }
            ChunkPlan::Boundaries { indices, .. } => indices.clone(),
        };
        if self.policy() == BoundaryPolicy::Utf8Aligned {
            for point in &mut points {
                while *point < len && !input.is_char_boundary(*point) {
                    *point += 1;
                }
            }
        }
        points.retain(|&point| point > 0 && point < len);
        points.sort_unstable();
        points.dedup();

        let bytes = input.as_bytes();
        let mut chunks = Vec::with_capacity(points.len() + 1);
        let mut last = 0;
        for point in points {
            chunks.push(&bytes[last..point]);
            last = point;
        }
        if last < len {
            chunks.push(&bytes[last..]);
        }
        chunks
    }

    pub fn policy(&self) -> BoundaryPolicy {
        match self {
            ChunkPlan::Fixed { policy, .. }
            | ChunkPlan::Sizes { policy, .. }
            | ChunkPlan::Boundaries { policy, .. } => *policy,
        }
    }
}

/// Plans every case is run under: small fixed sizes, irregular sizes, every
/// byte boundary for short inputs and splits around markup delimiters.
pub fn deterministic_chunk_plans(input: &str) -> Vec<ChunkPlan> {
    let mut plans = vec![ChunkPlan::fixed(64)];
    for size in [1usize, 2, 3, 7, 16] {
        plans.push(ChunkPlan::fixed_unaligned(size));
    }
    plans.push(ChunkPlan::sizes_unaligned(vec![1, 1, 2, 1, 4, 8, 16, 3, 7]));
    if input.len() > 1 && input.len() <= 128 {
        plans.push(ChunkPlan::boundaries_unaligned((1..input.len()).collect::<Vec<_>>()));
    }
    let semantic = semantic_boundaries(input, 256);
    if !semantic.is_empty() {
        plans.push(ChunkPlan::boundaries(semantic.clone()));
        plans.push(ChunkPlan::boundaries_unaligned(semantic));
    }
    plans
}

/// A reproducible pseudo-random plan.
pub fn random_chunk_plan(input: &str, seed: u64) -> ChunkPlan {
    let mut rng = LcgRng::new(seed);
    let len = input.len();
    if len <= 1 {
        return ChunkPlan::fixed_unaligned(1);
    }
    if rng.gen_ratio(1, 2) {
        let count = rng.gen_range_usize(1, len.min(32) + 1);
        let mut sizes = Vec::with_capacity(count);
        for _ in 0..count {
            let max = if rng.gen_ratio(7, 10) { 8 } else { len };
            sizes.push(rng.gen_range_usize(1, max + 1));
        }
        ChunkPlan::sizes_unaligned(sizes)
    } else {
        let count = rng.gen_range_usize(1, len.min(16) + 1);
        let indices = (0..count).map(|_| rng.gen_range_usize(1, len)).collect::<Vec<_>>();
        ChunkPlan::boundaries_unaligned(indices)
    }
}

fn semantic_boundaries(input: &str, max_points: usize) -> Vec<usize> {
    let bytes = input.as_bytes();
    let mut out = Vec::new();
    for (idx, &byte) in bytes.iter().enumerate() {
        if matches!(
            byte,
            b'<' | b'>' | b'&' | b';' | b'"' | b'\'' | b'-' | b'/' | b'=' | b' ' | b'!'
        ) {
            out.push(idx);
            if idx + 1 < bytes.len() {
                out.push(idx + 1);
            }
        }
    }
    out.retain(|&idx| idx > 0);
    out.dedup();
    out.truncate(max_points);
    out
}

struct LcgRng {
    state: u64,
}

impl LcgRng {
    fn new(seed: u64) -> Self {
        let state = if seed == 0 { 0x9e3779b97f4a7c15 } else { seed };
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.state
    }

    fn gen_range_usize(&mut self, start: usize, end: usize) -> usize {
        assert!(start < end, "invalid range: {start}..{end}");
        let span = (end - start) as u64;
        (self.next_u64() % span) as usize + start
    }

    fn gen_ratio(&mut self, numerator: u32, denominator: u32) -> bool {
        assert!(denominator > 0, "invalid denominator: {denominator}");
        let roll = (self.next_u64() % denominator as u64) as u32;
        roll < numerator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joined(chunks: &[&[u8]]) -> Vec<u8> {
        chunks.concat()
    }

    #[test]
    fn every_plan_covers_the_input() {
        let input = "<p title='é'>ünïcode & <b>text</b></p>";
        let mut plans = deterministic_chunk_plans(input);
        plans.extend((1..20).map(|seed| random_chunk_plan(input, seed)));
        for plan in plans {
            let chunks = plan.split(input);
            assert_eq!(joined(&chunks), input.as_bytes(), "plan {plan}");
            assert!(chunks.iter().all(|chunk| !chunk.is_empty()), "plan {plan}");
        }
    }

    #[test]
    fn aligned_plans_never_split_characters() {
        let input = "ééé";
        let chunks = ChunkPlan::boundaries(vec![1]).split(input);
        assert_eq!(chunks, vec!["é".as_bytes(), "éé".as_bytes()]);
        let chunks = ChunkPlan::fixed_unaligned(1).split(input);
        assert_eq!(chunks.len(), input.len());
    }

    #[test]
    fn random_plans_are_reproducible() {
        let input = "<div>some document</div>";
        assert_eq!(random_chunk_plan(input, 7), random_chunk_plan(input, 7));
    }
}
