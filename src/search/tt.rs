use crate::moves::types::Move;

// Make sure MATE_THRESHOLD matches what we define in search.rs (30000)
pub const MATE_THRESHOLD: i32 = 30000;

/// Entries per bucket. Four ways lets same-index collisions coexist instead
/// of stomping each other every time two positions hash to the same slot.
const BUCKET_WAYS: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NodeType {
    Exact = 0,
    LowerBound = 1, // Beta cutoff (failed high)
    UpperBound = 2, // Alpha cutoff (failed low)
}

#[derive(Clone, Copy, Debug)]
pub struct TTEntry {
    pub key: u64,
    pub best_move: Option<Move>,
    pub score: i16,
    pub depth: u8,
    pub bound: u8, // 0=Exact, 1=Lower, 2=Upper
    pub generation: u8,
}

impl TTEntry {
    const EMPTY: TTEntry = TTEntry {
        key: 0,
        best_move: None,
        score: 0,
        depth: 0,
        bound: 0,
        generation: 0,
    };
}

pub struct TranspositionTable {
    buckets: Vec<[TTEntry; BUCKET_WAYS]>,
    pub generation: u8,
}

impl TranspositionTable {
    pub fn new(size_mb: usize) -> Self {
        let entry_size = std::mem::size_of::<TTEntry>();
        let num_entries = (size_mb * 1024 * 1024) / entry_size;

        // Round down to a power of 2, then split into 4-way buckets.
        let mut capacity = BUCKET_WAYS;
        while capacity * 2 <= num_entries {
            capacity *= 2;
        }
        let num_buckets = capacity / BUCKET_WAYS;

        Self {
            buckets: vec![[TTEntry::EMPTY; BUCKET_WAYS]; num_buckets],
            generation: 0,
        }
    }

    pub fn new_search(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    pub fn clear(&mut self) {
        for bucket in self.buckets.iter_mut() {
            *bucket = [TTEntry::EMPTY; BUCKET_WAYS];
        }
        self.generation = 0;
    }

    #[inline(always)]
    fn bucket_index(&self, key: u64) -> usize {
        (key as usize) & (self.buckets.len() - 1)
    }

    pub fn save(
        &mut self,
        key: u64,
        mv: Option<Move>,
        score: i32,
        depth: u8,
        bound: u8,
        _ply: i32,
    ) {
        let score_i16 = score.clamp(-32000, 32000) as i16;
        let generation = self.generation;
        let bucket = &mut self.buckets[self.bucket_index(key)];

        // Same position already in the bucket: refresh in place.
        if let Some(slot) = bucket.iter_mut().find(|e| e.key == key) {
            if depth >= slot.depth || slot.generation != generation {
                let best_move = mv.or(slot.best_move);
                *slot = TTEntry {
                    key,
                    best_move,
                    score: score_i16,
                    depth,
                    bound,
                    generation,
                };
            }
            return;
        }

        // Otherwise take an empty way if one exists.
        if let Some(slot) = bucket.iter_mut().find(|e| e.key == 0) {
            *slot = TTEntry {
                key,
                best_move: mv,
                score: score_i16,
                depth,
                bound,
                generation,
            };
            return;
        }

        // Prefer evicting a stale-generation entry, shallowest first;
        // otherwise evict the shallowest entry in the bucket overall.
        let victim = bucket
            .iter_mut()
            .filter(|e| e.generation != generation)
            .min_by_key(|e| e.depth)
            .unwrap_or_else(|| bucket.iter_mut().min_by_key(|e| e.depth).unwrap());

        *victim = TTEntry {
            key,
            best_move: mv,
            score: score_i16,
            depth,
            bound,
            generation,
        };
    }

    pub fn probe(
        &self,
        key: u64,
        _depth: u8,
        _alpha: i32,
        _beta: i32,
        _ply: i32,
    ) -> Option<(Option<Move>, i32, u8, u8)> {
        let bucket = &self.buckets[self.bucket_index(key)];
        bucket
            .iter()
            .find(|e| e.key == key)
            .map(|e| (e.best_move, e.score as i32, e.depth, e.bound))
    }
}
