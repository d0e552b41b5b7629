//! Deterministic call workloads

/// A fixed sequence of argument pairs
pub struct Workload {
    calls: Vec<[u64; 2]>,
}

impl Workload {
    /// Generate `len` calls over `distinct` argument pairs, biased toward low ids
    pub fn skewed(len: usize, distinct: u64, seed: u64) -> Self {
        let distinct = distinct.max(1);
        let mut state = seed | 1;

        let calls = (0..len)
            .map(|_| {
                // xorshift64
                state ^= state << 13;
                state ^= state >> 7;
                state ^= state << 17;

                // Product of two uniform draws skews toward small ids
                let a = state % distinct;
                let b = (state >> 32) % distinct;
                let id = (u128::from(a) * u128::from(b) / u128::from(distinct)) as u64;
                [id, id + 1]
            })
            .collect();

        Self { calls }
    }

    /// Iterate the calls as argument slices
    pub fn calls(&self) -> impl Iterator<Item = &[u64]> + '_ {
        self.calls.iter().map(|pair| pair.as_slice())
    }

    /// Number of calls
    pub fn call_count(&self) -> usize {
        self.calls.len()
    }
}
