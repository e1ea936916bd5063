/// Append-only store of per-request metric vectors. One vector per
/// successful request, in arrival order. Single writer (the request loop);
/// read in full at report time.
#[derive(Debug, Default)]
pub struct SampleStore {
    samples: Vec<Vec<u64>>,
}

impl SampleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, metrics: Vec<u64>) {
        self.samples.push(metrics);
    }

    pub fn all(&self) -> &[Vec<u64>] {
        &self.samples
    }

    pub fn count(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
