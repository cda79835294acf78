/// Counts presses of the panel's generic button
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HitCounter {
    count: u64,
}

impl HitCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one press and return the new total
    pub fn press(&mut self) -> u64 {
        self.count += 1;
        self.count
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// Display text, e.g. `Hits: 3`
    pub fn label(&self) -> String {
        format!("Hits: {}", self.count)
    }
}
