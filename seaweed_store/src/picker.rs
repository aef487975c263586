use std::sync::Mutex;

use rand::{rngs::StdRng, Rng, SeedableRng};

/// Chooses one replica out of a lookup answer, uniformly at random.
///
/// Always picking the first location would pin all reads of a volume to one
/// server, so every call draws again. The generator sits behind a lock; a
/// poisoned lock is recovered rather than propagated.
#[derive(Debug)]
pub struct ReplicaPicker {
    rng: Mutex<StdRng>,
}

impl ReplicaPicker {
    /// Seeded from OS entropy.
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Returns `None` only for an empty slice.
    pub fn pick<'a, T>(&self, replicas: &'a [T]) -> Option<&'a T> {
        match replicas.len() {
            0 => None,
            1 => replicas.first(),
            n => {
                let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
                replicas.get(rng.random_range(0..n))
            }
        }
    }
}

impl Default for ReplicaPicker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, sync::Arc};

    use super::*;

    #[test]
    fn test_empty() {
        let picker = ReplicaPicker::from_seed(1);
        let replicas: Vec<String> = vec![];
        assert!(picker.pick(&replicas).is_none());
    }

    #[test]
    fn test_spreads_across_replicas() {
        let picker = ReplicaPicker::new();
        let replicas = ["a:8080", "b:8080", "c:8080"];
        let mut seen: HashMap<&str, usize> = HashMap::new();
        for _ in 0..300 {
            *seen.entry(*picker.pick(&replicas).unwrap()).or_default() += 1;
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let a = ReplicaPicker::from_seed(42);
        let b = ReplicaPicker::from_seed(42);
        let replicas: Vec<u32> = (0..16).collect();
        for _ in 0..32 {
            assert_eq!(a.pick(&replicas), b.pick(&replicas));
        }
    }

    #[test]
    fn test_concurrent_use() {
        let picker = Arc::new(ReplicaPicker::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let picker = picker.clone();
                std::thread::spawn(move || {
                    let replicas = ["a", "b"];
                    for _ in 0..1000 {
                        assert!(picker.pick(&replicas).is_some());
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
    }
}
