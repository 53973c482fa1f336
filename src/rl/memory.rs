use std::collections::VecDeque;

use ndarray::Array1;
use rand::{rngs::SmallRng, Rng};

use crate::config::MemoryKind;

////////////////////////////////////////////////////////////////////////////////

/// One observed transition. `next_valid` is the number of action outputs
/// that correspond to an enabled rule in `next_state`; bootstrapping must
/// not look past it.
#[derive(Clone, Debug)]
pub struct Experience {
    pub state: Array1<f64>,
    pub action: usize,
    pub reward: f64,
    pub next_state: Array1<f64>,
    pub next_valid: usize,
    pub terminal: bool,
}

////////////////////////////////////////////////////////////////////////////////

/// Bounded experience-replay buffer. FIFO evicts the oldest transition;
/// prioritized evicts the lowest-priority one and samples proportionally to
/// the absolute TD error.
pub struct ReplayMemory {
    kind: MemoryKind,
    capacity: usize,
    buf: VecDeque<(Experience, f64)>,
    max_priority: f64,
}

impl ReplayMemory {
    pub fn new(kind: MemoryKind, capacity: usize) -> Self {
        assert!(capacity > 0);
        Self {
            kind,
            capacity,
            buf: VecDeque::with_capacity(capacity),
            max_priority: 1.0,
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// New transitions enter with the highest priority seen so far, so each
    /// is sampled at least once before its priority settles.
    pub fn push(&mut self, experience: Experience) {
        if self.buf.len() == self.capacity {
            match self.kind {
                MemoryKind::Fifo => {
                    self.buf.pop_front();
                }
                MemoryKind::Prioritized => {
                    let lowest = self
                        .buf
                        .iter()
                        .enumerate()
                        .min_by(|a, b| a.1 .1.total_cmp(&b.1 .1))
                        .map(|(i, _)| i)
                        .unwrap();
                    let _ = self.buf.remove(lowest);
                }
            }
        }
        self.buf.push_back((experience, self.max_priority));
    }

    pub fn sample(&self, batch: usize, rng: &mut SmallRng) -> Vec<(usize, &Experience)> {
        let batch = batch.min(self.buf.len());
        match self.kind {
            MemoryKind::Fifo => (0..batch)
                .map(|_| {
                    let i = rng.random_range(0..self.buf.len());
                    (i, &self.buf[i].0)
                })
                .collect(),
            MemoryKind::Prioritized => {
                let total: f64 = self.buf.iter().map(|(_, p)| p).sum();
                (0..batch)
                    .map(|_| {
                        let mut mark = rng.random::<f64>() * total;
                        for (i, (e, p)) in self.buf.iter().enumerate() {
                            mark -= p;
                            if mark <= 0.0 {
                                return (i, e);
                            }
                        }
                        (self.buf.len() - 1, &self.buf[self.buf.len() - 1].0)
                    })
                    .collect()
            }
        }
    }

    pub fn update_priorities(&mut self, indices: &[usize], td_errors: &[f64]) {
        for (i, td) in indices.iter().zip(td_errors) {
            let priority = td.abs().max(f64::MIN_POSITIVE);
            self.buf[*i].1 = priority;
            self.max_priority = self.max_priority.max(priority);
        }
    }
}

////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    fn experience(reward: f64) -> Experience {
        Experience {
            state: Array1::zeros(2),
            action: 0,
            reward,
            next_state: Array1::zeros(2),
            next_valid: 1,
            terminal: false,
        }
    }

    ////////////////////////////////////////////////////////////////////////////////

    #[test]
    fn fifo_evicts_oldest() {
        let mut memory = ReplayMemory::new(MemoryKind::Fifo, 3);
        for r in 0..5 {
            memory.push(experience(r as f64));
        }
        assert_eq!(memory.len(), 3);
        let rewards: Vec<f64> = memory.buf.iter().map(|(e, _)| e.reward).collect();
        assert_eq!(rewards, vec![2.0, 3.0, 4.0]);
    }

    ////////////////////////////////////////////////////////////////////////////////

    #[test]
    fn prioritized_evicts_lowest_priority() {
        let mut memory = ReplayMemory::new(MemoryKind::Prioritized, 3);
        for r in 0..3 {
            memory.push(experience(r as f64));
        }
        // settle priorities: first entry becomes the least interesting
        memory.update_priorities(&[0, 1, 2], &[0.001, 5.0, 5.0]);
        memory.push(experience(99.0));

        let rewards: Vec<f64> = memory.buf.iter().map(|(e, _)| e.reward).collect();
        assert_eq!(rewards, vec![1.0, 2.0, 99.0]);
    }

    ////////////////////////////////////////////////////////////////////////////////

    #[test]
    fn sample_never_exceeds_len() {
        let mut memory = ReplayMemory::new(MemoryKind::Fifo, 8);
        memory.push(experience(1.0));
        let mut rng = SmallRng::seed_from_u64(4);
        assert_eq!(memory.sample(32, &mut rng).len(), 1);
    }
}
