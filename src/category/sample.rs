//! Stratified random sampling over a category subtree.
//!
//! Sampling is two-stage. Stage one allocates the requested count across the
//! node's slots (slot 0 is the node's own ids, slot `i` is child `i - 1`) by
//! independent inverse-transform draws against a CDF weighted by slot
//! population. Stage two samples within each slot: own ids uniformly without
//! replacement, children recursively.
//!
//! A slot never receives more draws than it has members. Once a slot is full it
//! drops out of the CDF and the remaining slots are renormalised, which has the
//! same distribution as redrawing whenever a full slot comes up.

use rand::Rng;
use rand::seq::SliceRandom;

use super::node::CategoryNode;
use crate::error::{TreeError, TreeResult};

impl CategoryNode {
    /// Draw `k` volume ids from this subtree.
    ///
    /// Fails with [`TreeError::SampleTooLarge`] before any drawing when the
    /// subtree holds fewer than `k` ids. The node is not mutated, so concurrent
    /// callers may sample the same subtree.
    pub fn sample<R: Rng + ?Sized>(&self, k: usize, rng: &mut R) -> TreeResult<Vec<String>> {
        let populations: Vec<usize> = std::iter::once(self.ids.len())
            .chain(self.children.iter().map(|c| c.node.id_count()))
            .collect();
        let total: usize = populations.iter().sum();

        if total < k {
            return Err(TreeError::SampleTooLarge {
                requested: k,
                available: total,
            });
        }
        if k == 0 {
            return Ok(Vec::new());
        }

        let allocation = allocate(&populations, k, rng);
        tracing::trace!(node = %self, ?populations, ?allocation, "sample allocation");

        let mut volumes = Vec::with_capacity(k);
        volumes.extend(self.ids.choose_multiple(rng, allocation[0]).cloned());
        for (child, &n) in self.children.iter().zip(&allocation[1..]) {
            if n > 0 {
                volumes.extend(child.node.sample(n, rng)?);
            }
        }
        Ok(volumes)
    }
}

/// Spread `k` draws over slots with the given populations.
///
/// Requires `k <= populations.iter().sum()`.
fn allocate<R: Rng + ?Sized>(populations: &[usize], k: usize, rng: &mut R) -> Vec<usize> {
    let mut counts = vec![0; populations.len()];
    let mut cdf = Cdf::open_slots(populations, &counts);

    for _ in 0..k {
        let Some(slot) = cdf.draw(rng) else {
            break;
        };
        counts[slot] += 1;
        if counts[slot] == populations[slot] {
            cdf = Cdf::open_slots(populations, &counts);
        }
    }
    counts
}

/// Cumulative population over the slots that can still take a draw.
#[derive(Debug)]
struct Cdf {
    slots: Vec<usize>,
    cumulative: Vec<usize>,
}

impl Cdf {
    fn open_slots(populations: &[usize], counts: &[usize]) -> Self {
        let mut slots = Vec::with_capacity(populations.len());
        let mut cumulative = Vec::with_capacity(populations.len());
        let mut running = 0;
        for (slot, (&population, &taken)) in populations.iter().zip(counts).enumerate() {
            if taken < population {
                running += population;
                slots.push(slot);
                cumulative.push(running);
            }
        }
        Self { slots, cumulative }
    }

    /// Smallest slot whose cumulative weight exceeds a uniform draw.
    fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<usize> {
        let total = *self.cumulative.last()?;
        let dice = rng.gen_range(0..total);
        let idx = self.cumulative.partition_point(|&c| c <= dice);
        self.slots.get(idx).copied()
    }
}
