//! The category tree: build once from an outline, attach volume ids, then
//! answer count and sample queries.

use std::collections::BTreeMap;

use rand::Rng;
use serde::Serialize;

use super::label::check_category_string;
use super::node::{CategoryNode, FallbackPolicy};
use crate::error::{TreeError, TreeResult};

/// A volume id filed under a category string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeRecord {
    pub category: String,
    pub volume_id: String,
}

impl VolumeRecord {
    pub fn new(category: impl Into<String>, volume_id: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            volume_id: volume_id.into(),
        }
    }
}

/// Outcome of building structure from an outline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    pub inserted: usize,
    pub skipped: usize,
}

/// Load-time counters for attached volume ids.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub total_records: usize,
    pub discarded_records: usize,
    pub inserted_ids: usize,
}

impl LoadReport {
    fn absorb(&mut self, other: &LoadReport) {
        self.total_records += other.total_records;
        self.discarded_records += other.discarded_records;
        self.inserted_ids += other.inserted_ids;
    }
}

/// LOCC category tree.
///
/// Structure comes from [`build`](Self::build), ids from
/// [`load_ids`](Self::load_ids). After loading the tree is only read, and
/// `&CategoryTree` can be shared freely across threads.
#[derive(Debug, Default)]
pub struct CategoryTree {
    root: CategoryNode,
    fallback: FallbackPolicy,
    loaded: LoadReport,
}

impl CategoryTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree from outline entries, skipping the ones that do not parse.
    pub fn from_outline<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tree = Self::new();
        tree.build(entries);
        tree
    }

    pub fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn fallback(&self) -> FallbackPolicy {
        self.fallback
    }

    pub fn root(&self) -> &CategoryNode {
        &self.root
    }

    /// Insert outline entries in order. Entries that fail to parse are logged
    /// and skipped.
    pub fn build<I, S>(&mut self, entries: I) -> BuildReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut report = BuildReport::default();
        for entry in entries {
            let entry = entry.as_ref().trim();
            match self.root.insert(entry) {
                Ok(_) => report.inserted += 1,
                Err(e) => {
                    tracing::warn!(entry, error = %e, "skipping outline entry");
                    report.skipped += 1;
                }
            }
        }
        tracing::info!(
            inserted = report.inserted,
            skipped = report.skipped,
            "outline built"
        );
        report
    }

    /// Attach volume ids to the nodes their categories resolve to.
    ///
    /// Records with a malformed category or one outside the outline are
    /// discarded and counted. Each distinct category is resolved once.
    pub fn load_ids<I>(&mut self, records: I) -> LoadReport
    where
        I: IntoIterator<Item = VolumeRecord>,
    {
        let mut report = LoadReport::default();
        let mut by_category: BTreeMap<String, Vec<String>> = BTreeMap::new();

        for record in records {
            report.total_records += 1;
            if let Err(e) = check_category_string(&record.category) {
                tracing::debug!(volume = %record.volume_id, error = %e, "discarding record");
                report.discarded_records += 1;
                continue;
            }
            by_category
                .entry(record.category)
                .or_default()
                .push(record.volume_id);
        }

        for (category, ids) in by_category {
            match self.root.find_mut(&category, self.fallback) {
                Some(node) => {
                    report.inserted_ids += ids.len();
                    for id in ids {
                        node.attach_id(id);
                    }
                }
                None => {
                    tracing::warn!(category = %category, volumes = ids.len(), "category is not in the outline");
                    report.discarded_records += ids.len();
                }
            }
        }

        self.loaded.absorb(&report);
        debug_assert_eq!(self.loaded.inserted_ids, self.root.id_count());
        tracing::info!(
            total = report.total_records,
            discarded = report.discarded_records,
            inserted = report.inserted_ids,
            "volume ids loaded"
        );
        report
    }

    /// Counters accumulated over every [`load_ids`](Self::load_ids) call.
    pub fn load_report(&self) -> LoadReport {
        self.loaded
    }

    pub fn id_count(&self) -> usize {
        self.root.id_count()
    }

    /// The node `category` resolves to, if any.
    pub fn find(&self, category: &str) -> Option<&CategoryNode> {
        self.root.find_with(category, self.fallback)
    }

    /// Like [`find`](Self::find), but a miss is a [`TreeError::CategoryNotFound`].
    pub fn resolve(&self, category: &str) -> TreeResult<&CategoryNode> {
        self.find(category)
            .ok_or_else(|| TreeError::CategoryNotFound {
                category: category.to_string(),
            })
    }

    /// Number of volume ids under `category`.
    pub fn count(&self, category: &str) -> TreeResult<usize> {
        Ok(self.resolve(category)?.id_count())
    }

    /// Draw `k` volume ids from the subtree `category` resolves to.
    pub fn sample(&self, category: &str, k: usize) -> TreeResult<Vec<String>> {
        self.sample_with(category, k, &mut rand::thread_rng())
    }

    pub fn sample_with<R: Rng + ?Sized>(
        &self,
        category: &str,
        k: usize,
        rng: &mut R,
    ) -> TreeResult<Vec<String>> {
        let node = self.resolve(category)?;
        let volumes = node.sample(k, rng)?;
        tracing::debug!(category, node = %node, k, "sampled volumes");
        Ok(volumes)
    }
}
