//! Sampler facade: the top-level API a service or CLI holds on to.
//!
//! A `Sampler` is built once at startup from the configured outline and volume
//! listing and then only read. It is `Sync`, so the surrounding service can
//! share it behind an `Arc` and answer queries from any thread.

use rayon::prelude::*;
use serde::Serialize;

use crate::category::{BuildReport, CategoryTree, LoadReport, VolumeRecord};
use crate::config::SamplerConfig;
use crate::error::{SamplerResult, TreeResult};
use crate::volume::{read_volumes, VolumeReport};

/// One sampling request in a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleRequest {
    pub category: String,
    pub size: usize,
}

impl SampleRequest {
    pub fn new(category: impl Into<String>, size: usize) -> Self {
        Self {
            category: category.into(),
            size,
        }
    }
}

pub struct Sampler {
    config: SamplerConfig,
    tree: CategoryTree,
    build: BuildReport,
    volumes: Option<VolumeReport>,
}

impl Sampler {
    /// Build the tree from the configured sources.
    pub fn open(config: SamplerConfig) -> SamplerResult<Self> {
        let source = config.outline_source();
        tracing::info!(outline = %source, fallback = %config.fallback, "opening sampler");
        let outline = source.load()?;

        let (records, volumes) = match &config.volumes {
            Some(path) => {
                let (records, report) = read_volumes(path)?;
                (records, Some(report))
            }
            None => (Vec::new(), None),
        };

        let mut sampler = Self::from_parts(config, outline, records);
        sampler.volumes = volumes;
        Ok(sampler)
    }

    /// Build from in-memory outline entries and records.
    pub fn from_parts<S: AsRef<str>>(
        config: SamplerConfig,
        outline: impl IntoIterator<Item = S>,
        records: impl IntoIterator<Item = VolumeRecord>,
    ) -> Self {
        let mut tree = CategoryTree::new().with_fallback(config.fallback);
        let build = tree.build(outline);
        tree.load_ids(records);
        Self {
            config,
            tree,
            build,
            volumes: None,
        }
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    pub fn tree(&self) -> &CategoryTree {
        &self.tree
    }

    pub fn count(&self, category: &str) -> TreeResult<usize> {
        self.tree.count(category)
    }

    pub fn sample(&self, category: &str, size: usize) -> TreeResult<Vec<String>> {
        self.tree.sample(category, size)
    }

    /// Answer independent sampling requests in parallel, in request order.
    pub fn sample_batch(&self, requests: &[SampleRequest]) -> Vec<TreeResult<Vec<String>>> {
        requests
            .par_iter()
            .map(|req| self.tree.sample(&req.category, req.size))
            .collect()
    }

    pub fn info(&self) -> SamplerInfo {
        SamplerInfo {
            outline: self.config.outline_source().to_string(),
            fallback: self.config.fallback.to_string(),
            build: self.build,
            load: self.tree.load_report(),
            volumes: self.volumes,
            top_level_classes: self.tree.root().children_count(),
            volume_ids: self.tree.id_count(),
        }
    }
}

/// Summary of a sampler's sources and load counters.
#[derive(Debug, Clone, Serialize)]
pub struct SamplerInfo {
    pub outline: String,
    pub fallback: String,
    pub build: BuildReport,
    pub load: LoadReport,
    pub volumes: Option<VolumeReport>,
    pub top_level_classes: usize,
    pub volume_ids: usize,
}

impl std::fmt::Display for SamplerInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "outline:     {}", self.outline)?;
        writeln!(
            f,
            "  entries:   {} inserted, {} skipped",
            self.build.inserted, self.build.skipped
        )?;
        writeln!(f, "  classes:   {}", self.top_level_classes)?;
        if let Some(volumes) = &self.volumes {
            writeln!(
                f,
                "listing:     {} lines, {} unparseable",
                volumes.lines, volumes.unparseable
            )?;
        }
        writeln!(
            f,
            "records:     {} total, {} discarded, {} inserted",
            self.load.total_records, self.load.discarded_records, self.load.inserted_ids
        )?;
        writeln!(f, "volume ids:  {}", self.volume_ids)?;
        write!(f, "fallback:    {}", self.fallback)
    }
}
