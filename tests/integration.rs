//! End-to-end tests for the LOCC sampler.
//!
//! These tests exercise the full pipeline from outline and listing files
//! through tree construction to count and sample queries.

use std::collections::HashMap;
use std::sync::Arc;

use locc_sampler::category::{CategoryTree, FallbackPolicy, VolumeRecord};
use locc_sampler::config::SamplerConfig;
use locc_sampler::engine::{SampleRequest, Sampler};
use locc_sampler::error::{SamplerError, SourceError, TreeError};
use locc_sampler::outline::BUILTIN_QH;
use rand::SeedableRng;

const LISTING: &str = "\
uc2.ark:/13960/t57d2rr1p\t['QH81 .W68', 'QH81 .W56']
mdp.39015000000001\t['QH360 .D3']
mdp.39015000000002\t['QH547.3 .E4']
mdp.39015000000003\t['QH332 .A1']
mdp.39015000000004\t['U56 no.82']
mdp.39015000000005\t['QK10 .F7']
not a listing line
";

/// Tree with ten ids on `Q1-100` and 20, 5, 5 on its three children.
fn forty_volume_tree() -> CategoryTree {
    let mut tree = CategoryTree::from_outline(["Q1-100", "Q1-20", "Q21-40", "Q41-60"]);
    let mut records = Vec::new();
    for i in 0..10 {
        records.push(VolumeRecord::new("Q70", format!("a{i}")));
    }
    for i in 0..20 {
        records.push(VolumeRecord::new("Q5", format!("b{i}")));
    }
    for i in 0..5 {
        records.push(VolumeRecord::new("Q30", format!("c{i}")));
        records.push(VolumeRecord::new("Q50", format!("d{i}")));
    }
    let report = tree.load_ids(records);
    assert_eq!(report.inserted_ids, 40);
    tree
}

#[test]
fn outline_structure_from_nested_spans() {
    let tree = CategoryTree::from_outline(["Q1-390", "Q1-295", "Q300-390", "Q350-390"]);
    assert_eq!(tree.root().children_count(), 1);
    assert_eq!(tree.find("Q").unwrap().children_count(), 1);
    assert_eq!(tree.find("Q1-390").unwrap().children_count(), 2);
    assert_eq!(tree.find("Q1-295").unwrap().children_count(), 0);
}

#[test]
fn containment_lookup_in_builtin_outline() {
    let tree = CategoryTree::from_outline(BUILTIN_QH);
    let label = |q: &str| tree.find(q).and_then(|n| n.label()).map(str::to_string);
    assert_eq!(label("QH360").as_deref(), Some("QH359-425"));
    assert_eq!(label("QH547.3").as_deref(), Some("QH540-549.5"));
    assert_eq!(label("QH5").as_deref(), Some("QH1-199.5"));
    assert_eq!(label("QH332").as_deref(), Some("QH301-705.5"));
    assert!(label("QH999").is_none());
}

#[test]
fn id_count_is_independent_of_shape() {
    let records: Vec<_> = (1..=50)
        .map(|i| VolumeRecord::new(format!("Q{}", i * 7), format!("v{i}")))
        .collect();

    let mut flat = CategoryTree::from_outline(["Q1-400"]);
    let mut nested = CategoryTree::from_outline(["Q1-400", "Q1-100", "Q1-50", "Q101-400", "Q200-300"]);
    flat.load_ids(records.clone());
    nested.load_ids(records);

    assert_eq!(flat.count("Q").unwrap(), 50);
    assert_eq!(nested.count("Q").unwrap(), 50);
    assert_eq!(nested.count("Q1-400").unwrap(), 50);
    assert_eq!(
        nested.count("Q1-100").unwrap() + nested.count("Q101-400").unwrap(),
        50
    );
}

#[test]
fn sample_size_and_membership_bounds() {
    let tree = forty_volume_tree();
    let mut attached: HashMap<String, usize> = HashMap::new();
    for prefix in ["a", "b", "c", "d"] {
        let n = match prefix {
            "a" => 10,
            "b" => 20,
            _ => 5,
        };
        for i in 0..n {
            attached.insert(format!("{prefix}{i}"), 1);
        }
    }

    let mut rng = rand::rngs::StdRng::seed_from_u64(1);
    for _ in 0..200 {
        let picked = tree.sample_with("Q1-100", 4, &mut rng).unwrap();
        assert_eq!(picked.len(), 4);
        let mut seen: HashMap<&str, usize> = HashMap::new();
        for id in &picked {
            *seen.entry(id.as_str()).or_default() += 1;
        }
        for (id, n) in seen {
            assert!(n <= attached.get(id).copied().unwrap_or(0), "{id} x{n}");
        }
    }

    for _ in 0..20 {
        let err = tree.sample_with("Q1-100", 41, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            TreeError::SampleTooLarge {
                requested: 41,
                available: 40
            }
        ));
    }

    assert!(tree.sample_with("Q1-100", 0, &mut rng).unwrap().is_empty());
}

#[test]
fn concurrent_sampling_shares_one_tree() {
    let tree = Arc::new(forty_volume_tree());
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let tree = Arc::clone(&tree);
            std::thread::spawn(move || {
                (0..100)
                    .map(|_| tree.sample("Q1-100", 40).unwrap().len())
                    .all(|n| n == 40)
            })
        })
        .collect();
    for handle in handles {
        assert!(handle.join().unwrap());
    }
    assert_eq!(tree.count("Q1-100").unwrap(), 40);
}

#[test]
fn sampler_from_files() {
    let dir = tempfile::TempDir::new().unwrap();
    let listing = dir.path().join("eng-QH-callno");
    std::fs::write(&listing, LISTING).unwrap();
    let config_path = dir.path().join("sampler.toml");
    std::fs::write(
        &config_path,
        format!("volumes = {:?}\n", listing.display().to_string()),
    )
    .unwrap();

    let config = SamplerConfig::load(&config_path).unwrap();
    let sampler = Sampler::open(config).unwrap();
    let info = sampler.info();

    let volumes = info.volumes.unwrap();
    assert_eq!(volumes.lines, 7);
    assert_eq!(volumes.unparseable, 1);
    assert_eq!(info.load.total_records, 7);
    // U56 is malformed, QK10 is outside the outline.
    assert_eq!(info.load.discarded_records, 2);
    assert_eq!(info.load.inserted_ids, 5);
    assert_eq!(info.load.inserted_ids, sampler.tree().id_count());

    assert_eq!(sampler.count("QH1-278.5").unwrap(), 2);
    assert_eq!(sampler.count("QH301-705.5").unwrap(), 3);
    assert_eq!(sampler.count("QH540-549.5").unwrap(), 1);

    // The same volume filed twice under QH81 can come back twice.
    let mut picked = sampler.sample("QH1-199.5", 2).unwrap();
    picked.dedup();
    assert_eq!(picked, ["uc2.ark:/13960/t57d2rr1p"]);
}

#[test]
fn sampler_reports_missing_listing() {
    let config = SamplerConfig {
        volumes: Some("/nonexistent/eng-QH-callno".into()),
        ..Default::default()
    };
    let err = Sampler::open(config).err().unwrap();
    assert!(matches!(err, SamplerError::Source(SourceError::Read { .. })));
}

#[test]
fn sampler_with_custom_outline_and_strict_fallback() {
    let dir = tempfile::TempDir::new().unwrap();
    let outline = dir.path().join("outline.txt");
    std::fs::write(&outline, "# class Q\nQ1-390\nQ1-295\nQ300-390\nQ350-390\n").unwrap();

    let config = SamplerConfig {
        outline: Some(outline),
        fallback: FallbackPolicy::Strict,
        ..Default::default()
    };
    let sampler = Sampler::open(config).unwrap();
    assert_eq!(sampler.info().build.inserted, 4);
    assert_eq!(sampler.tree().fallback(), FallbackPolicy::Strict);
    assert_eq!(sampler.count("Q").unwrap(), 0);
    assert!(matches!(
        sampler.count("QH5"),
        Err(TreeError::CategoryNotFound { .. })
    ));
}

#[test]
fn batch_requests_run_independently() {
    let records = (0..100).map(|i| VolumeRecord::new(format!("QH{}", i + 1), format!("v{i}")));
    let sampler = Sampler::from_parts(SamplerConfig::default(), BUILTIN_QH, records);
    let requests: Vec<_> = (1..=20)
        .map(|n| SampleRequest::new("QH1-199.5", n))
        .collect();
    let results = sampler.sample_batch(&requests);
    for (req, result) in requests.iter().zip(results) {
        assert_eq!(result.unwrap().len(), req.size);
    }
}
