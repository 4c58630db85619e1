// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::collections::{BTreeSet, VecDeque};

use anyhow::Result;
use deepeq::*;

#[derive(Clone, Debug, Default)]
struct Tag {
    key: String,
}

#[derive(Clone, Debug, Default)]
struct Catalog {
    title: String,
    tags: Option<Vec<Tag>>,
    scores: Vec<u32>,
    matrix: Vec<Vec<i64>>,
    history: VecDeque<Option<Tag>>,
    labels: BTreeSet<String>,
    fixed: [u8; 3],
}

reflect!(Tag { key });
reflect!(Catalog {
    title,
    tags,
    scores,
    matrix,
    history,
    labels,
    fixed
});

fn tags(keys: &[&str]) -> Vec<Tag> {
    keys.iter()
        .map(|key| Tag {
            key: key.to_string(),
        })
        .collect()
}

fn catalog() -> Catalog {
    Catalog {
        title: "spring".to_string(),
        tags: Some(tags(&["a", "b"])),
        scores: vec![1, 2, 3],
        matrix: vec![vec![1, 2], vec![3]],
        history: VecDeque::from(vec![None, Some(Tag { key: "x".into() })]),
        labels: ["red", "blue"].iter().map(|s| s.to_string()).collect(),
        fixed: [1, 2, 3],
    }
}

#[test]
fn absent_on_both_sides_is_skipped() -> Result<()> {
    let a = Catalog {
        tags: None,
        ..catalog()
    };
    let b = Catalog {
        tags: None,
        ..catalog()
    };
    assert!(a.is_equal(&b)?);
    Ok(())
}

#[test]
fn absent_on_one_side_is_a_mismatch() -> Result<()> {
    let a = Catalog {
        tags: None,
        ..catalog()
    };
    assert!(!a.is_equal(&catalog())?);
    assert!(!catalog().is_equal(&a)?);

    // Empty is not the same as absent.
    let empty = Catalog {
        tags: Some(vec![]),
        ..catalog()
    };
    assert!(!a.is_equal(&empty)?);
    Ok(())
}

#[test]
fn empty_sequences_match() -> Result<()> {
    let a = Catalog {
        tags: Some(vec![]),
        scores: vec![],
        matrix: vec![],
        history: VecDeque::new(),
        labels: BTreeSet::new(),
        ..catalog()
    };
    assert!(a.is_equal(&a.clone())?);
    Ok(())
}

#[test]
fn length_is_checked() -> Result<()> {
    let longer = Catalog {
        tags: Some(tags(&["a", "b", "c"])),
        ..catalog()
    };
    assert!(!catalog().is_equal(&longer)?);

    let shorter = Catalog {
        scores: vec![1, 2],
        ..catalog()
    };
    assert!(!catalog().is_equal(&shorter)?);
    Ok(())
}

#[test]
fn elements_of_every_type_are_compared() -> Result<()> {
    let scores = Catalog {
        scores: vec![1, 2, 4],
        ..catalog()
    };
    assert!(!catalog().is_equal(&scores)?);

    let matrix = Catalog {
        matrix: vec![vec![1, 2], vec![4]],
        ..catalog()
    };
    assert!(!catalog().is_equal(&matrix)?);

    let history = Catalog {
        history: VecDeque::from(vec![Some(Tag { key: "x".into() }), None]),
        ..catalog()
    };
    assert!(!catalog().is_equal(&history)?);

    let labels = Catalog {
        labels: ["red", "green"].iter().map(|s| s.to_string()).collect(),
        ..catalog()
    };
    assert!(!catalog().is_equal(&labels)?);

    let fixed = Catalog {
        fixed: [1, 2, 4],
        ..catalog()
    };
    assert!(!catalog().is_equal(&fixed)?);
    Ok(())
}

#[test]
fn order_matters() -> Result<()> {
    let reversed = Catalog {
        tags: Some(tags(&["b", "a"])),
        ..catalog()
    };
    assert!(!catalog().is_equal(&reversed)?);
    Ok(())
}

#[test]
fn reference_only_elements_just_count_leaf_values() {
    let comparer = Comparer::with_config(CompareConfig {
        element_comparison: ElementComparison::ReferenceOnly,
        ..CompareConfig::default()
    });

    // Leaf elements are only counted.
    let scores = Catalog {
        scores: vec![9, 9, 9],
        ..catalog()
    };
    assert!(comparer.deep_eq(&catalog(), &scores));

    // Object elements are still compared, and lengths still matter.
    let tags_differ = Catalog {
        tags: Some(tags(&["a", "z"])),
        ..catalog()
    };
    assert!(!comparer.deep_eq(&catalog(), &tags_differ));

    let shorter = Catalog {
        scores: vec![9],
        ..catalog()
    };
    assert!(!comparer.deep_eq(&catalog(), &shorter));

    // Under the default configuration every element is compared.
    assert!(!Comparer::new().deep_eq(&catalog(), &scores));
}

#[test]
fn sequences_compare_at_the_top_level() -> Result<()> {
    assert!(are_equal(&tags(&["a"]), &tags(&["a"]))?);
    assert!(!are_equal(&tags(&["a"]), &tags(&["b"]))?);
    assert!(!are_equal(&tags(&["a"]), &tags(&["a", "b"]))?);
    assert!(are_equal(&vec![1.5f64, 2.5], &vec![1.5f64, 2.5])?);
    Ok(())
}

#[test]
fn sequence_category() {
    let descriptor = Comparer::global().describe::<Catalog>();
    for property in &descriptor.properties {
        let expected = if property.name == "title" {
            PropertyCategory::DirectlyComparable
        } else {
            PropertyCategory::Sequence
        };
        assert_eq!(property.category, expected, "{}", property.name);
    }
}
