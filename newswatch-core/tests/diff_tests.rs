use newswatch_core::{diff, NewsRecord, SeenSet};

fn record(title: &str, n: u32) -> NewsRecord {
    NewsRecord {
        title: title.into(),
        link: format!("https://www.ssju.ac.in/news/{n}"),
    }
}

#[test]
fn reports_unseen_records_in_source_order() {
    let mut seen = SeenSet::new();
    let candidates = vec![record("A", 1), record("B", 2), record("C", 3)];

    let new_items = diff(candidates.clone(), &mut seen);

    assert_eq!(new_items, candidates);
    assert_eq!(seen.len(), 3);
    let order: Vec<&str> = seen.iter().collect();
    assert_eq!(
        order,
        vec![
            "A\nhttps://www.ssju.ac.in/news/1",
            "B\nhttps://www.ssju.ac.in/news/2",
            "C\nhttps://www.ssju.ac.in/news/3",
        ]
    );
}

#[test]
fn already_seen_batch_is_a_no_op() {
    let candidates = vec![record("A", 1), record("B", 2)];
    let mut seen = SeenSet::from(
        candidates
            .iter()
            .map(NewsRecord::identity)
            .collect::<Vec<_>>(),
    );
    let before = seen.clone();

    let new_items = diff(candidates, &mut seen);

    assert!(new_items.is_empty());
    assert_eq!(seen, before);
}

#[test]
fn duplicate_within_one_batch_is_reported_once() {
    let mut seen = SeenSet::new();
    let a = record("A", 1);
    let b = record("B", 2);

    let new_items = diff(vec![a.clone(), a.clone(), b.clone()], &mut seen);

    assert_eq!(new_items, vec![a.clone(), b]);
    assert_eq!(seen.len(), 2);
    assert_eq!(seen.iter().filter(|id| *id == a.identity()).count(), 1);
}

#[test]
fn same_title_with_different_link_is_a_different_item() {
    let mut seen = SeenSet::from(vec![record("Holiday", 1).identity()]);

    let new_items = diff(vec![record("Holiday", 1), record("Holiday", 2)], &mut seen);

    assert_eq!(new_items, vec![record("Holiday", 2)]);
}

#[test]
fn seen_set_only_grows_across_runs() {
    let mut seen = SeenSet::new();
    let pages = vec![
        vec![record("A", 1), record("B", 2)],
        vec![record("B", 2)],
        vec![],
        vec![record("C", 3), record("A", 1)],
    ];

    for page in pages {
        let previous = seen.clone();
        diff(page, &mut seen);
        assert!(seen.is_superset_of(&previous));
    }
    assert_eq!(seen.len(), 3);
}

#[test]
fn empty_page_yields_nothing() {
    let mut seen = SeenSet::from(vec![record("A", 1).identity()]);
    assert!(diff(Vec::new(), &mut seen).is_empty());
    assert_eq!(seen.len(), 1);
}

#[test]
fn serializes_as_plain_array_and_drops_duplicates_on_load() {
    let seen: SeenSet = serde_json::from_str(r#"["x", "y", "x"]"#).unwrap();
    assert_eq!(seen.len(), 2);
    assert_eq!(serde_json::to_string(&seen).unwrap(), r#"["x","y"]"#);
}
