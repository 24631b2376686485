use super::*;

#[test]
fn test_insert_into_empty_set() {
    let (set, store) = set_with(vec![]);
    set.add_label(label(10, 20, "A")).unwrap();

    assert_eq!(set.data(), vec![label(10, 20, "A")]);
    assert_eq!(store.saved(), set.data());
    assert_eq!(store.saves(), 1);
}

#[test]
fn test_empty_set_accepts_any_values() {
    let (set, _) = set_with(vec![]);
    set.add_label(label(50, 10, "inverted")).unwrap();
    assert_eq!(set.data(), vec![label(50, 10, "inverted")]);
}

#[test]
fn test_append_after_last() {
    let (set, _) = set_with(vec![label(10, 20, "A")]);
    set.add_label(label(25, 30, "B")).unwrap();
    assert_eq!(set.data(), vec![label(10, 20, "A"), label(25, 30, "B")]);
}

#[test]
fn test_prepend_before_first() {
    let (set, _) = set_with(vec![label(10, 20, "A")]);
    set.add_label(label(0, 5, "B")).unwrap();
    assert_eq!(set.data(), vec![label(0, 5, "B"), label(10, 20, "A")]);
}

#[test]
fn test_insert_between_pair() {
    let (set, _) = set_with(vec![label(10, 20, "A"), label(40, 50, "B")]);
    set.add_label(label(25, 30, "C")).unwrap();
    assert_eq!(
        set.data(),
        vec![label(10, 20, "A"), label(25, 30, "C"), label(40, 50, "B")]
    );
}

#[test]
fn test_insert_into_second_gap() {
    let (set, _) = set_with(vec![label(10, 20, "A"), label(40, 50, "B"), label(80, 90, "C")]);
    set.add_label(label(60, 70, "D")).unwrap();
    assert_eq!(
        set.data(),
        vec![label(10, 20, "A"), label(40, 50, "B"), label(60, 70, "D"), label(80, 90, "C")]
    );
}

#[test]
fn test_overlap_rejected_and_set_unchanged() {
    let (set, store) = set_with(vec![label(10, 20, "A")]);
    let result = set.add_label(label(15, 25, "B"));

    assert!(matches!(result, Err(Error::Overlap)));
    assert_eq!(set.data(), vec![label(10, 20, "A")]);
    assert_eq!(store.saves(), 0);
}

#[test]
fn test_overlap_message() {
    let (set, _) = set_with(vec![label(10, 20, "A")]);
    let err = set.add_label(label(5, 12, "B")).unwrap_err();
    assert_eq!(err.to_string(), OVERLAP_MESSAGE);
}

#[test]
fn test_touching_endpoints_rejected() {
    let (set, _) = set_with(vec![label(10, 20, "A"), label(40, 50, "B")]);

    // Shared endpoints count as overlap on every side
    assert!(set.add_label(label(20, 30, "C")).is_err());
    assert!(set.add_label(label(30, 40, "C")).is_err());
    assert!(set.add_label(label(0, 10, "C")).is_err());
    assert!(set.add_label(label(50, 60, "C")).is_err());
    assert_eq!(set.len(), 2);
}

#[test]
fn test_candidate_spanning_an_existing_label_rejected() {
    let (set, _) = set_with(vec![label(10, 20, "A"), label(40, 50, "B")]);
    assert!(set.add_label(label(5, 30, "C")).is_err());
    assert!(set.add_label(label(25, 60, "C")).is_err());
}

#[test]
fn test_single_point_label() {
    let (set, _) = set_with(vec![label(10, 20, "A"), label(40, 50, "B")]);
    set.add_label(label(30, 30, "C")).unwrap();
    assert_eq!(set.data()[1], label(30, 30, "C"));
}

#[test]
fn test_failed_write_rolls_back() {
    let (set, store) = set_with(vec![label(10, 20, "A")]);
    store.fail_writes(true);

    let result = set.add_label(label(25, 30, "B"));
    assert!(matches!(result, Err(Error::Persistence(_))));
    assert_eq!(set.data(), vec![label(10, 20, "A")]);

    store.fail_writes(false);
    set.add_label(label(25, 30, "B")).unwrap();
    assert_eq!(store.saved(), vec![label(10, 20, "A"), label(25, 30, "B")]);
}

#[test]
fn test_sequence_stays_sorted_and_disjoint() {
    let (set, _) = set_with(vec![]);
    let candidates = [
        (500, 600), (100, 200), (900, 950), (300, 350), (220, 290),
        (340, 420), (0, 50), (610, 890), (960, 1000), (205, 210), (60, 99),
    ];
    let mut accepted = 0;
    for (i, (start, end)) in candidates.into_iter().enumerate() {
        if set.add_label(label(start, end, &format!("L{}", i))).is_ok() {
            accepted += 1;
        }
    }

    let data = set.data();
    assert_eq!(data.len(), accepted);
    assert_eq!(accepted, candidates.len() - 1);
    assert!(is_well_formed(&data));
    assert!(data.windows(2).all(|pair| pair[0].start < pair[1].start));
}

#[test]
fn test_data_is_a_snapshot() {
    let (set, _) = set_with(vec![label(10, 20, "A")]);
    let mut snapshot = set.data();
    snapshot.push(label(0, 1, "X"));
    assert_eq!(set.len(), 1);
}

#[test]
fn test_shared_between_threads() {
    let (set, _) = set_with(vec![]);
    let set = Arc::new(set);

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let set = Arc::clone(&set);
            std::thread::spawn(move || {
                let start = i * 100;
                set.add_label(label(start, start + 50, "DD")).is_ok()
            })
        })
        .collect();

    let accepted = handles.into_iter().filter_map(|h| h.join().ok()).filter(|ok| *ok).count();
    assert_eq!(accepted, 8);
    assert_eq!(set.len(), 8);
    assert!(is_well_formed(&set.data()));
}

#[test]
fn test_display() {
    assert_eq!(label(10, 20, "DD").to_string(), "10 - 20: DD");
    assert_eq!(display_labels(&[]), vec![EMPTY_DISPLAY.to_string()]);
    assert_eq!(
        display_labels(&[label(1, 2, "DD"), label(3, 4, "DLE")]),
        vec!["1 - 2: DD".to_string(), "3 - 4: DLE".to_string()]
    );
}

#[test]
fn test_inverted_candidate_matches_prepend_and_append() {
    let (set, store) = set_with(vec![label(10, 20, "A")]);
    set.add_label(label(30, 5, "X")).unwrap();

    assert_eq!(
        set.data(),
        vec![label(30, 5, "X"), label(10, 20, "A"), label(30, 5, "X")]
    );
    assert_eq!(store.saves(), 1);
}

#[test]
fn test_between_rule_inserts_before_first_equal_label() {
    let (set, _) = set_with(vec![label(10, 20, "A")]);
    set.add_label(label(30, 5, "X")).unwrap();
    set.add_label(label(22, 25, "C")).unwrap();

    // The gap found is (A, X); C goes in front of the first X
    assert_eq!(
        set.data(),
        vec![
            label(22, 25, "C"),
            label(22, 25, "C"),
            label(30, 5, "X"),
            label(10, 20, "A"),
            label(30, 5, "X"),
            label(22, 25, "C"),
        ]
    );
}
