// OrderedHashMap public-API test suite.
//
// The core invariants exercised:
// - Insertion order: keys() lists first-insertion order, oldest first.
// - Updates overwrite the value and keep the key's position.
// - Removal splices the key out; re-insertion appends it at the back.
// - Bijection: len() == keys().count() and every listed key resolves.
use hashmap_primitives::OrderedHashMap;

fn assert_bijection<V>(m: &OrderedHashMap<&'static str, V>) {
    assert_eq!(m.len(), m.keys().count());
    assert_eq!(m.keys().len(), m.len());
    for k in m.keys() {
        assert!(m.contains_key(k));
        assert!(m.get(k).is_some());
    }
}

// Test: five ordered inserts, then remove the middle key.
// Verifies: remaining keys keep their relative order.
#[test]
fn remove_middle_keeps_order() {
    let mut m = OrderedHashMap::new();
    m.insert("a", 1);
    m.insert("b", 2);
    m.insert("c", 3);
    m.insert("d", 4);
    m.insert("e", 5);
    assert_eq!(m.keys().copied().collect::<Vec<_>>(), ["a", "b", "c", "d", "e"]);

    m.remove("c");
    assert_eq!(m.keys().copied().collect::<Vec<_>>(), ["a", "b", "d", "e"]);
    assert_eq!(m.get("c"), None);
    assert_bijection(&m);
}

// Test: re-putting existing keys.
// Verifies: position unchanged, value replaced, len unchanged.
#[test]
fn reput_does_not_move_key() {
    let mut m = OrderedHashMap::new();
    for (i, k) in ["q", "w", "e"].into_iter().enumerate() {
        m.insert(k, i);
    }
    assert_eq!(m.insert("w", 9), Some(1));
    assert_eq!(m.insert("q", 0), Some(0));
    assert_eq!(m.len(), 3);
    assert_eq!(m.keys().copied().collect::<Vec<_>>(), ["q", "w", "e"]);
    assert_eq!(m.values().copied().collect::<Vec<_>>(), [0, 9, 2]);
    assert_bijection(&m);
}

// Test: remove then re-insert.
// Verifies: key reappears at the back with the new value.
#[test]
fn reinsert_goes_to_back() {
    let mut m = OrderedHashMap::new();
    m.insert("a", 1);
    m.insert("b", 2);
    assert_eq!(m.remove("a"), Some(1));
    assert_eq!(m.remove("a"), None);
    m.insert("a", 3);
    assert_eq!(m.iter().collect::<Vec<_>>(), [(&"b", &2), (&"a", &3)]);
    assert_eq!(m.front(), Some((&"b", &2)));
    assert_eq!(m.back(), Some((&"a", &3)));
    assert_bijection(&m);
}

// Test: draining every key in a scrambled order.
// Verifies: map ends empty and accepts new keys afterwards.
#[test]
fn drain_to_empty_and_reuse() {
    let mut m = OrderedHashMap::with_capacity(8);
    let keys = ["k0", "k1", "k2", "k3", "k4", "k5", "k6", "k7"];
    for (i, k) in keys.into_iter().enumerate() {
        m.insert(k, i);
    }
    for k in ["k3", "k0", "k7", "k5", "k1", "k6", "k2", "k4"] {
        assert!(m.remove(k).is_some());
        assert_bijection(&m);
    }
    assert!(m.is_empty());
    assert_eq!(m.keys().next(), None);

    m.insert("k9", 9);
    m.insert("k8", 8);
    assert_eq!(m.keys().copied().collect::<Vec<_>>(), ["k9", "k8"]);
}

// Test: get_mut.
// Verifies: in-place edits are visible and do not reorder.
#[test]
fn get_mut_does_not_reorder() {
    let mut m: OrderedHashMap<String, Vec<u8>> = OrderedHashMap::new();
    m.insert("x".to_string(), vec![]);
    m.insert("y".to_string(), vec![1]);
    m.get_mut("x").unwrap().push(7);
    assert_eq!(m.get("x"), Some(&vec![7]));
    assert_eq!(m.front().map(|(k, _)| k.as_str()), Some("x"));
}

// Test: Debug, FromIterator and Clone.
// Verifies: order is carried through each.
#[test]
fn traits_preserve_order() {
    let m: OrderedHashMap<u8, char> = [(3, 'c'), (1, 'a'), (2, 'b'), (1, 'z')]
        .into_iter()
        .collect();
    assert_eq!(format!("{:?}", m), "{3: 'c', 1: 'z', 2: 'b'}");
    let mut c = m.clone();
    c.remove(&3);
    assert_eq!(m.keys().copied().collect::<Vec<_>>(), [3, 1, 2]);
    assert_eq!(c.keys().copied().collect::<Vec<_>>(), [1, 2]);
    assert_eq!((&c).into_iter().count(), 2);
}
