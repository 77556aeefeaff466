use shades::{Bxt, KeywordIndex, Sks, Sse};

fn sample_db() -> KeywordIndex {
    let mut db = KeywordIndex::new();
    db.insert("alpha".into(), vec![0, 1]);
    db.insert("beta".into(), vec![1, 2]);
    db
}

#[test]
fn sks_roundtrip() {
    let mut sks = Sks::setup(&sample_db()).unwrap();

    let mut got = sks.search(&["alpha"]).unwrap();
    got.sort_unstable();
    assert_eq!(got, vec![0, 1]);

    let mut got = sks.search(&["beta"]).unwrap();
    got.sort_unstable();
    assert_eq!(got, vec![1, 2]);
}

#[test]
fn sks_bad_query_arity() {
    let mut sks = Sks::setup(&sample_db()).unwrap();
    assert!(sks.search(&[]).is_err());
    assert!(sks.search(&["alpha", "beta"]).is_err());
}

#[test]
fn sks_deterministic_with_key() {
    let ks = [0x42u8; 16];
    let mut a = Sks::with_key(ks, &sample_db()).unwrap();
    let mut b = Sks::with_key(ks, &sample_db()).unwrap();
    assert_eq!(
        a.search(&["alpha"]).unwrap(),
        b.search(&["alpha"]).unwrap()
    );
}

#[test]
fn bxt_intersection() {
    let mut bxt = Bxt::setup(&sample_db()).unwrap();

    assert_eq!(bxt.search(&["alpha", "beta"]).unwrap(), vec![1]);

    let mut got = bxt.search(&["alpha"]).unwrap();
    got.sort_unstable();
    assert_eq!(got, vec![0, 1]);

    assert!(bxt.search(&[]).is_err());

    // Неизвестный вторичный терм отфильтровывает всё.
    assert_eq!(bxt.search(&["alpha", "gamma"]).unwrap(), Vec::<u64>::new());
}

#[test]
fn bxt_multi_term_subset_property() {
    // Документ j содержит слово w_i <=> j % (i + 2) == 0.
    let mut db = KeywordIndex::new();
    let words = ["w0", "w1", "w2", "w3", "w4"];
    for (i, w) in words.iter().enumerate() {
        let docs: Vec<u64> = (0..40u64).filter(|j| j % (i as u64 + 2) == 0).collect();
        db.insert((*w).into(), docs);
    }

    let mut bxt = Bxt::setup(&db).unwrap();

    for &secondary in &words[1..] {
        let got = bxt.search(&["w0", secondary]).unwrap();
        let primary = bxt.search(&["w0"]).unwrap();
        let other = &db[secondary];

        for doc in &got {
            assert!(primary.contains(doc), "{} not in primary list", doc);
            assert!(other.contains(doc), "{} not in db[{}]", doc, secondary);
        }
        // И наоборот: всё пересечение найдено.
        for doc in &primary {
            if other.contains(doc) {
                assert!(got.contains(doc), "{} missing from intersection", doc);
            }
        }
    }

    // Тройная конъюнкция: w0 ∧ w1 ∧ w2 — кратные 2, 3 и 4, т.е. кратные 12.
    let mut got = bxt.search(&["w0", "w1", "w2"]).unwrap();
    got.sort_unstable();
    assert_eq!(got, vec![0, 12, 24, 36]);
}
