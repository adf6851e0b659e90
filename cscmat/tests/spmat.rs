use approx::assert_relative_eq;
use cscmat::{BatchBuilder, BatchOptions, CscError, SpMat, SyncState};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Row-major dense fixture to a sparse matrix through element handles
fn from_rows<const C: usize>(rows: &[[f64; C]]) -> SpMat<f64> {
    let mut mat = SpMat::new(rows.len(), C).unwrap();
    for (r, row) in rows.iter().enumerate() {
        for (c, &v) in row.iter().enumerate() {
            if v != 0.0 {
                mat.elem_mut(r, c).unwrap().set(v);
            }
        }
    }
    mat
}

fn assert_matches<const C: usize>(mat: &SpMat<f64>, expected: &[[f64; C]]) {
    assert_eq!(mat.shape(), (expected.len(), C));
    for (r, row) in expected.iter().enumerate() {
        for (c, &v) in row.iter().enumerate() {
            assert_relative_eq!(mat.at(r, c).unwrap(), v);
        }
    }
}

fn swap_fixture() -> SpMat<f64> {
    from_rows(&[
        [3.4, 0.0, 0.0, 0.0, 0.0],
        [0.0, 0.0, 0.0, 9.8, 0.0],
        [0.0, 0.0, 0.0, 0.0, 0.2],
        [0.0, 0.0, 2.6, 0.0, -0.2],
        [0.0, 4.1, 3.0, 0.1, 0.2],
        [0.0, 1.5, 0.0, 0.0, 8.3],
    ])
}

#[test]
fn point_inserts_read_back() {
    let mut mat = SpMat::<i32>::new(3, 3).unwrap();
    mat.add_or_overwrite(0, 0, 5).unwrap();
    mat.add_or_overwrite(2, 0, 7).unwrap();
    mat.add_or_overwrite(1, 1, 3).unwrap();

    assert_eq!(mat.at(0, 0), Ok(5));
    assert_eq!(mat.at(2, 0), Ok(7));
    assert_eq!(mat.at(1, 1), Ok(3));
    assert_eq!(mat.at(2, 2), Ok(0));
    assert_eq!(mat.nonzero_count(), 3);
}

#[test]
fn batch_accumulates_duplicates() {
    let locations = [[0, 0], [2, 2], [0, 0]];
    let options = BatchOptions::default()
        .with_sort_locations(true)
        .with_accumulate_duplicates(true);
    let mat = SpMat::from_batch(&locations, &[1, 2, 3], 4, 4, options).unwrap();

    assert_eq!(mat.at(0, 0), Ok(4));
    assert_eq!(mat.at(2, 2), Ok(2));
    assert_eq!(mat.nonzero_count(), 2);
}

#[test]
fn batch_rejects_duplicates() {
    let locations = [[0, 0], [2, 2], [0, 0]];
    let options = BatchOptions::default()
        .with_sort_locations(true)
        .with_accumulate_duplicates(false);
    assert_eq!(
        SpMat::from_batch(&locations, &[1, 2, 3], 4, 4, options).unwrap_err(),
        CscError::DuplicateLocation { row: 0, col: 0 }
    );
}

#[test]
fn shed_cols_of_identity() {
    let mut mat = SpMat::<f64>::eye(5, 5).unwrap();
    mat.shed_cols(1, 2).unwrap();

    assert_eq!(mat.shape(), (5, 3));
    assert_eq!(mat.nonzero_count(), 3);
    let entries: Vec<_> = mat.iter().collect();
    assert_eq!(entries, vec![(0, 0, 1.0), (3, 1, 1.0), (4, 2, 1.0)]);
    mat.check_invariants().unwrap();
}

#[test]
fn swap_rows_fixture() {
    let mut a = swap_fixture();
    a.swap_rows(0, 3).unwrap();
    assert_matches(
        &a,
        &[
            [0.0, 0.0, 2.6, 0.0, -0.2],
            [0.0, 0.0, 0.0, 9.8, 0.0],
            [0.0, 0.0, 0.0, 0.0, 0.2],
            [3.4, 0.0, 0.0, 0.0, 0.0],
            [0.0, 4.1, 3.0, 0.1, 0.2],
            [0.0, 1.5, 0.0, 0.0, 8.3],
        ],
    );

    a.swap_rows(4, 5).unwrap();
    assert_matches(
        &a,
        &[
            [0.0, 0.0, 2.6, 0.0, -0.2],
            [0.0, 0.0, 0.0, 9.8, 0.0],
            [0.0, 0.0, 0.0, 0.0, 0.2],
            [3.4, 0.0, 0.0, 0.0, 0.0],
            [0.0, 1.5, 0.0, 0.0, 8.3],
            [0.0, 4.1, 3.0, 0.1, 0.2],
        ],
    );
    a.check_invariants().unwrap();
}

#[test]
fn swap_cols_fixture() {
    let mut a = swap_fixture();
    a.swap_cols(2, 3).unwrap();
    assert_matches(
        &a,
        &[
            [3.4, 0.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 9.8, 0.0, 0.0],
            [0.0, 0.0, 0.0, 0.0, 0.2],
            [0.0, 0.0, 0.0, 2.6, -0.2],
            [0.0, 4.1, 0.1, 3.0, 0.2],
            [0.0, 1.5, 0.0, 0.0, 8.3],
        ],
    );

    a.swap_cols(0, 4).unwrap();
    assert_matches(
        &a,
        &[
            [0.0, 0.0, 0.0, 0.0, 3.4],
            [0.0, 0.0, 9.8, 0.0, 0.0],
            [0.2, 0.0, 0.0, 0.0, 0.0],
            [-0.2, 0.0, 0.0, 2.6, 0.0],
            [0.2, 4.1, 0.1, 3.0, 0.0],
            [8.3, 1.5, 0.0, 0.0, 0.0],
        ],
    );
    a.sync().unwrap();
    a.check_invariants().unwrap();
}

#[test]
fn shed_single_row_and_col() {
    let mut a = swap_fixture();
    a.shed_col(0).unwrap();
    a.shed_row(2).unwrap();
    assert_matches(
        &a,
        &[
            [0.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 9.8, 0.0],
            [0.0, 2.6, 0.0, -0.2],
            [4.1, 3.0, 0.1, 0.2],
            [1.5, 0.0, 0.0, 8.3],
        ],
    );
    a.check_invariants().unwrap();
}

#[test]
fn shed_row_ranges() {
    let mut a = swap_fixture();
    a.shed_rows(2, 4).unwrap();
    assert_matches(
        &a,
        &[
            [3.4, 0.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 0.0, 9.8, 0.0],
            [0.0, 1.5, 0.0, 0.0, 8.3],
        ],
    );

    let mut b = swap_fixture();
    b.shed_rows(0, 2).unwrap();
    assert_matches(
        &b,
        &[
            [0.0, 0.0, 2.6, 0.0, -0.2],
            [0.0, 4.1, 3.0, 0.1, 0.2],
            [0.0, 1.5, 0.0, 0.0, 8.3],
        ],
    );

    assert_eq!(
        b.shed_rows(2, 1).unwrap_err(),
        CscError::InvalidRange { start: 2, end: 1 }
    );
}

fn reshape_fixture() -> SpMat<u32> {
    let mut mat = SpMat::new(4, 3).unwrap();
    for (r, c, v) in [(1, 0, 1), (0, 1, 2), (1, 1, 3), (3, 1, 4), (2, 2, 5), (3, 2, 6)] {
        mat.elem_mut(r, c).unwrap().set(v);
    }
    mat
}

#[test]
fn reshape_columnwise() {
    let mut mat = reshape_fixture();
    mat.reshape(3, 4).unwrap();
    assert_eq!(mat.shape(), (3, 4));
    let entries: Vec<_> = mat.iter().collect();
    assert_eq!(
        entries,
        vec![(1, 0, 1), (1, 1, 2), (2, 1, 3), (1, 2, 4), (1, 3, 5), (2, 3, 6)]
    );
}

#[test]
fn reshape_rowwise() {
    let mut mat = reshape_fixture();
    mat.reshape_rowwise(3, 4).unwrap();
    assert_eq!(mat.shape(), (3, 4));
    let entries: Vec<_> = mat.iter().collect();
    assert_eq!(
        entries,
        vec![(1, 0, 3), (2, 0, 5), (0, 1, 2), (2, 2, 4), (0, 3, 1), (2, 3, 6)]
    );
    assert_eq!(
        mat.reshape(5, 5).unwrap_err(),
        CscError::DimensionMismatch {
            expected: 12,
            found: 25
        }
    );
}

const SORTED: [[usize; 2]; 5] = [[2, 1], [7, 1], [0, 4], [9, 4], [0, 5]];
const UNSORTED: [[usize; 2]; 5] = [[0, 4], [2, 1], [9, 4], [0, 5], [7, 1]];

fn assert_batch_fixture(mat: &SpMat<f64>, n_cols: usize, last_zero: bool) {
    assert_eq!(mat.shape(), (10, n_cols));
    assert_eq!(mat.nonzero_count(), if last_zero { 4 } else { 5 });
    assert_relative_eq!(mat.at(2, 1).unwrap(), 1.5);
    assert_relative_eq!(mat.at(7, 1).unwrap(), -15.15);
    assert_relative_eq!(mat.at(0, 4).unwrap(), 2.2);
    assert_relative_eq!(mat.at(9, 4).unwrap(), if last_zero { 0.0 } else { 3.0 });
    assert_relative_eq!(mat.at(0, 5).unwrap(), 5.0);
    mat.check_invariants().unwrap();
}

#[test]
fn batch_sorted_input() {
    let values = [1.5, -15.15, 2.2, 3.0, 5.0];
    let options = BatchOptions::default().with_sort_locations(false);
    let m = SpMat::from_batch(&SORTED, &values, 10, 10, options).unwrap();
    assert_batch_fixture(&m, 10, false);

    let n = SpMat::from_batch_auto_size(&SORTED, &values, options).unwrap();
    assert_batch_fixture(&n, 6, false);
}

#[test]
fn batch_unsorted_input() {
    let values = [2.2, 1.5, 3.0, 5.0, -15.15];
    let m = SpMat::from_batch(&UNSORTED, &values, 10, 10, BatchOptions::default()).unwrap();
    assert_batch_fixture(&m, 10, false);

    let n = SpMat::from_batch_auto_size(&UNSORTED, &values, BatchOptions::default()).unwrap();
    assert_batch_fixture(&n, 6, false);

    let options = BatchOptions::default().with_sort_locations(false);
    assert_eq!(
        SpMat::from_batch(&UNSORTED, &values, 10, 10, options).unwrap_err(),
        CscError::UnsortedInput { position: 1 }
    );
}

#[test]
fn batch_drops_zero_values() {
    let sorted_values = [1.5, -15.15, 2.2, 0.0, 5.0];
    let options = BatchOptions::default().with_sort_locations(false);
    let m = SpMat::from_batch(&SORTED, &sorted_values, 10, 10, options).unwrap();
    assert_batch_fixture(&m, 10, true);

    let unsorted_values = [2.2, 1.5, 0.0, 5.0, -15.15];
    let n = SpMat::from_batch_auto_size(&UNSORTED, &unsorted_values, BatchOptions::default())
        .unwrap();
    assert_batch_fixture(&n, 6, true);

    // Zeros slipping past the filter are still pruned.
    let unchecked = options.with_check_for_zeros(false);
    let k = SpMat::from_batch(&SORTED, &sorted_values, 10, 10, unchecked).unwrap();
    assert_batch_fixture(&k, 10, true);
}

#[test]
fn batch_empty_input() {
    let m = SpMat::<f64>::from_batch(&[], &[], 10, 10, BatchOptions::default()).unwrap();
    assert_eq!(m.shape(), (10, 10));
    assert_eq!(m.nonzero_count(), 0);

    let n = SpMat::<f64>::from_batch_auto_size(&[], &[], BatchOptions::default()).unwrap();
    assert_eq!(n.shape(), (0, 0));
}

#[test]
fn builder_matches_batch() {
    let mut builder = BatchBuilder::new().with_shape(10, 10);
    for (&[row, col], value) in UNSORTED.iter().zip([2.2, 1.5, 3.0, 5.0, -15.15]) {
        builder.push(row, col, value);
    }
    let built = builder.build().unwrap();
    assert_batch_fixture(&built, 10, false);
}

#[test]
fn cache_and_csc_views_agree() {
    let mut mat = swap_fixture();
    assert_eq!(mat.sync_state(), SyncState::DirtyCache);
    let from_cache: Vec<_> = mat.iter().collect();

    mat.sync().unwrap();
    assert_eq!(mat.sync_state(), SyncState::CleanCache);
    let from_csc: Vec<_> = mat.iter().collect();
    assert_eq!(from_cache, from_csc);
    assert_eq!(mat.nonzero_count(), 11);
}

#[test]
fn failed_batch_leaves_target_untouched() {
    let mut mat = swap_fixture();
    let before = mat.clone();
    let err = mat
        .assign_batch(&[[0, 0], [6, 0]], &[1.0, 2.0], 6, 5, BatchOptions::default())
        .unwrap_err();
    assert!(matches!(err, CscError::OutOfBounds { row: 6, .. }));
    assert_eq!(mat, before);
}

#[test]
fn steal_moves_contents() {
    let mut donor = swap_fixture();
    let expected = donor.clone();
    let mut target = SpMat::<f64>::eye(2, 2).unwrap();
    target.steal(&mut donor).unwrap();
    assert_eq!(target, expected);
    assert_eq!(donor.shape(), (0, 0));
    assert_eq!(donor.nonzero_count(), 0);
}

#[test]
fn layout_round_trip() {
    let mut rng = StdRng::seed_from_u64(11);
    let mut mat = SpMat::<f32>::sprandu(40, 25, 0.1, &mut rng).unwrap();
    mat.elem_mut(3, 3).unwrap().set(-1.0);

    let bytes = mat.to_layout_bytes().unwrap();
    let decoded = SpMat::<f32>::from_layout_bytes(&bytes).unwrap();
    assert_eq!(decoded, mat);
}

/// Random inserts and erases through both write paths, checked against a
/// dense model after every step
#[test]
fn random_edits_match_dense_model() {
    const ROWS: usize = 13;
    const COLS: usize = 9;
    let mut rng = StdRng::seed_from_u64(42);
    let mut mat = SpMat::<i64>::new(ROWS, COLS).unwrap();
    let mut model = vec![0i64; ROWS * COLS];

    for step in 0..400 {
        let row = rng.gen_range(0..ROWS);
        let col = rng.gen_range(0..COLS);
        let value = if rng.gen_bool(0.3) {
            0
        } else {
            rng.gen_range(-5..=5)
        };
        match step % 3 {
            0 => mat.add_or_overwrite(row, col, value).unwrap(),
            1 => mat.elem_mut(row, col).unwrap().set(value),
            _ => mat.erase(row, col).unwrap(),
        }
        model[row + col * ROWS] = if step % 3 == 2 { 0 } else { value };

        if step % 50 == 0 {
            mat.sync().unwrap();
            mat.check_invariants().unwrap();
        }
        assert_eq!(mat.at(row, col), Ok(model[row + col * ROWS]));
    }

    let expected_nnz = model.iter().filter(|&&v| v != 0).count();
    assert_eq!(mat.nonzero_count(), expected_nnz);
    for (index, &expected) in model.iter().enumerate() {
        assert_eq!(mat.at_linear(index), Ok(expected));
    }
    mat.sync_csc().unwrap();
    mat.check_invariants().unwrap();
}

#[test]
fn batch_is_order_independent() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut locations: Vec<[usize; 2]> = (0..200)
        .map(|_| [rng.gen_range(0..30), rng.gen_range(0..20)])
        .collect();
    let values: Vec<i64> = (0..200).map(|_| rng.gen_range(1..10)).collect();
    let options = BatchOptions::default().with_accumulate_duplicates(true);
    let reference = SpMat::from_batch(&locations, &values, 30, 20, options).unwrap();

    // Reverse both lists together; sums must not change.
    locations.reverse();
    let reversed: Vec<i64> = values.iter().rev().copied().collect();
    let permuted = SpMat::from_batch(&locations, &reversed, 30, 20, options).unwrap();
    assert_eq!(permuted, reference);

    let mut model = vec![0i64; 30 * 20];
    for (&[row, col], &value) in locations.iter().zip(&reversed) {
        model[row + col * 30] += value;
    }
    for (row, col, value) in reference.iter() {
        assert_eq!(model[row + col * 30], value);
    }
    assert_eq!(
        reference.nonzero_count(),
        model.iter().filter(|&&v| v != 0).count()
    );
}
