//! Build a random sparse matrix, edit it through both write paths and
//! persist it
//!
//! Run with `RUST_LOG=cscmat=debug` to see sync and rebuild events.

use std::io;
use std::time::Instant;

use cscmat::{Result, SpMat, SyncState};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(io::stderr)
        .init();

    let (n_rows, n_cols) = (20_000, 5_000);
    let mut rng = StdRng::seed_from_u64(2024);

    let start = Instant::now();
    let mut mat = SpMat::<f64>::sprandu(n_rows, n_cols, 0.001, &mut rng)?;
    println!(
        "Random {n_rows} x {n_cols} matrix with {} nonzeros in {:?}",
        mat.nonzero_count(),
        start.elapsed()
    );

    // Scattered writes land in the cache
    let start = Instant::now();
    for i in 0..1_000 {
        let (row, col) = ((i * 7919) % n_rows, (i * 104_729) % n_cols);
        mat.elem_mut(row, col)?.add_assign(1.0);
    }
    assert_eq!(mat.sync_state(), SyncState::DirtyCache);
    println!("1000 cached writes in {:?}", start.elapsed());

    let start = Instant::now();
    mat.sync()?;
    println!(
        "Synced to CSC in {:?}, now {} nonzeros",
        start.elapsed(),
        mat.nonzero_count()
    );

    // Direct writes shift the arrays
    let start = Instant::now();
    for col in 0..100 {
        mat.add_or_overwrite(col, col, -1.0)?;
    }
    println!("100 direct writes in {:?}", start.elapsed());

    mat.shed_cols(0, 9)?;
    mat.swap_rows(0, n_rows - 1)?;
    println!("After edits: {:?}, {} nonzeros", mat.shape(), mat.nonzero_count());

    let bytes = mat.to_layout_bytes()?;
    let decoded = SpMat::<f64>::from_layout_bytes(&bytes)?;
    println!(
        "Persisted layout is {} bytes, round trip equal: {}",
        bytes.len(),
        decoded == mat
    );
    Ok(())
}
