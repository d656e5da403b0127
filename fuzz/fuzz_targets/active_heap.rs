#![no_main]

use arbitrary::{Arbitrary, Unstructured};

use libfuzzer_sys::fuzz_target;
use skyline::{
    Building,
    active::{ActiveHeap, Closed},
    index::BuildingIdx,
};

#[derive(Arbitrary, Debug)]
enum Op {
    Insert { close: i8, height: u8 },
    Pop,
}

fn arbitrary_ops(mut u: Unstructured) -> Result<(), arbitrary::Error> {
    let len = u.arbitrary_len::<Op>()?;
    // The model is a list of (close, index, height), in insertion order.
    let mut model: Vec<(i64, BuildingIdx, i64)> = Vec::new();
    let mut heap = ActiveHeap::new();
    for next_idx in 0..len {
        match u.arbitrary()? {
            Op::Insert { close, height } => {
                let close = i64::from(close);
                let b = Building {
                    x1: i64::from(i8::MIN),
                    x2: close,
                    height: i64::from(height),
                };
                heap.insert(BuildingIdx(next_idx), &b);
                model.push((close, BuildingIdx(next_idx), b.height));
            }
            Op::Pop => {
                let Some(pos) = (0..model.len()).min_by_key(|&i| (model[i].0, model[i].1)) else {
                    continue;
                };
                let (close, idx, _) = model.remove(pos);
                let remaining_height = model.iter().map(|m| m.2).max().unwrap_or(0);
                assert_eq!(
                    heap.pop_nearest_close(),
                    Closed {
                        idx,
                        close,
                        remaining_height,
                    }
                );
            }
        }

        assert_eq!(heap.len(), model.len());
        assert_eq!(heap.nearest_close(), model.iter().map(|m| m.0).min());
        assert_eq!(heap.max_height(), model.iter().map(|m| m.2).max().unwrap_or(0));
    }
    Ok(())
}

fuzz_target!(|data: &[u8]| {
    let u = Unstructured::new(data);
    let _ = arbitrary_ops(u);
});
