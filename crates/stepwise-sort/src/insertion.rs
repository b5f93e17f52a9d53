//! Shift-based insertion sort.

use crate::events::Recorder;
use crate::SortRun;

/// Sort `values` with insertion sort, recording every comparison and shift.
///
/// Each pass compares the new key against its left neighbour. Every shift
/// emits the look-ahead comparison (when one exists), a `swap` and the
/// `update` that moves the larger element right. Placing the key emits a
/// final `swap` + `update`.
pub fn insertion_sort(values: &[u32]) -> SortRun {
    let mut arr = values.to_vec();
    let mut rec = Recorder::new();

    for i in 1..arr.len() {
        let key = arr[i];
        // `hole` is the slot the key will eventually land in.
        let mut hole = i;

        rec.compare(i, i - 1);

        while hole > 0 && arr[hole - 1] > key {
            if hole > 1 {
                rec.compare(hole - 1, hole - 2);
            }
            rec.swap(&[hole, hole - 1]);
            arr[hole] = arr[hole - 1];
            rec.update(&[(hole, arr[hole])]);
            hole -= 1;
        }

        rec.swap(&[hole]);
        arr[hole] = key;
        rec.update(&[(hole, key)]);
    }

    rec.sorted_all(arr.len());

    SortRun {
        sorted: arr,
        events: rec.finish(),
    }
}
