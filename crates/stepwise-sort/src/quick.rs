//! Quick sort with Lomuto partitioning.

use crate::events::Recorder;
use crate::SortRun;

/// Sort `values` with quick sort, pivoting on the last element of each
/// subrange.
pub fn quick_sort(values: &[u32]) -> SortRun {
    let mut arr = values.to_vec();
    let mut rec = Recorder::new();

    if !arr.is_empty() {
        let high = arr.len() - 1;
        sort_range(&mut arr, 0, high, &mut rec);
    }

    rec.sorted_all(arr.len());

    SortRun {
        sorted: arr,
        events: rec.finish(),
    }
}

fn sort_range(arr: &mut [u32], low: usize, high: usize, rec: &mut Recorder) {
    if low >= high {
        return;
    }

    let pivot = partition(arr, low, high, rec);
    if pivot > low {
        sort_range(arr, low, pivot - 1, rec);
    }
    sort_range(arr, pivot + 1, high, rec);
}

/// Partition `arr[low..=high]` around `arr[high]`, returning the pivot's
/// final position.
fn partition(arr: &mut [u32], low: usize, high: usize, rec: &mut Recorder) -> usize {
    let pivot = arr[high];
    let mut store = low;

    for j in low..high {
        rec.compare(j, high);

        if arr[j] <= pivot {
            rec.swap(&[store, j]);
            arr.swap(store, j);
            rec.update(&[(store, arr[store]), (j, arr[j])]);
            store += 1;
        }
    }

    rec.swap(&[store, high]);
    arr.swap(store, high);
    rec.update(&[(store, arr[store]), (high, arr[high])]);

    store
}
