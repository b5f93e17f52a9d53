//! Top-down merge sort over an auxiliary buffer.

use crate::events::Recorder;
use crate::SortRun;

/// Sort `values` with recursive merge sort.
///
/// Splits emit nothing. Each merge compares the two run heads, then writes
/// the smaller one (left on ties) with `swap` + `update`. Leftovers are
/// drained without further comparisons.
pub fn merge_sort(values: &[u32]) -> SortRun {
    let mut arr = values.to_vec();
    let mut aux = arr.clone();
    let mut rec = Recorder::new();

    if !arr.is_empty() {
        let right = arr.len() - 1;
        sort_range(&mut arr, &mut aux, 0, right, &mut rec);
    }

    rec.sorted_all(arr.len());

    SortRun {
        sorted: arr,
        events: rec.finish(),
    }
}

fn sort_range(arr: &mut [u32], aux: &mut [u32], left: usize, right: usize, rec: &mut Recorder) {
    if left >= right {
        return;
    }

    let mid = left + (right - left) / 2;
    sort_range(arr, aux, left, mid, rec);
    sort_range(arr, aux, mid + 1, right, rec);
    merge(arr, aux, left, mid, right, rec);
}

fn merge(
    arr: &mut [u32],
    aux: &mut [u32],
    left: usize,
    mid: usize,
    right: usize,
    rec: &mut Recorder,
) {
    aux[left..=right].copy_from_slice(&arr[left..=right]);

    let mut i = left;
    let mut j = mid + 1;
    let mut k = left;

    while i <= mid && j <= right {
        rec.compare(i, j);

        let value = if aux[i] <= aux[j] {
            i += 1;
            aux[i - 1]
        } else {
            j += 1;
            aux[j - 1]
        };
        write(arr, k, value, rec);
        k += 1;
    }

    for &value in aux[i..=mid].iter().chain(&aux[j..=right]) {
        write(arr, k, value, rec);
        k += 1;
    }
}

fn write(arr: &mut [u32], k: usize, value: u32, rec: &mut Recorder) {
    rec.swap(&[k]);
    arr[k] = value;
    rec.update(&[(k, value)]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SortEvent;

    #[test]
    fn sorts_example_input() {
        let run = merge_sort(&[5, 3, 8, 1, 2]);
        assert_eq!(run.sorted, vec![1, 2, 3, 5, 8]);
    }

    #[test]
    fn two_elements_compare_then_write_both() {
        let run = merge_sort(&[4, 1]);
        assert_eq!(
            run.events,
            vec![
                SortEvent::Compare { indices: vec![0, 1] },
                SortEvent::Swap { indices: vec![0] },
                SortEvent::Update {
                    indices: vec![0],
                    values: vec![1]
                },
                SortEvent::Swap { indices: vec![1] },
                SortEvent::Update {
                    indices: vec![1],
                    values: vec![4]
                },
                SortEvent::Sorted { indices: vec![0] },
                SortEvent::Sorted { indices: vec![1] },
            ]
        );
    }

    #[test]
    fn every_write_is_swap_then_update_at_same_slot() {
        let run = merge_sort(&[9, 7, 5, 3, 1, 2, 4]);
        for pair in run.events.windows(2) {
            if let SortEvent::Update { indices, .. } = &pair[1] {
                assert_eq!(pair[0], SortEvent::Swap { indices: indices.clone() });
            }
        }
    }

    #[test]
    fn sorted_events_come_last() {
        let run = merge_sort(&[3, 1, 2]);
        let tail = &run.events[run.events.len() - 3..];
        assert!(tail
            .iter()
            .all(|e| matches!(e, SortEvent::Sorted { .. })));
        let head = &run.events[..run.events.len() - 3];
        assert!(!head.iter().any(|e| matches!(e, SortEvent::Sorted { .. })));
    }

    #[test]
    fn empty_input() {
        let run = merge_sort(&[]);
        assert!(run.sorted.is_empty());
        assert!(run.events.is_empty());
    }
}
