//! Stable merge sort driven by a less-than predicate.
//!
//! `slice::sort_by` may panic when handed an ordering that is not total.
//! Caller-supplied comparators are not trusted to be consistent, so keys are
//! sorted here instead: the merge only ever asks `less(right, left)` and moves
//! each element exactly once per level, which bounds the work at
//! O(n log n) predicate calls whatever the predicate answers.

/// Runs at or below this length are sorted by insertion.
const INSERTION_THRESHOLD: usize = 16;

/// Sorts `items` in place so that no element is `less` than its predecessor.
///
/// Elements that compare equal keep their relative order.
pub(crate) fn sort_by_less<T, F>(items: &mut Vec<T>, less: F)
where
    F: Fn(&T, &T) -> bool,
{
    let taken = std::mem::take(items);
    *items = merge_sort(taken, &less);
}

fn merge_sort<T, F>(mut items: Vec<T>, less: &F) -> Vec<T>
where
    F: Fn(&T, &T) -> bool,
{
    if items.len() <= INSERTION_THRESHOLD {
        insertion_sort(&mut items, less);
        return items;
    }

    let right = items.split_off(items.len() / 2);
    let left = merge_sort(items, less);
    let right = merge_sort(right, less);
    merge(left, right, less)
}

fn insertion_sort<T, F>(items: &mut [T], less: &F)
where
    F: Fn(&T, &T) -> bool,
{
    for unsorted in 1..items.len() {
        let mut position = unsorted;
        while position > 0 && less(&items[position], &items[position - 1]) {
            items.swap(position, position - 1);
            position -= 1;
        }
    }
}

fn merge<T, F>(left: Vec<T>, right: Vec<T>, less: &F) -> Vec<T>
where
    F: Fn(&T, &T) -> bool,
{
    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();

    loop {
        let take_right = match (left.peek(), right.peek()) {
            (Some(left_head), Some(right_head)) => less(right_head, left_head),
            _ => break,
        };
        let next = if take_right { right.next() } else { left.next() };
        merged.extend(next);
    }

    merged.extend(left);
    merged.extend(right);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::cell::Cell;

    #[rstest]
    #[case(vec![])]
    #[case(vec![1])]
    #[case(vec![2, 1])]
    #[case(vec![5, 3, 9, 1, 1, 0, -4, 12])]
    #[case((0..100).rev().collect())]
    #[case((0..257).map(|index| (index * 7919) % 101).collect())]
    fn test_sorts_ascending(#[case] mut items: Vec<i32>) {
        let mut expected = items.clone();
        expected.sort_unstable();

        sort_by_less(&mut items, |left, right| left < right);

        assert_eq!(items, expected);
    }

    #[rstest]
    fn test_equal_elements_keep_relative_order() {
        let mut items: Vec<(usize, usize)> = (0..60).map(|index| (index % 3, index)).collect();

        sort_by_less(&mut items, |left, right| left.0 < right.0);

        for window in items.windows(2) {
            if window[0].0 == window[1].0 {
                assert!(window[0].1 < window[1].1);
            }
        }
    }

    #[rstest]
    fn test_inconsistent_predicate_terminates_without_losing_elements() {
        let calls = Cell::new(0_u64);
        let mut items: Vec<i32> = (0..500).collect();

        sort_by_less(&mut items, |_, _| {
            calls.set(calls.get() + 1);
            calls.get() % 3 == 0
        });

        let mut restored = items.clone();
        restored.sort_unstable();
        assert_eq!(restored, (0..500).collect::<Vec<_>>());
    }

    #[rstest]
    fn test_always_less_predicate_terminates() {
        let mut items: Vec<i32> = (0..100).collect();
        sort_by_less(&mut items, |_, _| true);
        assert_eq!(items.len(), 100);
    }
}
