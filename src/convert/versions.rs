/// Two counterbalanced presentation orders over `n` trials.
///
/// `v1` is the identity order. `v2` rotates the list by `ceil(n / 2)`, so the
/// second half is presented first. Lists of zero or one trial are never rotated.
pub fn split_version_indices(n: usize) -> (Vec<usize>, Vec<usize>) {
    let identity: Vec<usize> = (0..n).collect();
    if n <= 1 {
        return (identity.clone(), identity);
    }

    let mid = n.div_ceil(2);
    let rotated = (mid..n).chain(0..mid).collect();
    (identity, rotated)
}

pub fn reorder<T: Clone>(items: &[T], order: &[usize]) -> Vec<T> {
    order.iter().map(|&index| items[index].clone()).collect()
}
