//! Integer helpers used by the scale generators.

/// Returns the greatest common divisor of `x` and `y`.
///
/// # Examples
///
/// ```
/// # use combtune::math;
/// assert_eq!(math::gcd_u64(0, 0), 0);
/// assert_eq!(math::gcd_u64(0, 5), 5);
/// assert_eq!(math::gcd_u64(5, 0), 5);
/// assert_eq!(math::gcd_u64(4, 6), 2);
/// assert_eq!(math::gcd_u64(35, 21), 7);
/// assert_eq!(math::gcd_u64(35, 36), 1);
/// ```
pub fn gcd_u64(mut x: u64, mut y: u64) -> u64 {
    while y != 0 {
        let remainder = x % y;
        x = y;
        y = remainder;
    }
    x
}

/// Reduces the fraction `numer`/`denom` to lowest terms.
///
/// # Examples
///
/// ```
/// # use combtune::math;
/// assert_eq!(math::simplify_u64(35, 21), (5, 3));
/// assert_eq!(math::simplify_u64(35, 36), (35, 36));
/// assert_eq!(math::simplify_u64(16, 2), (8, 1));
/// ```
pub fn simplify_u64(numer: u64, denom: u64) -> (u64, u64) {
    let gcd = gcd_u64(numer, denom);
    if gcd == 0 {
        (numer, denom)
    } else {
        (numer / gcd, denom / gcd)
    }
}

/// Returns the remainder of `numer` / `denom` as a *positive* number between 0 and `denom-1`.
///
/// # Panics
///
/// Panics if `denom == 0` or `denom > i32::MAX`.
///
/// # Examples
///
/// ```
/// # use combtune::math;
/// assert_eq!(math::i32_rem_u(-6, 5), 4);
/// assert_eq!(math::i32_rem_u(-5, 5), 0);
/// assert_eq!(math::i32_rem_u(-1, 5), 4);
/// assert_eq!(math::i32_rem_u(0, 5), 0);
/// assert_eq!(math::i32_rem_u(1, 5), 1);
/// assert_eq!(math::i32_rem_u(6, 5), 1);
/// ```
pub fn i32_rem_u(numer: i32, denom: u32) -> u32 {
    let denom = i32::try_from(denom).expect("denominator out of range");
    numer.rem_euclid(denom) as u32
}

/// Enumerates every `k`-element subset of `0..n` in lexicographic order.
///
/// The enumeration yields combinations, not permutations, so the order of the
/// elements within one subset does not matter and each subset appears once.
///
/// # Examples
///
/// ```
/// # use combtune::math;
/// assert_eq!(
///     math::combinations(4, 2),
///     [[0, 1], [0, 2], [0, 3], [1, 2], [1, 3], [2, 3]]
/// );
/// assert_eq!(math::combinations(3, 3), [[0, 1, 2]]);
/// ```
pub fn combinations(n: usize, k: usize) -> Vec<Vec<usize>> {
    let mut result = Vec::new();
    let mut current = Vec::with_capacity(k);
    push_combinations(n, k, 0, &mut current, &mut result);
    result
}

fn push_combinations(
    n: usize,
    k: usize,
    start: usize,
    current: &mut Vec<usize>,
    result: &mut Vec<Vec<usize>>,
) {
    if current.len() == k {
        result.push(current.clone());
        return;
    }
    for index in start..n {
        current.push(index);
        push_combinations(n, k, index + 1, current, result);
        current.pop();
    }
}

/// Multiplies all factors, reporting `None` when the product would overflow.
///
/// # Examples
///
/// ```
/// # use combtune::math;
/// assert_eq!(math::checked_product([3, 5, 7]), Some(105));
/// assert_eq!(math::checked_product([]), Some(1));
/// assert_eq!(math::checked_product([u64::MAX, 2]), None);
/// ```
pub fn checked_product(factors: impl IntoIterator<Item = u64>) -> Option<u64> {
    factors
        .into_iter()
        .try_fold(1u64, |product, factor| product.checked_mul(factor))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn combination_counts_match_binomials() {
        for (n, k, expected) in [
            (3, 1, 3),
            (3, 2, 3),
            (4, 2, 6),
            (4, 3, 4),
            (5, 2, 10),
            (6, 3, 20),
            (8, 4, 70),
        ] {
            assert_eq!(combinations(n, k).len(), expected, "C({}, {})", n, k);
        }
    }

    #[test]
    fn combinations_are_strictly_increasing_index_sets() {
        for combination in combinations(6, 3) {
            assert!(combination.windows(2).all(|pair| pair[0] < pair[1]));
        }
    }
}
