//! Empirical distributions and Shannon entropy

use std::collections::HashMap;
use std::hash::Hash;

/// Count occurrences of each distinct symbol
pub fn frequency_counts<T, I>(symbols: I) -> HashMap<T, usize>
where
    T: Hash + Eq,
    I: IntoIterator<Item = T>,
{
    let mut counts = HashMap::new();
    for symbol in symbols {
        *counts.entry(symbol).or_insert(0) += 1;
    }
    counts
}

/// Shannon entropy in bits of a distribution given by symbol counts
///
/// Computes `-Σ p * log2(p)` with `p = count / total`. Zero counts contribute
/// nothing and an empty distribution has zero entropy.
pub fn shannon_entropy<I>(counts: I) -> f64
where
    I: IntoIterator<Item = usize>,
{
    let counts: Vec<usize> = counts.into_iter().filter(|&count| count > 0).collect();
    let total: usize = counts.iter().sum();
    if total == 0 {
        return 0.0;
    }

    let total = total as f64;
    let entropy = counts
        .iter()
        .map(|&count| {
            let p = count as f64 / total;
            -p * p.log2()
        })
        .sum::<f64>();

    // A single symbol sums to -0.0
    entropy.max(0.0)
}
