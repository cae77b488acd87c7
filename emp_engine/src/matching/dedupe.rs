use std::collections::HashSet;

use crate::matching::CategoryNeed;

/// Removes repeated needs, keeping the first occurrence of each `main:sub:leaf` key and the original order.
pub fn dedupe_needs(needs: Vec<CategoryNeed>) -> Vec<CategoryNeed> {
    let mut seen = HashSet::with_capacity(needs.len());
    needs.into_iter().filter(|need| seen.insert(need.key())).collect()
}
