use std::ops::Range;

/// Split `len` cell keys into contiguous, near-equal shards.
///
/// Uses `min(len, workers)` shards; the first `len % shards` get one extra
/// key. Empty input (or no workers) yields no shards.
pub fn partition(len: usize, workers: usize) -> Vec<Range<usize>> {
    let active = len.min(workers);
    if active == 0 {
        return Vec::new();
    }
    let base = len / active;
    let remainder = len % active;

    let mut shards = Vec::with_capacity(active);
    let mut start = 0;
    for i in 0..active {
        let size = base + usize::from(i < remainder);
        shards.push(start..start + size);
        start += size;
    }
    debug_assert_eq!(start, len);
    shards
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remainder_goes_to_first_shards() {
        assert_eq!(partition(10, 4), vec![0..3, 3..6, 6..8, 8..10]);
    }

    #[test]
    fn fewer_keys_than_workers() {
        assert_eq!(partition(3, 8), vec![0..1, 1..2, 2..3]);
    }

    #[test]
    fn nothing_to_split() {
        assert!(partition(0, 4).is_empty());
        assert!(partition(5, 0).is_empty());
    }

    #[test]
    fn shards_cover_everything_once() {
        for len in 0..50 {
            for workers in 1..9 {
                let shards = partition(len, workers);
                let covered: usize = shards.iter().map(|r| r.len()).sum();
                assert_eq!(covered, len);
                assert!(shards.windows(2).all(|w| w[0].end == w[1].start));
                if let (Some(max), Some(min)) = (
                    shards.iter().map(|r| r.len()).max(),
                    shards.iter().map(|r| r.len()).min(),
                ) {
                    assert!(max - min <= 1);
                }
            }
        }
    }
}
