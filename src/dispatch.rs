//! Fan the working table out over a fixed set of worker threads

use anyhow::{anyhow, Result};
use log::{debug, warn};
use std::fmt::Display;
use std::ops::Range;
use std::thread;

use crate::types::{WorkingCity, ZipResult};

/// Default worker count: one less than the available parallelism, at least 1
pub fn default_workers() -> usize {
    thread::available_parallelism()
        .map(|n| n.get().saturating_sub(1))
        .unwrap_or(1)
        .max(1)
}

/// Split `len` rows into `n` contiguous ranges whose sizes differ by at most
/// one. The first `len % n` ranges take the extra row. `n` is clamped so no
/// range is empty unless `len` is zero.
pub fn partition(len: usize, n: usize) -> Vec<Range<usize>> {
    if len == 0 {
        return Vec::new();
    }
    let n = n.clamp(1, len);
    let base = len / n;
    let extra = len % n;

    let mut ranges = Vec::with_capacity(n);
    let mut start = 0;
    for i in 0..n {
        let size = base + usize::from(i < extra);
        ranges.push(start..start + size);
        start += size;
    }
    ranges
}

/// Scrape one chunk. Failures degrade to an empty ZIP string.
fn scrape_chunk<F, E>(chunk: &[WorkingCity], fetch: &F) -> Vec<ZipResult>
where
    F: Fn(&str) -> Result<String, E>,
    E: Display,
{
    chunk
        .iter()
        .map(|city| {
            let zips = match fetch(&city.url) {
                Ok(zips) => zips,
                Err(e) => {
                    warn!("{}: {}", city.city_state, e);
                    String::new()
                }
            };
            ZipResult::new(city, zips)
        })
        .collect()
}

/// Run `fetch` over every city, one thread per chunk, and reassemble the
/// results in chunk order.
pub fn scrape_all<F, E>(
    cities: &[WorkingCity],
    workers: usize,
    fetch: F,
    quiet: bool,
) -> Result<Vec<ZipResult>>
where
    F: Fn(&str) -> Result<String, E> + Sync,
    E: Display,
{
    let ranges = partition(cities.len(), workers);
    let total_chunks = ranges.len();
    let fetch = &fetch;

    thread::scope(|scope| {
        let handles: Vec<_> = ranges
            .into_iter()
            .enumerate()
            .map(|(chunk_idx, range)| {
                let chunk = &cities[range];
                scope.spawn(move || {
                    debug!("Chunk {} started with {} cities", chunk_idx, chunk.len());
                    let results = scrape_chunk(chunk, fetch);
                    if !quiet {
                        println!(
                            "  Chunk {}/{} done ({} cities)",
                            chunk_idx + 1,
                            total_chunks,
                            results.len()
                        );
                    }
                    results
                })
            })
            .collect();

        let mut results = Vec::with_capacity(cities.len());
        for (chunk_idx, handle) in handles.into_iter().enumerate() {
            let chunk = handle
                .join()
                .map_err(|_| anyhow!("Worker for chunk {} panicked", chunk_idx))?;
            results.extend(chunk);
        }
        Ok(results)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::city_state_key;

    fn cities(n: usize) -> Vec<WorkingCity> {
        (0..n)
            .map(|i| {
                let city = format!("City{}", i);
                WorkingCity {
                    city_state: city_state_key(&city, "Texas"),
                    url: format!("https://example.test/texas/{}/", i),
                    city,
                    state_short: "TX".to_string(),
                    state_full: "Texas".to_string(),
                }
            })
            .collect()
    }

    #[test]
    fn test_partition_ten_by_three() {
        let ranges = partition(10, 3);
        assert_eq!(ranges, vec![0..4, 4..7, 7..10]);
        assert_eq!(ranges.iter().map(|r| r.len()).sum::<usize>(), 10);
    }

    #[test]
    fn test_partition_covers_exactly() {
        for len in 0..40 {
            for n in 1..12 {
                let ranges = partition(len, n);
                let mut next = 0;
                for r in &ranges {
                    assert_eq!(r.start, next, "gap or overlap for len={} n={}", len, n);
                    next = r.end;
                }
                assert_eq!(next, len);
                if len > 0 {
                    assert!(ranges.iter().all(|r| !r.is_empty()));
                    let max = ranges.iter().map(|r| r.len()).max().unwrap();
                    let min = ranges.iter().map(|r| r.len()).min().unwrap();
                    assert!(max - min <= 1);
                }
            }
        }
    }

    #[test]
    fn test_partition_more_workers_than_rows() {
        assert_eq!(partition(2, 8), vec![0..1, 1..2]);
        assert!(partition(0, 4).is_empty());
        assert_eq!(partition(5, 0), vec![0..5]);
    }

    #[test]
    fn test_default_workers_at_least_one() {
        assert!(default_workers() >= 1);
    }

    #[test]
    fn test_scrape_all_preserves_order() {
        let input = cities(10);
        let results = scrape_all(
            &input,
            3,
            |url: &str| -> Result<String, String> { Ok(format!("zip-for {}", url)) },
            true,
        )
        .unwrap();

        assert_eq!(results.len(), 10);
        for (city, result) in input.iter().zip(&results) {
            assert_eq!(result.city_state, city.city_state);
            assert_eq!(result.zips, format!("zip-for {}", city.url));
        }
    }

    #[test]
    fn test_scrape_all_failures_become_empty() {
        let input = cities(4);
        let results = scrape_all(
            &input,
            2,
            |url: &str| {
                if url.ends_with("/2/") {
                    Err("connection reset".to_string())
                } else {
                    Ok("73301".to_string())
                }
            },
            true,
        )
        .unwrap();

        assert_eq!(results.len(), 4);
        assert!(results[2].is_missing());
        assert_eq!(results[3].zips, "73301");
    }
}
