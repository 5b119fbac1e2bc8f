//! Sliding preload window around the visible items

use rustc_hash::FxHashMap;

/// Number of items preloaded on each side of the visible range
pub const DEFAULT_PRELOAD_WINDOW: usize = 4;

/// Visible items as `location..=location + length`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VisibleRange {
    pub location: usize,
    pub length: usize,
}

impl VisibleRange {
    pub fn new(location: usize, length: usize) -> Self {
        Self { location, length }
    }

    /// Range spanning the smallest and largest visible index
    pub fn from_indices(indices: impl IntoIterator<Item = usize>) -> Self {
        let mut bounds: Option<(usize, usize)> = None;
        for idx in indices {
            bounds = Some(match bounds {
                Some((lo, hi)) => (lo.min(idx), hi.max(idx)),
                None => (idx, idx),
            });
        }
        match bounds {
            Some((lo, hi)) => Self::new(lo, hi - lo),
            None => Self::default(),
        }
    }

    /// Last visible index
    pub fn end(&self) -> usize {
        self.location.saturating_add(self.length)
    }

    /// Distance from `index` to the range, zero inside it
    pub fn distance_from(&self, index: usize) -> usize {
        if index < self.location {
            self.location - index
        } else if index > self.end() {
            index - self.end()
        } else {
            0
        }
    }
}

/// Items whose auxiliary resources can be preloaded
pub trait PreloadSource {
    type Resource;

    fn item_count(&self) -> usize;

    /// Acquire the resource for item `index`; `None` when it has nothing to preload
    fn preload_resource(&self, index: usize) -> Option<Self::Resource>;
}

/// Holds resources for items near the visible range.
///
/// Every update evicts items more than `window` away from the range, and items
/// the source no longer has, so the
/// number of held resources is bounded by the range plus `2 * window`,
/// regardless of item count. Dropping a resource releases it.
#[derive(Debug)]
pub struct Preloader<R> {
    window: usize,
    loaded: FxHashMap<usize, R>,
}

impl<R> Preloader<R> {
    pub fn new(window: usize) -> Self {
        Self {
            window,
            loaded: FxHashMap::default(),
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Refresh the window for a new visible range
    pub fn update_visible_range<S>(&mut self, range: VisibleRange, source: &S)
    where
        S: PreloadSource<Resource = R>,
    {
        let window = self.window;
        let count = source.item_count();
        self.loaded.retain(|&idx, _| {
            let keep = idx < count && range.distance_from(idx) <= window;
            if !keep {
                log::trace!("releasing preload for item {}", idx);
            }
            keep
        });

        for step in 1..=window {
            let before = range.location.checked_sub(step);
            let after = range.end().checked_add(step);
            for idx in [before, after].into_iter().flatten() {
                if idx >= count || self.loaded.contains_key(&idx) {
                    continue;
                }
                if let Some(resource) = source.preload_resource(idx) {
                    log::trace!("preloading item {}", idx);
                    self.loaded.insert(idx, resource);
                }
            }
        }
    }

    pub fn is_loaded(&self, index: usize) -> bool {
        self.loaded.contains_key(&index)
    }

    pub fn get(&self, index: usize) -> Option<&R> {
        self.loaded.get(&index)
    }

    /// Loaded item indices in ascending order
    pub fn loaded_indices(&self) -> Vec<usize> {
        let mut indices: Vec<_> = self.loaded.keys().copied().collect();
        indices.sort_unstable();
        indices
    }

    pub fn len(&self) -> usize {
        self.loaded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaded.is_empty()
    }

    /// Release everything
    pub fn clear(&mut self) {
        self.loaded.clear();
    }
}

impl<R> Default for Preloader<R> {
    fn default() -> Self {
        Self::new(DEFAULT_PRELOAD_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Items with an image on every index not divisible by 5
    struct Feed(usize);

    impl PreloadSource for Feed {
        type Resource = String;

        fn item_count(&self) -> usize {
            self.0
        }

        fn preload_resource(&self, index: usize) -> Option<String> {
            (index % 5 != 0).then(|| format!("image-{}", index))
        }
    }

    #[test]
    fn test_visible_range_from_indices() {
        assert_eq!(VisibleRange::from_indices([7, 5, 6]), VisibleRange::new(5, 2));
        assert_eq!(VisibleRange::from_indices(std::iter::empty()), VisibleRange::new(0, 0));
    }

    #[test]
    fn test_distance() {
        let range = VisibleRange::new(10, 2);
        assert_eq!(range.distance_from(7), 3);
        assert_eq!(range.distance_from(11), 0);
        assert_eq!(range.distance_from(12), 0);
        assert_eq!(range.distance_from(15), 3);
    }

    #[test]
    fn test_preloads_around_range_and_skips_missing() {
        let mut preloader = Preloader::new(4);
        preloader.update_visible_range(VisibleRange::new(10, 1), &Feed(100));

        // 6..=9 before, 12..=15 after; 15 has nothing to preload
        assert_eq!(preloader.loaded_indices(), vec![6, 7, 8, 9, 12, 13, 14]);
        assert_eq!(preloader.get(12).map(String::as_str), Some("image-12"));
    }

    #[test]
    fn test_clamps_to_item_bounds() {
        let mut preloader = Preloader::new(4);
        preloader.update_visible_range(VisibleRange::new(1, 0), &Feed(4));
        assert_eq!(preloader.loaded_indices(), vec![2, 3]);
    }

    #[test]
    fn test_evicts_outside_window() {
        let mut preloader = Preloader::new(2);
        let feed = Feed(100);

        preloader.update_visible_range(VisibleRange::new(10, 0), &feed);
        assert_eq!(preloader.loaded_indices(), vec![8, 9, 11, 12]);

        preloader.update_visible_range(VisibleRange::new(20, 0), &feed);
        assert_eq!(preloader.loaded_indices(), vec![18, 19, 21, 22]);
        assert!(preloader.len() <= 2 * preloader.window());
    }

    #[test]
    fn test_evicts_items_past_shrunk_source() {
        let mut preloader = Preloader::new(4);

        preloader.update_visible_range(VisibleRange::new(0, 0), &Feed(10));
        assert_eq!(preloader.loaded_indices(), vec![1, 2, 3, 4]);

        // Same range, but only two items remain
        preloader.update_visible_range(VisibleRange::new(0, 0), &Feed(2));
        assert_eq!(preloader.loaded_indices(), vec![1]);
        assert!(preloader.get(3).is_none());
    }

    #[test]
    fn test_overlapping_update_keeps_loaded_items() {
        let mut preloader = Preloader::new(2);
        let feed = Feed(100);

        preloader.update_visible_range(VisibleRange::new(10, 0), &feed);
        preloader.update_visible_range(VisibleRange::new(11, 0), &feed);
        // Earlier loads within distance 2 of item 11 are kept, 10 has nothing
        assert_eq!(preloader.loaded_indices(), vec![9, 11, 12, 13]);
        assert!(!preloader.is_loaded(8));
    }
}
