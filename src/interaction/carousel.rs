use serde::{Deserialize, Serialize};

/// Tracks which series of the catalog is visible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesCarousel {
    index: usize,
}

impl SeriesCarousel {
    #[must_use]
    pub fn new(index: usize) -> Self {
        Self { index }
    }

    /// Raw index as last navigated; see [`Self::current_index`] for a bounded one.
    #[must_use]
    pub fn index(self) -> usize {
        self.index
    }

    /// Index clamped into a list of `len` series, `None` when the list is empty.
    #[must_use]
    pub fn current_index(self, len: usize) -> Option<usize> {
        (len > 0).then(|| self.index.min(len - 1))
    }

    #[must_use]
    pub fn current<T>(self, items: &[T]) -> Option<&T> {
        self.current_index(items.len()).map(|index| &items[index])
    }

    /// Advances with wrap-around; no-op for an empty list.
    pub fn next(&mut self, len: usize) {
        if let Some(index) = self.current_index(len) {
            self.index = (index + 1) % len;
        }
    }

    /// Steps back with wrap-around; no-op for an empty list.
    pub fn previous(&mut self, len: usize) {
        if let Some(index) = self.current_index(len) {
            self.index = (index + len - 1) % len;
        }
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::SeriesCarousel;

    #[test]
    fn previous_wraps_to_last() {
        let mut carousel = SeriesCarousel::default();
        carousel.previous(3);
        assert_eq!(carousel.index(), 2);
    }

    #[test]
    fn shrinking_list_clamps_current_index() {
        let carousel = SeriesCarousel::new(4);
        assert_eq!(carousel.current_index(2), Some(1));
        assert_eq!(carousel.current_index(0), None);
        assert_eq!(carousel.current(&["a", "b"]), Some(&"b"));
    }

    #[test]
    fn navigation_on_empty_list_is_noop() {
        let mut carousel = SeriesCarousel::new(1);
        carousel.next(0);
        carousel.previous(0);
        assert_eq!(carousel.index(), 1);
    }
}
