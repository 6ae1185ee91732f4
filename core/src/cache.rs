//! Caller-side store of the latest page per category.
//!
//! Insertion overwrites: the last successful fetch for a category wins and
//! pages are never merged.

use std::collections::HashMap;

use crate::types::{Category, MovieEntry, MovieListPage};

#[derive(Debug, Clone, Default)]
pub struct PageCache {
    pages: HashMap<Category, MovieListPage>,
}

impl PageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `page` for `category`, returning the page it replaced.
    pub fn insert(&mut self, category: Category, page: MovieListPage) -> Option<MovieListPage> {
        self.pages.insert(category, page)
    }

    pub fn get(&self, category: Category) -> Option<&MovieListPage> {
        self.pages.get(&category)
    }

    pub fn remove(&mut self, category: Category) -> Option<MovieListPage> {
        self.pages.remove(&category)
    }

    pub fn contains(&self, category: Category) -> bool {
        self.pages.contains_key(&category)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Cached pages in tab order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &MovieListPage)> {
        Category::ALL
            .into_iter()
            .filter_map(|category| self.pages.get(&category).map(|page| (category, page)))
    }

    /// Rows to show for `category`; empty until a page has been stored.
    pub fn entries_for_display(&self, category: Category) -> &[MovieEntry] {
        self.get(category).map(MovieListPage::entries).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(titles: &[&str]) -> MovieListPage {
        MovieListPage {
            page: Some(1),
            results: Some(
                titles
                    .iter()
                    .map(|t| MovieEntry {
                        title: Some(t.to_string()),
                        ..Default::default()
                    })
                    .collect(),
            ),
            ..Default::default()
        }
    }

    #[test]
    fn insert_overwrites_previous_page() {
        let mut cache = PageCache::new();
        assert!(cache.insert(Category::Popular, page(&["A", "B"])).is_none());
        let previous = cache.insert(Category::Popular, page(&["C"])).unwrap();
        assert_eq!(previous.entries().len(), 2);
        assert_eq!(cache.entries_for_display(Category::Popular).len(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn missing_category_has_no_rows() {
        let cache = PageCache::new();
        assert!(cache.is_empty());
        assert!(!cache.contains(Category::Upcoming));
        assert!(cache.entries_for_display(Category::Upcoming).is_empty());
    }

    #[test]
    fn iter_follows_tab_order() {
        let mut cache = PageCache::new();
        cache.insert(Category::Upcoming, page(&["U"]));
        cache.insert(Category::TopRated, page(&["T"]));
        let order: Vec<Category> = cache.iter().map(|(c, _)| c).collect();
        assert_eq!(order, vec![Category::TopRated, Category::Upcoming]);
    }

    #[test]
    fn remove_drops_the_page() {
        let mut cache = PageCache::new();
        cache.insert(Category::NowPlaying, page(&["N"]));
        assert!(cache.remove(Category::NowPlaying).is_some());
        assert!(cache.get(Category::NowPlaying).is_none());
    }
}
