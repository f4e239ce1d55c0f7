//! Recently opened project files, most recent first.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentProjects {
    items: Vec<String>,
    max: usize,
}

impl RecentProjects {
    pub fn new(items: Vec<String>, max: usize) -> Self {
        let mut recent = Self {
            items: Vec::new(),
            max,
        };
        // oldest first so the original order survives de-duplication
        for item in items.into_iter().rev() {
            recent.add(&item);
        }
        recent
    }

    /// Move `path` to the front, dropping the oldest entry past `max`.
    pub fn add(&mut self, path: &str) {
        if path.is_empty() {
            return;
        }
        self.items.retain(|p| p != path);
        self.items.insert(0, path.to_string());
        self.items.truncate(self.max);
    }

    pub fn remove(&mut self, path: &str) {
        self.items.retain(|p| p != path);
    }

    pub fn contains(&self, path: &str) -> bool {
        self.items.iter().any(|p| p == path)
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_moves_to_front() {
        let mut recent = RecentProjects::new(Vec::new(), 10);
        recent.add("/a.ppad");
        recent.add("/b.ppad");
        recent.add("/a.ppad");
        assert_eq!(recent.items(), &["/a.ppad".to_string(), "/b.ppad".to_string()]);
    }

    #[test]
    fn test_bounded() {
        let mut recent = RecentProjects::new(Vec::new(), 2);
        recent.add("/a.ppad");
        recent.add("/b.ppad");
        recent.add("/c.ppad");
        assert_eq!(recent.items().len(), 2);
        assert!(!recent.contains("/a.ppad"));
        assert_eq!(recent.items()[0], "/c.ppad");
    }

    #[test]
    fn test_new_keeps_order_and_dedupes() {
        let recent = RecentProjects::new(
            vec!["/x.ppad".into(), "/y.ppad".into(), "/x.ppad".into()],
            5,
        );
        assert_eq!(recent.items(), &["/x.ppad".to_string(), "/y.ppad".to_string()]);
    }

    #[test]
    fn test_remove_and_empty_path() {
        let mut recent = RecentProjects::new(vec!["/x.ppad".into()], 5);
        recent.add("");
        recent.remove("/x.ppad");
        assert!(recent.items().is_empty());
    }
}
