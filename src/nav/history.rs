/// Visited paths with a cursor, browser style.
#[derive(Debug, Default, Clone)]
pub struct NavigationHistory {
    entries: Vec<String>,
    index: usize,
}

impl NavigationHistory {
    pub fn new(start: impl Into<String>) -> Self {
        Self {
            entries: vec![start.into()],
            index: 0,
        }
    }

    pub fn current(&self) -> Option<&str> {
        self.entries.get(self.index).map(String::as_str)
    }

    /// Record a visit. Forward entries are dropped; revisiting the current
    /// path is a no-op.
    pub fn push(&mut self, path: impl Into<String>) {
        let path = path.into();
        if self.current() == Some(path.as_str()) {
            return;
        }
        if self.entries.is_empty() {
            self.entries.push(path);
            self.index = 0;
            return;
        }
        self.entries.truncate(self.index + 1);
        self.entries.push(path);
        self.index = self.entries.len() - 1;
    }

    pub fn back(&mut self) -> Option<&str> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        self.current()
    }

    pub fn forward(&mut self) -> Option<&str> {
        if self.index + 1 >= self.entries.len() {
            return None;
        }
        self.index += 1;
        self.current()
    }

    pub fn can_go_back(&self) -> bool {
        self.index > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.index + 1 < self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn back_forward_and_truncate() {
        let mut h = NavigationHistory::new("/dashboard");
        h.push("/apps");
        h.push("/configs");
        assert_eq!(h.back(), Some("/apps"));
        assert_eq!(h.back(), Some("/dashboard"));
        assert_eq!(h.back(), None);
        assert_eq!(h.forward(), Some("/apps"));
        // pushing from the middle discards "/configs"
        h.push("/alerts/rules");
        assert!(!h.can_go_forward());
        assert_eq!(h.forward(), None);
        assert_eq!(h.back(), Some("/apps"));
        assert!(h.can_go_back());
    }

    #[test]
    fn repeated_push_is_ignored() {
        let mut h = NavigationHistory::new("/dashboard");
        h.push("/dashboard");
        assert!(!h.can_go_back());
        let mut empty = NavigationHistory::default();
        assert_eq!(empty.current(), None);
        empty.push("/logs");
        assert_eq!(empty.current(), Some("/logs"));
    }
}
