use url::Url;

/// Path-mode history: URLs are `base + full_path`, no hash routing.
#[derive(Debug, Clone, Default)]
pub struct PathHistory {
    base: String,
    entries: Vec<String>,
    index: usize,
}

impl PathHistory {
    /// `base` is expected normalized (see [`crate::config::normalize_base`]).
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            entries: Vec::new(),
            index: 0,
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Browser-facing URL for an in-app location.
    pub fn url_for(&self, full_path: &str) -> String {
        format!("{}{}", self.base, full_path)
    }

    /// In-app location for an incoming URL. Absolute URLs keep only their
    /// path, query and fragment; the base prefix is removed when present.
    pub fn strip_base(&self, url: &str) -> String {
        let raw = match Url::parse(url) {
            Ok(parsed) if parsed.has_host() => {
                let mut out = parsed.path().to_string();
                if let Some(query) = parsed.query() {
                    out.push('?');
                    out.push_str(query);
                }
                if let Some(fragment) = parsed.fragment() {
                    out.push('#');
                    out.push_str(fragment);
                }
                out
            }
            _ => url.to_string(),
        };

        if self.base.is_empty() {
            return raw;
        }
        match raw.strip_prefix(&self.base) {
            Some(rest) if rest.is_empty() => "/".to_string(),
            Some(rest) if rest.starts_with(['?', '#']) => format!("/{rest}"),
            Some(rest) if rest.starts_with('/') => rest.to_string(),
            _ => raw,
        }
    }

    pub fn current(&self) -> Option<&str> {
        self.entries.get(self.index).map(String::as_str)
    }

    pub fn previous(&self) -> Option<&str> {
        self.index
            .checked_sub(1)
            .and_then(|i| self.entries.get(i))
            .map(String::as_str)
    }

    /// Add an entry after the current one, dropping any forward entries.
    pub fn push(&mut self, full_path: String) {
        if !self.entries.is_empty() {
            self.entries.truncate(self.index + 1);
        }
        self.entries.push(full_path);
        self.index = self.entries.len() - 1;
    }

    pub fn replace(&mut self, full_path: String) {
        match self.entries.get_mut(self.index) {
            Some(entry) => *entry = full_path,
            None => self.push(full_path),
        }
    }

    /// Step back one entry and record where the navigation actually landed.
    pub fn back(&mut self, landed: String) {
        if self.index > 0 {
            self.index -= 1;
        }
        self.replace(landed);
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn index(&self) -> usize {
        self.index
    }
}
