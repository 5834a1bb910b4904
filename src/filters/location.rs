use std::fmt;

use url::form_urlencoded;

/// Navigable address of a screen: a path plus an ordered query string.
///
/// Plays the part of the browser URL. Filter state is read back from it, and
/// filter commits are merged into it one key at a time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
    path: String,
    query: Vec<(String, String)>,
}

impl Location {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: normalize_path(&path.into()),
            query: Vec::new(),
        }
    }

    /// Parses `"/emprestimos?status=PENDENTE&codigo=B1"`.
    ///
    /// Accepts a full URL as well; scheme and host are ignored. Empty values
    /// are dropped so `?codigo=` reads the same as no `codigo` at all.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        let raw = match url::Url::parse(raw) {
            Ok(u) if raw.contains("://") => match u.query() {
                Some(q) => format!("{}?{q}", u.path()),
                None => u.path().to_string(),
            },
            _ => raw.to_string(),
        };

        let (path, query) = raw.split_once('?').unwrap_or((raw.as_str(), ""));
        let query = form_urlencoded::parse(query.as_bytes())
            .filter(|(_, v)| !v.is_empty())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        Self {
            path: normalize_path(path),
            query,
        }
    }

    #[must_use]
    pub fn with_query<K, V>(path: impl Into<String>, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut location = Self::new(path);
        for (k, v) in pairs {
            location.merge(&k.into(), Some(v.into()));
        }
        location
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn pairs(&self) -> &[(String, String)] {
        &self.query
    }

    /// Sets or removes a single query key, leaving every other key untouched.
    ///
    /// `None` or an empty value removes the key. An existing key keeps its
    /// position; a new key is appended.
    pub fn merge(&mut self, key: &str, value: Option<String>) {
        match value.filter(|v| !v.is_empty()) {
            Some(value) => {
                if let Some(slot) = self.query.iter_mut().find(|(k, _)| k == key) {
                    slot.1 = value;
                } else {
                    self.query.push((key.to_string(), value));
                }
            }
            None => self.query.retain(|(k, _)| k != key),
        }
    }

    #[must_use]
    pub fn query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query.iter())
            .finish()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.query.is_empty() {
            f.write_str(&self.path)
        } else {
            write!(f, "{}?{}", self.path, self.query_string())
        }
    }
}

fn normalize_path(path: &str) -> String {
    let trimmed = path.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}
