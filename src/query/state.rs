/// What a screen shows for one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryState<T> {
    Loading,
    Error,
    Empty,
    Ready(T),
}

impl<T> QueryState<Vec<T>> {
    /// `None` is a failed read; an empty list is a successful one with no rows.
    #[must_use]
    pub fn from_list(result: Option<Vec<T>>) -> Self {
        match result {
            None => Self::Error,
            Some(items) if items.is_empty() => Self::Empty,
            Some(items) => Self::Ready(items),
        }
    }
}

impl<T> QueryState<T> {
    #[must_use]
    pub fn from_item(result: Option<T>) -> Self {
        result.map_or(Self::Error, Self::Ready)
    }

    #[must_use]
    pub const fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        Self::Loading
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_states() {
        assert_eq!(QueryState::<Vec<u8>>::from_list(None), QueryState::Error);
        assert_eq!(QueryState::<Vec<u8>>::from_list(Some(vec![])), QueryState::Empty);
        assert_eq!(
            QueryState::from_list(Some(vec![1u8])),
            QueryState::Ready(vec![1])
        );
        assert!(QueryState::<Vec<u8>>::default().is_loading());
    }

    #[test]
    fn test_item_state() {
        assert_eq!(QueryState::<u8>::from_item(None), QueryState::Error);
        assert_eq!(QueryState::from_item(Some(3u8)).ready(), Some(&3));
    }
}
