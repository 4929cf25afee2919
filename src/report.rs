use serde::Serialize;

/// Result of an analysis that needs a minimum amount of data to mean anything.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum Report<T> {
    Ready(T),
    Insufficient,
}

impl<T> Report<T> {
    pub fn is_insufficient(&self) -> bool {
        matches!(self, Report::Insufficient)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Report::Ready(v) => Some(v),
            Report::Insufficient => None,
        }
    }

    pub fn into_ready(self) -> Option<T> {
        match self {
            Report::Ready(v) => Some(v),
            Report::Insufficient => None,
        }
    }
}

impl<T> Report<Vec<T>> {
    /// An empty row set is reported as insufficient.
    pub fn from_rows(rows: Vec<T>) -> Self {
        if rows.is_empty() {
            Report::Insufficient
        } else {
            Report::Ready(rows)
        }
    }
}
