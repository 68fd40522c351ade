use std::cmp::Ordering;

use super::models::Note;

/// Columns notes may be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    CreatedOn,
    UpdatedOn,
    ExpiresAt,
}

impl SortField {
    /// Map a client-supplied field name onto the allow-list; unknown names sort by creation time
    pub fn from_param(value: &str) -> Self {
        match value {
            "createdOn" => SortField::CreatedOn,
            "updatedOn" => SortField::UpdatedOn,
            "expiresAt" => SortField::ExpiresAt,
            _ => SortField::CreatedOn,
        }
    }

    fn compare(&self, a: &Note, b: &Note) -> Ordering {
        match self {
            SortField::CreatedOn => a.created_on.cmp(&b.created_on),
            SortField::UpdatedOn => a.updated_on.cmp(&b.updated_on),
            // Notes without expiry sort after every dated note
            SortField::ExpiresAt => match (a.expires_at, b.expires_at) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// `asc` in any case is ascending, everything else descending
    pub fn from_param(value: &str) -> Self {
        if value.eq_ignore_ascii_case("asc") {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub size: usize,
    pub sort: SortField,
    pub direction: SortDirection,
}

impl PageRequest {
    pub fn offset(&self) -> usize {
        self.page.saturating_mul(self.size)
    }

    /// Order notes in place; ties are broken by id to keep pages stable
    pub fn sort_notes(&self, notes: &mut [Note]) {
        notes.sort_by(|a, b| {
            let ordering = self.sort.compare(a, b).then_with(|| a.id.cmp(&b.id));
            match self.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
    }
}

/// One page of results without a total count
#[derive(Debug, Clone, PartialEq)]
pub struct Slice<T> {
    pub content: Vec<T>,
    pub has_next: bool,
    pub has_previous: bool,
}

impl<T> Slice<T> {
    /// Cut the page described by `request` out of an already ordered list
    pub fn from_ordered(items: Vec<T>, request: &PageRequest) -> Self {
        let offset = request.offset();
        let total = items.len();
        let content: Vec<T> = items.into_iter().skip(offset).take(request.size).collect();

        Self {
            has_next: offset.saturating_add(content.len()) < total,
            has_previous: request.page > 0,
            content,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Slice<U> {
        Slice {
            content: self.content.into_iter().map(f).collect(),
            has_next: self.has_next,
            has_previous: self.has_previous,
        }
    }
}
