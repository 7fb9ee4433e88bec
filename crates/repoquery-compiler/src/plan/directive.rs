//! Runtime directive values and result windows.
//!
//! A plan only records *where* limit, sort and page arguments come from.
//! At invocation time the caller supplies the values, and
//! [`QueryPlan::resolve_window`] merges them with the static parts of the plan.

use serde::Serialize;

use super::{Direction, LimitSpec, QueryPlan, SortItem};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectiveError {
    #[error("limit must be at least 1")]
    ZeroLimit,

    #[error("invalid limit range {start}..={end}: positions are 1-based and start must not exceed end")]
    InvalidRange { start: u64, end: u64 },

    #[error("page size must be at least 1")]
    ZeroPageSize,

    #[error("page numbers start at 1")]
    ZeroPage,

    #[error("sort attribute must not be empty")]
    EmptySortAttribute,

    #[error("no argument supplied for parameter {0}")]
    MissingArgument(usize),

    #[error("argument {index} should be {expected}")]
    WrongArgument { index: usize, expected: &'static str },

    #[error("result window offset overflows")]
    Overflow,
}

/// Cap on results, optionally starting at a 1-based position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Limit {
    max_results: u64,
    start_at: u64,
}

impl Limit {
    /// At most `max_results` results, from the first.
    pub fn of(max_results: u64) -> Result<Self, DirectiveError> {
        if max_results == 0 {
            return Err(DirectiveError::ZeroLimit);
        }
        Ok(Self {
            max_results,
            start_at: 1,
        })
    }

    /// Results at positions `start..=end`, 1-based.
    pub fn range(start: u64, end: u64) -> Result<Self, DirectiveError> {
        if start == 0 || end < start {
            return Err(DirectiveError::InvalidRange { start, end });
        }
        Ok(Self {
            max_results: end - start + 1,
            start_at: start,
        })
    }

    pub fn max_results(&self) -> u64 {
        self.max_results
    }

    pub fn start_at(&self) -> u64 {
        self.start_at
    }
}

/// Runtime sort criterion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Sort {
    attribute: String,
    direction: Direction,
    ignore_case: bool,
}

impl Sort {
    pub fn asc(attribute: impl Into<String>) -> Result<Self, DirectiveError> {
        Self::new(attribute.into(), Direction::Asc)
    }

    pub fn desc(attribute: impl Into<String>) -> Result<Self, DirectiveError> {
        Self::new(attribute.into(), Direction::Desc)
    }

    fn new(attribute: String, direction: Direction) -> Result<Self, DirectiveError> {
        if attribute.is_empty() {
            return Err(DirectiveError::EmptySortAttribute);
        }
        Ok(Self {
            attribute,
            direction,
            ignore_case: false,
        })
    }

    /// Compare without regard to case.
    pub fn ignore_case(mut self) -> Self {
        self.ignore_case = true;
        self
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_ignore_case(&self) -> bool {
        self.ignore_case
    }
}

/// Opaque continuation key for cursor-based paging.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Cursor(Vec<String>);

impl Cursor {
    pub fn new(keys: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self(keys.into_iter().map(Into::into).collect())
    }

    pub fn keys(&self) -> &[String] {
        &self.0
    }
}

/// Page request: 1-based page number, size, and optional sort.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Pageable {
    page: u64,
    size: u64,
    sort: Vec<Sort>,
    cursor: Option<Cursor>,
}

impl Pageable {
    /// First page of `size` results.
    pub fn of_size(size: u64) -> Result<Self, DirectiveError> {
        if size == 0 {
            return Err(DirectiveError::ZeroPageSize);
        }
        Ok(Self {
            page: 1,
            size,
            sort: Vec::new(),
            cursor: None,
        })
    }

    pub fn page(mut self, page: u64) -> Result<Self, DirectiveError> {
        if page == 0 {
            return Err(DirectiveError::ZeroPage);
        }
        self.page = page;
        Ok(self)
    }

    pub fn sort_by(mut self, sorts: impl IntoIterator<Item = Sort>) -> Self {
        self.sort.extend(sorts);
        self
    }

    /// Continue after the entity identified by `cursor` instead of by offset.
    pub fn after(mut self, cursor: Cursor) -> Self {
        self.cursor = Some(cursor);
        self
    }

    /// The page following this one, keeping size and sort.
    pub fn next(&self) -> Self {
        Self {
            page: self.page.saturating_add(1),
            cursor: None,
            ..self.clone()
        }
    }

    pub fn page_number(&self) -> u64 {
        self.page
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn sorts(&self) -> &[Sort] {
        &self.sort
    }

    pub fn cursor(&self) -> Option<&Cursor> {
        self.cursor.as_ref()
    }
}

/// One runtime argument, positioned like the method's parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectiveValue {
    /// A condition operand, assigned value or entity; ignored by windowing.
    Operand,
    Limit(Limit),
    Sort(Sort),
    Sorts(Vec<Sort>),
    Pageable(Pageable),
}

/// Concrete ordering and slice of results for one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Window {
    pub sort: Vec<Sort>,
    /// Results to skip, 0-based.
    pub offset: u64,
    pub max_results: Option<u64>,
    pub cursor: Option<Cursor>,
}

impl QueryPlan {
    /// Merge the plan's static directives with runtime arguments.
    ///
    /// `args` is positioned like the method's parameters. Static sort terms
    /// come first, followed by runtime sort sources in parameter order.
    pub fn resolve_window(&self, args: &[DirectiveValue]) -> Result<Window, DirectiveError> {
        let mut window = Window::default();

        for item in &self.sort {
            match item {
                SortItem::Static(term) => window.sort.push(Sort {
                    attribute: term.attribute.to_string(),
                    direction: term.direction,
                    ignore_case: false,
                }),
                SortItem::Parameter(i) => match arg(args, *i)? {
                    DirectiveValue::Sort(sort) => window.sort.push(sort.clone()),
                    _ => return Err(wrong(*i, "a Sort")),
                },
                SortItem::Parameters(i) => match arg(args, *i)? {
                    DirectiveValue::Sorts(sorts) => window.sort.extend(sorts.iter().cloned()),
                    DirectiveValue::Sort(sort) => window.sort.push(sort.clone()),
                    _ => return Err(wrong(*i, "Sort values")),
                },
                SortItem::Pageable(i) => match arg(args, *i)? {
                    DirectiveValue::Pageable(page) => window.sort.extend(page.sort.iter().cloned()),
                    _ => return Err(wrong(*i, "a Pageable")),
                },
            }
        }

        match self.limit {
            Some(LimitSpec::Fixed { count, offset }) => {
                window.offset = offset;
                window.max_results = Some(count);
            }
            Some(LimitSpec::Parameter(i)) => match arg(args, i)? {
                DirectiveValue::Limit(limit) => {
                    window.offset = limit.start_at - 1;
                    window.max_results = Some(limit.max_results);
                }
                _ => return Err(wrong(i, "a Limit")),
            },
            None => {}
        }

        if let Some(i) = self.pagination {
            let DirectiveValue::Pageable(page) = arg(args, i)? else {
                return Err(wrong(i, "a Pageable"));
            };
            window.offset = if page.cursor.is_some() {
                0
            } else {
                (page.page - 1)
                    .checked_mul(page.size)
                    .ok_or(DirectiveError::Overflow)?
            };
            window.max_results = Some(page.size);
            window.cursor = page.cursor.clone();
        }

        Ok(window)
    }
}

fn arg(args: &[DirectiveValue], index: usize) -> Result<&DirectiveValue, DirectiveError> {
    args.get(index).ok_or(DirectiveError::MissingArgument(index))
}

fn wrong(index: usize, expected: &'static str) -> DirectiveError {
    DirectiveError::WrongArgument { index, expected }
}
