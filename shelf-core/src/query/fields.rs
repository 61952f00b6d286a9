//! Field descriptor table.
//!
//! Every [`FilterField`] maps to one row: the book column it reads and the
//! rule its constraint is checked with. The predicate engine is driven
//! entirely by this table.

use shelf_types::{Author, Book, FilterField, SortColumn};

/// Reads one column of a book.
pub type Accessor = fn(&Book) -> &str;

/// Attribute of a joined author record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorAttr {
    /// [`Author::sex`].
    Sex,
    /// [`Author::country`].
    Country,
}

impl AuthorAttr {
    /// Reads the attribute from an author record.
    #[inline]
    pub fn read(self, author: &Author) -> &str {
        match self {
            AuthorAttr::Sex => &author.sex,
            AuthorAttr::Country => &author.country,
        }
    }
}

/// How a constraint is matched against a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchRule {
    /// Case-insensitive substring.
    Contains,
    /// Substring on the raw value, case and all.
    RawContains,
    /// Exact equality.
    Exact,
    /// Every required item appears in the comma-split column.
    AllOf,
    /// Some author joined from the column has the attribute.
    AnyAuthor(AuthorAttr),
}

impl MatchRule {
    /// Returns `true` if the rule needs the author join.
    #[inline(always)]
    pub const fn needs_join(self) -> bool {
        matches!(self, MatchRule::AnyAuthor(_))
    }
}

/// One row of the descriptor table.
#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    /// The field this row describes.
    pub field: FilterField,
    /// Column the constraint is checked against.
    pub accessor: Accessor,
    /// Match rule.
    pub rule: MatchRule,
}

fn title(book: &Book) -> &str {
    &book.title
}

fn author(book: &Book) -> &str {
    &book.author
}

fn year(book: &Book) -> &str {
    &book.year
}

fn kind(book: &Book) -> &str {
    &book.kind
}

fn themes(book: &Book) -> &str {
    &book.themes
}

fn language(book: &Book) -> &str {
    &book.language
}

fn original(book: &Book) -> &str {
    &book.original
}

fn saga(book: &Book) -> &str {
    &book.saga
}

fn edited(book: &Book) -> &str {
    &book.edited
}

/// Descriptor rows, indexed by `FilterField as usize`.
pub const DESCRIPTORS: [FieldDescriptor; 11] = [
    FieldDescriptor {
        field: FilterField::Title,
        accessor: title,
        rule: MatchRule::Contains,
    },
    FieldDescriptor {
        field: FilterField::Author,
        accessor: author,
        rule: MatchRule::Contains,
    },
    FieldDescriptor {
        field: FilterField::Year,
        accessor: year,
        rule: MatchRule::RawContains,
    },
    FieldDescriptor {
        field: FilterField::Kind,
        accessor: kind,
        rule: MatchRule::Exact,
    },
    FieldDescriptor {
        field: FilterField::Themes,
        accessor: themes,
        rule: MatchRule::AllOf,
    },
    FieldDescriptor {
        field: FilterField::Language,
        accessor: language,
        rule: MatchRule::Exact,
    },
    FieldDescriptor {
        field: FilterField::Original,
        accessor: original,
        rule: MatchRule::Exact,
    },
    FieldDescriptor {
        field: FilterField::Saga,
        accessor: saga,
        rule: MatchRule::Contains,
    },
    FieldDescriptor {
        field: FilterField::Edited,
        accessor: edited,
        rule: MatchRule::Exact,
    },
    FieldDescriptor {
        field: FilterField::AuthorSex,
        accessor: author,
        rule: MatchRule::AnyAuthor(AuthorAttr::Sex),
    },
    FieldDescriptor {
        field: FilterField::AuthorCountry,
        accessor: author,
        rule: MatchRule::AnyAuthor(AuthorAttr::Country),
    },
];

/// Returns the descriptor row for `field`.
#[inline(always)]
pub fn descriptor(field: FilterField) -> &'static FieldDescriptor {
    &DESCRIPTORS[field as usize]
}

/// Column accessor for a sortable table column.
#[inline]
pub fn column_accessor(column: SortColumn) -> Accessor {
    match column {
        SortColumn::Title => title,
        SortColumn::Author => author,
        SortColumn::Year => year,
        SortColumn::Kind => kind,
    }
}
