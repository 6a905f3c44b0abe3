use destructure::Destructure;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use vodca::{AsRefln, Fromln, References};

#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, Fromln, AsRefln)]
pub struct BookTitle(String);

impl BookTitle {
    pub fn new(title: impl Into<String>) -> Self {
        Self(title.into())
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, Fromln, AsRefln)]
pub struct BookAuthor(String);

impl BookAuthor {
    pub fn new(author: impl Into<String>) -> Self {
        Self(author.into())
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, Fromln, AsRefln)]
pub struct Isbn(String);

impl Isbn {
    pub fn new(isbn: impl Into<String>) -> Self {
        Self(isbn.into())
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, Fromln, AsRefln)]
pub struct BookGenre(String);

impl BookGenre {
    pub fn new(genre: impl Into<String>) -> Self {
        Self(genre.into())
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, Fromln, AsRefln)]
pub struct BookDescription(String);

impl BookDescription {
    pub fn new(description: impl Into<String>) -> Self {
        Self(description.into())
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize, Fromln, AsRefln)]
pub struct PublishedDate(#[serde(with = "time::serde::rfc3339")] OffsetDateTime);

impl PublishedDate {
    pub fn new(date: impl Into<OffsetDateTime>) -> Self {
        Self(date.into())
    }
}

/// Catalogue data of a book. None of it takes part in lending.
#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct BookDetail {
    title: BookTitle,
    author: BookAuthor,
    isbn: Isbn,
    genre: Option<BookGenre>,
    description: Option<BookDescription>,
    published_date: PublishedDate,
}

impl BookDetail {
    pub fn new(
        title: BookTitle,
        author: BookAuthor,
        isbn: Isbn,
        genre: Option<BookGenre>,
        description: Option<BookDescription>,
        published_date: PublishedDate,
    ) -> Self {
        Self {
            title,
            author,
            isbn,
            genre,
            description,
            published_date,
        }
    }
}
