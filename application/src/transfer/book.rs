use time::OffsetDateTime;

use kernel::prelude::entity::{Book, BookDetail, DestructBook, DestructBookDetail};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDto {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub genre: Option<String>,
    pub description: Option<String>,
    pub published_date: OffsetDateTime,
    pub total_copies: u32,
    pub copies_available: u32,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<Book> for BookDto {
    fn from(value: Book) -> Self {
        let DestructBook {
            id,
            detail,
            total_copies,
            copies_available,
            created_at,
            updated_at,
        } = value.into_destruct();
        let DestructBookDetail {
            title,
            author,
            isbn,
            genre,
            description,
            published_date,
        } = detail.into_destruct();
        Self {
            id: id.into(),
            title: title.into(),
            author: author.into(),
            isbn: isbn.into(),
            genre: genre.map(Into::into),
            description: description.map(Into::into),
            published_date: published_date.into(),
            total_copies: total_copies.into(),
            copies_available: copies_available.into(),
            created_at: created_at.into(),
            updated_at: updated_at.into(),
        }
    }
}

/// Descriptive fields shared by create and update requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDetailDto {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub genre: Option<String>,
    pub description: Option<String>,
    pub published_date: OffsetDateTime,
}

impl From<BookDetailDto> for BookDetail {
    fn from(value: BookDetailDto) -> Self {
        use kernel::prelude::entity::{
            BookAuthor, BookDescription, BookGenre, BookTitle, Isbn, PublishedDate,
        };
        BookDetail::new(
            BookTitle::new(value.title),
            BookAuthor::new(value.author),
            Isbn::new(value.isbn),
            value.genre.map(BookGenre::new),
            value.description.map(BookDescription::new),
            PublishedDate::new(value.published_date),
        )
    }
}

pub struct GetBookDto {
    pub id: i64,
}

pub struct CreateBookDto {
    pub detail: BookDetailDto,
    pub total_copies: u32,
}

pub struct UpdateBookDto {
    pub id: i64,
    pub detail: BookDetailDto,
    pub total_copies: u32,
}

pub struct DeleteBookDto {
    pub id: i64,
}
