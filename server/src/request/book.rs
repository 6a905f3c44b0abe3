use serde_json::Value;

use application::transfer::{
    BookDetailDto, CreateBookDto, DeleteBookDto, GetBookDto, GetRecordsByBookDto, UpdateBookDto,
};

use crate::controller::{Intake, TryIntake};
use crate::request::{FieldError, Fields, Pattern, Text};

/// Books of this genre must be stocked with at least this many copies.
const ACADEMIC_MINIMUM: u32 = 5;

#[derive(Debug)]
pub struct CreateBookRequest(Value);

impl CreateBookRequest {
    pub fn new(body: Value) -> Self {
        Self(body)
    }
}

#[derive(Debug)]
pub struct UpdateBookRequest {
    id: i64,
    body: Value,
}

impl UpdateBookRequest {
    pub fn new(id: i64, body: Value) -> Self {
        Self { id, body }
    }
}

#[derive(Debug)]
pub struct GetBookRequest {
    id: i64,
}

impl GetBookRequest {
    pub fn new(id: i64) -> Self {
        Self { id }
    }
}

#[derive(Debug)]
pub struct DeleteBookRequest {
    id: i64,
}

impl DeleteBookRequest {
    pub fn new(id: i64) -> Self {
        Self { id }
    }
}

#[derive(Debug)]
pub struct GetBookRecordsRequest {
    id: i64,
}

impl GetBookRecordsRequest {
    pub fn new(id: i64) -> Self {
        Self { id }
    }
}

pub struct BookTransformer;

/// Shared rules of create and update bodies. `copiesAvailable` is accepted
/// for compatibility but a new total always starts fully available.
fn book_fields(body: &Value) -> Result<(BookDetailDto, u32), Vec<FieldError>> {
    let mut fields = Fields::of(body)?;
    let title = fields.text("title", Text::required().trimmed().length(1, 100));
    let author = fields.text(
        "author",
        Text::required().trimmed().capitalized().length(2, 100),
    );
    let isbn = fields.text("isbn", Text::required().trimmed().pattern(Pattern::Isbn));
    let genre = fields.text("genre", Text::optional().trimmed().capitalized());
    let description = fields.text("description", Text::optional().trimmed().max_length(1000));
    let published_date = fields.past_date("publishedDate", true);
    let available = fields.count("copiesAvailable", false);
    let total = fields.count("totalCopies", false).or(available);

    match total {
        None if !fields.has_error("totalCopies") && !fields.has_error("copiesAvailable") => {
            fields.reject("totalCopies", "totalCopies is required");
        }
        Some(total) => {
            if available.is_some_and(|available| available != total) {
                fields.reject(
                    "copiesAvailable",
                    "copiesAvailable must equal totalCopies for a new stock level",
                );
            }
            if genre.as_deref() == Some("Academic") && total < ACADEMIC_MINIMUM {
                fields.reject(
                    "totalCopies",
                    format!("Academic books must have at least {ACADEMIC_MINIMUM} copies"),
                );
            }
        }
        None => {}
    }

    let errors = fields.into_errors();
    match (title, author, isbn, published_date, total) {
        (Some(title), Some(author), Some(isbn), Some(published_date), Some(total))
            if errors.is_empty() =>
        {
            Ok((
                BookDetailDto {
                    title,
                    author,
                    isbn,
                    genre: genre.filter(|genre| !genre.is_empty()),
                    description: description.filter(|description| !description.is_empty()),
                    published_date,
                },
                total,
            ))
        }
        _ => Err(errors),
    }
}

impl TryIntake<CreateBookRequest> for BookTransformer {
    type To = CreateBookDto;
    type Error = Vec<FieldError>;
    fn emit(&self, input: CreateBookRequest) -> Result<Self::To, Self::Error> {
        let (detail, total_copies) = book_fields(&input.0)?;
        Ok(CreateBookDto {
            detail,
            total_copies,
        })
    }
}

impl TryIntake<UpdateBookRequest> for BookTransformer {
    type To = UpdateBookDto;
    type Error = Vec<FieldError>;
    fn emit(&self, input: UpdateBookRequest) -> Result<Self::To, Self::Error> {
        let (detail, total_copies) = book_fields(&input.body)?;
        Ok(UpdateBookDto {
            id: input.id,
            detail,
            total_copies,
        })
    }
}

impl Intake<GetBookRequest> for BookTransformer {
    type To = GetBookDto;
    fn emit(&self, input: GetBookRequest) -> Self::To {
        GetBookDto { id: input.id }
    }
}

impl Intake<DeleteBookRequest> for BookTransformer {
    type To = DeleteBookDto;
    fn emit(&self, input: DeleteBookRequest) -> Self::To {
        DeleteBookDto { id: input.id }
    }
}

impl Intake<GetBookRecordsRequest> for BookTransformer {
    type To = GetRecordsByBookDto;
    fn emit(&self, input: GetBookRecordsRequest) -> Self::To {
        GetRecordsByBookDto { book_id: input.id }
    }
}
