use serde_json::Value;

use application::transfer::LendingDto;

use crate::controller::TryIntake;
use crate::request::{FieldError, Fields};

/// Body of `POST /users/:id/borrow` and `POST /users/:id/return`.
#[derive(Debug)]
pub struct LendingRequest {
    user_id: i64,
    body: Value,
}

impl LendingRequest {
    pub fn new(user_id: i64, body: Value) -> Self {
        Self { user_id, body }
    }
}

pub struct LendingTransformer;

impl TryIntake<LendingRequest> for LendingTransformer {
    type To = LendingDto;
    type Error = Vec<FieldError>;
    fn emit(&self, input: LendingRequest) -> Result<Self::To, Self::Error> {
        let mut fields = Fields::of(&input.body)?;
        let book_id = fields.id("bookId");
        match book_id {
            Some(book_id) => Ok(LendingDto {
                user_id: input.user_id,
                book_id,
            }),
            None => Err(fields.into_errors()),
        }
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use crate::controller::TryIntake;
    use crate::request::{LendingRequest, LendingTransformer};

    #[test]
    fn book_id_is_required() {
        let dto = LendingTransformer
            .emit(LendingRequest::new(1, json!({ "bookId": "2" })))
            .expect("valid lending");
        assert_eq!(dto.user_id, 1);
        assert_eq!(dto.book_id, 2);

        for body in [json!({}), json!({ "bookId": -4 }), json!({ "bookId": "x" })] {
            let errors = LendingTransformer
                .emit(LendingRequest::new(1, body))
                .err()
                .expect("invalid lending");
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].field(), "bookId");
        }
    }
}
