use serde_json::Value;
use time::OffsetDateTime;

use application::transfer::{
    CreateUserDto, DeleteUserDto, GetRecordsByUserDto, GetUserDto, UpdateUserDto,
};

use crate::controller::{Intake, TryIntake};
use crate::request::{FieldError, Fields, Pattern, Text};

#[derive(Debug)]
pub struct CreateUserRequest(Value);

impl CreateUserRequest {
    pub fn new(body: Value) -> Self {
        Self(body)
    }
}

#[derive(Debug)]
pub struct UpdateUserRequest {
    id: i64,
    body: Value,
}

impl UpdateUserRequest {
    pub fn new(id: i64, body: Value) -> Self {
        Self { id, body }
    }
}

#[derive(Debug)]
pub struct GetUserRequest {
    id: i64,
}

impl GetUserRequest {
    pub fn new(id: i64) -> Self {
        Self { id }
    }
}

#[derive(Debug)]
pub struct DeleteUserRequest {
    id: i64,
}

impl DeleteUserRequest {
    pub fn new(id: i64) -> Self {
        Self { id }
    }
}

#[derive(Debug)]
pub struct GetUserRecordsRequest {
    id: i64,
}

impl GetUserRecordsRequest {
    pub fn new(id: i64) -> Self {
        Self { id }
    }
}

pub struct UserTransformer;

type Profile = (String, String, Option<OffsetDateTime>);

fn profile_fields(body: &Value) -> Result<Profile, Vec<FieldError>> {
    let mut fields = Fields::of(body)?;
    let name = fields.text(
        "name",
        Text::required().trimmed().capitalized().length(2, 100),
    );
    let email = fields.text("email", Text::required().trimmed().pattern(Pattern::Email));
    let membership_date = fields.past_date("membershipDate", false);

    let errors = fields.into_errors();
    match (name, email) {
        (Some(name), Some(email)) if errors.is_empty() => Ok((name, email, membership_date)),
        _ => Err(errors),
    }
}

impl TryIntake<CreateUserRequest> for UserTransformer {
    type To = CreateUserDto;
    type Error = Vec<FieldError>;
    fn emit(&self, input: CreateUserRequest) -> Result<Self::To, Self::Error> {
        let (name, email, membership_date) = profile_fields(&input.0)?;
        Ok(CreateUserDto {
            name,
            email,
            membership_date,
        })
    }
}

impl TryIntake<UpdateUserRequest> for UserTransformer {
    type To = UpdateUserDto;
    type Error = Vec<FieldError>;
    fn emit(&self, input: UpdateUserRequest) -> Result<Self::To, Self::Error> {
        let (name, email, membership_date) = profile_fields(&input.body)?;
        Ok(UpdateUserDto {
            id: input.id,
            name,
            email,
            membership_date,
        })
    }
}

impl Intake<GetUserRequest> for UserTransformer {
    type To = GetUserDto;
    fn emit(&self, input: GetUserRequest) -> Self::To {
        GetUserDto { id: input.id }
    }
}

impl Intake<DeleteUserRequest> for UserTransformer {
    type To = DeleteUserDto;
    fn emit(&self, input: DeleteUserRequest) -> Self::To {
        DeleteUserDto { id: input.id }
    }
}

impl Intake<GetUserRecordsRequest> for UserTransformer {
    type To = GetRecordsByUserDto;
    fn emit(&self, input: GetUserRecordsRequest) -> Self::To {
        GetRecordsByUserDto { user_id: input.id }
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;
    use time::macros::datetime;

    use crate::controller::TryIntake;
    use crate::request::{CreateUserRequest, UpdateUserRequest, UserTransformer};

    #[test]
    fn profile_is_normalized() {
        let body = json!({
            "name": "  jane smith",
            "email": "jane.smith@example.com ",
            "membershipDate": "2023-03-22",
        });
        let dto = UserTransformer
            .emit(UpdateUserRequest::new(2, body))
            .expect("valid user");
        assert_eq!(dto.id, 2);
        assert_eq!(dto.name, "Jane Smith");
        assert_eq!(dto.email, "jane.smith@example.com");
        assert_eq!(dto.membership_date, Some(datetime!(2023-03-22 00:00 UTC)));
    }

    #[test]
    fn membership_date_is_optional() {
        let body = json!({ "name": "John Doe", "email": "john.doe@example.com" });
        let dto = UserTransformer
            .emit(CreateUserRequest::new(body))
            .expect("valid user");
        assert_eq!(dto.membership_date, None);
    }

    #[test]
    fn invalid_profile_is_rejected() {
        let body = json!({ "name": "J", "email": "not-an-address" });
        let errors = UserTransformer
            .emit(CreateUserRequest::new(body))
            .err()
            .expect("invalid user");
        let fields = errors.iter().map(|error| error.field()).collect::<Vec<_>>();
        assert_eq!(fields, vec!["name", "email"]);
    }
}
