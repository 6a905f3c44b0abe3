use application::transfer::GetRecordDto;

use crate::controller::Intake;

pub struct GetRecordRequest {
    id: i64,
}

impl GetRecordRequest {
    pub fn new(id: i64) -> Self {
        Self { id }
    }
}

pub struct RecordTransformer;

impl Intake<GetRecordRequest> for RecordTransformer {
    type To = GetRecordDto;
    fn emit(&self, input: GetRecordRequest) -> Self::To {
        GetRecordDto { id: input.id }
    }
}
