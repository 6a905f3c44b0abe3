use serde::Serialize;

use application::transfer::Violation;

use crate::controller::Exhaust;

#[derive(Debug, Serialize)]
pub struct ConsistencyResponse {
    consistent: bool,
    violations: Vec<String>,
}

pub struct ConsistencyPresenter;

impl Exhaust<Vec<Violation>> for ConsistencyPresenter {
    type To = ConsistencyResponse;
    fn emit(&self, input: Vec<Violation>) -> Self::To {
        ConsistencyResponse {
            consistent: input.is_empty(),
            violations: input.iter().map(ToString::to_string).collect(),
        }
    }
}
