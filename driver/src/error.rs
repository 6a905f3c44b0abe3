use error_stack::Report;
use kernel::KernelError;

#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("{table} has no entry with id {id}")]
    Missing { table: &'static str, id: i64 },
    #[error("{table} already has an entry with id {id}")]
    Duplicate { table: &'static str, id: i64 },
}

pub trait ConvertError: 'static + Sized {
    type Ok;
    fn convert_error(self) -> error_stack::Result<Self::Ok, KernelError>;
}

impl<T: 'static> ConvertError for Result<T, DriverError> {
    type Ok = T;
    fn convert_error(self) -> error_stack::Result<T, KernelError> {
        self.map_err(|error| match error {
            DriverError::Missing { .. } => Report::new(error).change_context(KernelError::NotFound),
            DriverError::Duplicate { .. } => {
                Report::new(error).change_context(KernelError::Conflict)
            }
        })
    }
}
