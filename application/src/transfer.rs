mod book;
mod borrow_record;
mod consistency;
mod lending;
mod user;

pub use self::{book::*, borrow_record::*, consistency::*, lending::*, user::*};
