mod book;
mod borrow_record;
mod user;

pub use self::{book::*, borrow_record::*, user::*};
