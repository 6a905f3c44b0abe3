mod book;
mod borrow_record;
mod invariant;
mod lending;
mod user;

pub use self::{book::*, borrow_record::*, invariant::*, lending::*, user::*};
