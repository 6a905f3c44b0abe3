mod book;
mod lending;
mod record;
mod user;
mod validate;

pub use self::{book::*, lending::*, record::*, user::*, validate::*};
