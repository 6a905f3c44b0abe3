use kernel::interface::lock::DependOnAggregateLock;
use kernel::interface::query::{DependOnBookQuery, DependOnBorrowRecordQuery, DependOnUserQuery};
use kernel::interface::update::{
    DependOnBookModifier, DependOnBorrowRecordModifier, DependOnUserModifier,
};

pub use self::{book::*, borrow_record::*, lock::*, user::*};

mod book;
mod borrow_record;
mod lock;
mod table;
mod user;

/// Process-local stores for the three aggregates plus the lock registry that
/// serializes work on them.
#[derive(Default)]
pub struct MemoryDatabase {
    books: MemoryBookRepository,
    users: MemoryUserRepository,
    borrow_records: MemoryBorrowRecordRepository,
    locks: MemoryAggregateLock,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DependOnBookQuery for MemoryDatabase {
    type BookQuery = MemoryBookRepository;
    fn book_query(&self) -> &Self::BookQuery {
        &self.books
    }
}

impl DependOnBookModifier for MemoryDatabase {
    type BookModifier = MemoryBookRepository;
    fn book_modifier(&self) -> &Self::BookModifier {
        &self.books
    }
}

impl DependOnUserQuery for MemoryDatabase {
    type UserQuery = MemoryUserRepository;
    fn user_query(&self) -> &Self::UserQuery {
        &self.users
    }
}

impl DependOnUserModifier for MemoryDatabase {
    type UserModifier = MemoryUserRepository;
    fn user_modifier(&self) -> &Self::UserModifier {
        &self.users
    }
}

impl DependOnBorrowRecordQuery for MemoryDatabase {
    type BorrowRecordQuery = MemoryBorrowRecordRepository;
    fn borrow_record_query(&self) -> &Self::BorrowRecordQuery {
        &self.borrow_records
    }
}

impl DependOnBorrowRecordModifier for MemoryDatabase {
    type BorrowRecordModifier = MemoryBorrowRecordRepository;
    fn borrow_record_modifier(&self) -> &Self::BorrowRecordModifier {
        &self.borrow_records
    }
}

impl DependOnAggregateLock for MemoryDatabase {
    type AggregateLock = MemoryAggregateLock;
    fn aggregate_lock(&self) -> &Self::AggregateLock {
        &self.locks
    }
}
