use kernel::interface::query::BorrowRecordQuery;
use kernel::interface::update::{BorrowRecordModifier, BorrowRecordPatch};
use kernel::prelude::entity::{BookId, BorrowRecord, BorrowRecordId, UserId};
use kernel::KernelError;

use crate::database::memory::table::Table;
use crate::error::ConvertError;

pub struct MemoryBorrowRecordRepository {
    table: Table<BorrowRecordId, BorrowRecord>,
}

impl Default for MemoryBorrowRecordRepository {
    fn default() -> Self {
        Self {
            table: Table::new("borrow_records"),
        }
    }
}

#[async_trait::async_trait]
impl BorrowRecordQuery for MemoryBorrowRecordRepository {
    async fn find_by_id(
        &self,
        id: &BorrowRecordId,
    ) -> error_stack::Result<Option<BorrowRecord>, KernelError> {
        Ok(self.table.get(id))
    }

    async fn find_all(&self) -> error_stack::Result<Vec<BorrowRecord>, KernelError> {
        Ok(self.table.all())
    }

    async fn find_by_user_id(
        &self,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<BorrowRecord>, KernelError> {
        Ok(self.table.filter(|record| record.user_id() == user_id))
    }

    async fn find_by_book_id(
        &self,
        book_id: &BookId,
    ) -> error_stack::Result<Vec<BorrowRecord>, KernelError> {
        Ok(self.table.filter(|record| record.book_id() == book_id))
    }

    async fn find_open(
        &self,
        user_id: &UserId,
        book_id: &BookId,
    ) -> error_stack::Result<Option<BorrowRecord>, KernelError> {
        Ok(self.table.find(|record| {
            record.is_open() && record.user_id() == user_id && record.book_id() == book_id
        }))
    }
}

#[async_trait::async_trait]
impl BorrowRecordModifier for MemoryBorrowRecordRepository {
    async fn next_id(&self) -> error_stack::Result<BorrowRecordId, KernelError> {
        Ok(BorrowRecordId::new(self.table.next_id()))
    }

    async fn create(&self, record: &BorrowRecord) -> error_stack::Result<(), KernelError> {
        tracing::debug!(
            record_id = ?record.id(),
            user_id = ?record.user_id(),
            book_id = ?record.book_id(),
            "append borrow record"
        );
        self.table.insert(*record.id(), record.clone()).convert_error()
    }

    async fn update(
        &self,
        id: &BorrowRecordId,
        patch: BorrowRecordPatch,
    ) -> error_stack::Result<BorrowRecord, KernelError> {
        tracing::debug!(record_id = ?id, ?patch, "update borrow record");
        self.table
            .modify(id, |record| patch.merge(record))
            .convert_error()
    }
}

#[cfg(test)]
mod test {
    use time::macros::datetime;

    use kernel::interface::query::BorrowRecordQuery;
    use kernel::interface::update::{BorrowRecordModifier, BorrowRecordPatch};
    use kernel::prelude::entity::{
        BookId, BorrowRecord, BorrowStatus, BorrowedAt, DueDate, ReturnedAt, UserId,
    };
    use kernel::KernelError;

    use super::MemoryBorrowRecordRepository;

    #[tokio::test]
    async fn open_record_lookup_follows_status() -> error_stack::Result<(), KernelError> {
        let ledger = MemoryBorrowRecordRepository::default();
        let user_id = UserId::new(1);
        let book_id = BookId::new(2);
        let borrowed = BorrowedAt::new(datetime!(2024-04-01 12:00 UTC));

        let first = BorrowRecord::open(
            ledger.next_id().await?,
            user_id,
            book_id,
            borrowed,
            DueDate::after(&borrowed),
        );
        ledger.create(&first).await?;
        assert_eq!(ledger.find_open(&user_id, &book_id).await?, Some(first.clone()));
        assert!(ledger.find_open(&UserId::new(9), &book_id).await?.is_none());

        let returned = ReturnedAt::new(datetime!(2024-04-05 12:00 UTC));
        let closed = ledger
            .update(first.id(), BorrowRecordPatch::returned(returned))
            .await?;
        assert_eq!(closed.status(), &BorrowStatus::Returned);
        assert_eq!(closed.return_date(), &Some(returned));
        assert!(ledger.find_open(&user_id, &book_id).await?.is_none());

        let second = BorrowRecord::open(
            ledger.next_id().await?,
            user_id,
            book_id,
            borrowed,
            DueDate::after(&borrowed),
        );
        ledger.create(&second).await?;
        assert!(second.id() > first.id());
        assert_eq!(ledger.find_by_user_id(&user_id).await?.len(), 2);
        assert_eq!(ledger.find_by_book_id(&book_id).await?.len(), 2);
        assert_eq!(ledger.find_all().await?.len(), 2);
        Ok(())
    }
}
