use crate::entity::{BorrowRecord, BorrowRecordId, BorrowStatus, ReturnedAt};
use crate::KernelError;

#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct BorrowRecordPatch {
    pub return_date: Option<ReturnedAt>,
    pub status: Option<BorrowStatus>,
}

impl BorrowRecordPatch {
    pub fn returned(at: ReturnedAt) -> Self {
        Self {
            return_date: Some(at),
            status: Some(BorrowStatus::Returned),
        }
    }

    pub fn merge(self, record: BorrowRecord) -> BorrowRecord {
        let mut record = record.into_destruct();
        if let Some(return_date) = self.return_date {
            record.return_date = Some(return_date);
        }
        if let Some(status) = self.status {
            record.status = status;
        }
        record.freeze()
    }
}

/// The ledger only grows: records are opened and later closed, never removed.
#[async_trait::async_trait]
pub trait BorrowRecordModifier: 'static + Sync + Send {
    async fn next_id(&self) -> error_stack::Result<BorrowRecordId, KernelError>;
    async fn create(&self, record: &BorrowRecord) -> error_stack::Result<(), KernelError>;
    async fn update(
        &self,
        id: &BorrowRecordId,
        patch: BorrowRecordPatch,
    ) -> error_stack::Result<BorrowRecord, KernelError>;
}

pub trait DependOnBorrowRecordModifier: 'static + Sync + Send {
    type BorrowRecordModifier: BorrowRecordModifier;
    fn borrow_record_modifier(&self) -> &Self::BorrowRecordModifier;
}
