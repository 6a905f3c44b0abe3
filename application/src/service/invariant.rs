use std::collections::{BTreeMap, BTreeSet};

use kernel::interface::lock::{AggregateLock, DependOnAggregateLock, LockKey};
use kernel::interface::query::{
    BookQuery, BorrowRecordQuery, DependOnBookQuery, DependOnBorrowRecordQuery,
    DependOnUserQuery, UserQuery,
};
use kernel::prelude::entity::{Book, BookId, BorrowRecord, BorrowedBooks, UserId};
use kernel::KernelError;

use crate::transfer::Violation;

/// Cross-aggregate invariants between book counters, user loans and the
/// ledger. Reads only; callers that need a stable view hold the locks or use
/// [`check_settled`](ConsistencyService::check_settled).
#[async_trait::async_trait]
pub trait ConsistencyService:
    'static
    + Sync
    + Send
    + DependOnBookQuery
    + DependOnUserQuery
    + DependOnBorrowRecordQuery
    + DependOnAggregateLock
{
    async fn check_book(&self, book_id: &BookId) -> error_stack::Result<Vec<Violation>, KernelError> {
        let Some(book) = self.book_query().find_by_id(book_id).await? else {
            return Ok(Vec::new());
        };
        let records = self.borrow_record_query().find_by_book_id(book_id).await?;
        Ok(book_violations(&book, records.iter()))
    }

    async fn check_user(&self, user_id: &UserId) -> error_stack::Result<Vec<Violation>, KernelError> {
        let Some(user) = self.user_query().find_by_id(user_id).await? else {
            return Ok(Vec::new());
        };
        let records = self.borrow_record_query().find_by_user_id(user_id).await?;
        Ok(loan_violations(user_id, user.borrowed_books(), records.iter()))
    }

    async fn check_all(&self) -> error_stack::Result<Vec<Violation>, KernelError> {
        let books = self.book_query().find_all().await?;
        let users = self.user_query().find_all().await?;
        let records = self.borrow_record_query().find_all().await?;

        let mut violations = Vec::new();
        for book in &books {
            let held = records.iter().filter(|record| record.book_id() == book.id());
            violations.extend(book_violations(book, held));
        }
        let mut known = BTreeSet::new();
        for user in &users {
            known.insert(*user.id());
            let held = records.iter().filter(|record| record.user_id() == user.id());
            violations.extend(loan_violations(user.id(), user.borrowed_books(), held));
        }
        // open records of users that no longer exist
        let orphans = records
            .iter()
            .filter(|record| !known.contains(record.user_id()));
        let mut by_user: BTreeMap<UserId, Vec<&BorrowRecord>> = BTreeMap::new();
        for record in orphans {
            by_user.entry(*record.user_id()).or_default().push(record);
        }
        let nobody = BorrowedBooks::default();
        for (user_id, held) in by_user {
            violations.extend(loan_violations(&user_id, &nobody, held.into_iter()));
        }
        Ok(violations)
    }

    /// Runs [`check_all`](Self::check_all) without locks, then repeats it
    /// while holding the lock of every aggregate a finding names. Only
    /// findings that survive the second pass are reported, so a workflow
    /// caught halfway is never mistaken for drift.
    async fn check_settled(&self) -> error_stack::Result<Vec<Violation>, KernelError> {
        let suspects = self.check_all().await?;
        if suspects.is_empty() {
            return Ok(suspects);
        }
        let keys = suspects.iter().flat_map(involved).collect::<BTreeSet<_>>();
        let guards = self
            .aggregate_lock()
            .acquire_all(keys.iter().copied().collect())
            .await;
        let rechecked = self.check_all().await;
        drop(guards);

        let confirmed = rechecked?
            .into_iter()
            .filter(|violation| involved(violation).iter().all(|key| keys.contains(key)))
            .collect::<Vec<_>>();
        if confirmed.len() < suspects.len() {
            tracing::debug!(
                suspected = suspects.len(),
                confirmed = confirmed.len(),
                "transient violations dropped"
            );
        }
        Ok(confirmed)
    }

    /// Logs every violation around one user and one book. Used after each
    /// lending workflow in debug builds.
    async fn audit_lending(&self, user_id: &UserId, book_id: &BookId) {
        let checked = match self.check_book(book_id).await {
            Ok(mut found) => self.check_user(user_id).await.map(|user| {
                found.extend(user);
                found
            }),
            Err(report) => Err(report),
        };
        match checked {
            Ok(violations) => {
                for violation in violations {
                    tracing::error!(%violation, "lending invariant violated");
                }
            }
            Err(report) => {
                tracing::warn!(error = ?report, "lending invariant audit skipped");
            }
        }
    }
}

impl<T> ConsistencyService for T where
    T: DependOnBookQuery + DependOnUserQuery + DependOnBorrowRecordQuery + DependOnAggregateLock
{
}

/// Aggregates whose locks pin a violation in place.
fn involved(violation: &Violation) -> Vec<LockKey> {
    let book = |id: i64| LockKey::Book(BookId::new(id));
    let user = |id: i64| LockKey::User(UserId::new(id));
    match *violation {
        Violation::AvailabilityOutOfRange { book_id, .. }
        | Violation::AvailabilityMismatch { book_id, .. } => vec![book(book_id)],
        Violation::DuplicateOpenRecords {
            user_id, book_id, ..
        }
        | Violation::LoanWithoutRecord { user_id, book_id }
        | Violation::RecordWithoutLoan {
            user_id, book_id, ..
        } => vec![book(book_id), user(user_id)],
    }
}

fn book_violations<'a>(
    book: &Book,
    records: impl Iterator<Item = &'a BorrowRecord>,
) -> Vec<Violation> {
    let book_id = *book.id().as_ref();
    let total = *book.total_copies().as_ref();
    let available = *book.copies_available().as_ref();
    let open = records.filter(|record| record.is_open()).count();

    let mut violations = Vec::new();
    if available > total {
        violations.push(Violation::AvailabilityOutOfRange {
            book_id,
            total,
            available,
        });
    }
    let expected = i64::from(total) - open as i64;
    if expected != i64::from(available) {
        violations.push(Violation::AvailabilityMismatch {
            book_id,
            expected,
            actual: available,
        });
    }
    violations
}

fn loan_violations<'a>(
    user_id: &UserId,
    loans: &BorrowedBooks,
    records: impl Iterator<Item = &'a BorrowRecord>,
) -> Vec<Violation> {
    let mut open: BTreeMap<BookId, Vec<&BorrowRecord>> = BTreeMap::new();
    for record in records.filter(|record| record.is_open()) {
        open.entry(*record.book_id()).or_default().push(record);
    }

    let user = *user_id.as_ref();
    let mut violations = Vec::new();
    for (book_id, held) in &open {
        if held.len() > 1 {
            violations.push(Violation::DuplicateOpenRecords {
                user_id: user,
                book_id: *book_id.as_ref(),
                count: held.len(),
            });
        }
        if !loans.contains(book_id) {
            violations.extend(held.iter().map(|record| Violation::RecordWithoutLoan {
                record_id: *record.id().as_ref(),
                user_id: user,
                book_id: *book_id.as_ref(),
            }));
        }
    }
    for loan in loans.iter() {
        if !open.contains_key(loan.book_id()) {
            violations.push(Violation::LoanWithoutRecord {
                user_id: user,
                book_id: *loan.book_id().as_ref(),
            });
        }
    }
    violations
}

#[cfg(test)]
mod test {
    use std::sync::Arc;
    use std::time::Duration;

    use time::macros::datetime;

    use driver::database::MemoryDatabase;
    use kernel::interface::lock::{AggregateLock, DependOnAggregateLock, LockKey};
    use kernel::interface::update::{
        BookModifier, BookPatch, BorrowRecordModifier, DependOnBookModifier,
        DependOnBorrowRecordModifier, DependOnUserModifier, UserModifier,
    };
    use kernel::prelude::entity::{
        Book, BookAuthor, BookDetail, BookId, BookTitle, BorrowRecord, BorrowRecordId,
        BorrowedBooks, CopiesAvailable, CreatedAt, Isbn, Loan, PublishedDate, TotalCopies,
        UpdatedAt, User, UserEmail, UserId, UserName,
    };
    use kernel::KernelError;

    use crate::service::ConsistencyService;
    use crate::transfer::Violation;

    fn book(id: i64, total: u32, available: u32) -> Book {
        let now = datetime!(2024-01-01 00:00 UTC);
        Book::new(
            BookId::new(id),
            BookDetail::new(
                BookTitle::new("The Great Gatsby"),
                BookAuthor::new("F. Scott Fitzgerald"),
                Isbn::new("9780743273565"),
                None,
                None,
                PublishedDate::new(datetime!(1925-04-10 00:00 UTC)),
            ),
            TotalCopies::new(total),
            CopiesAvailable::new(available),
            CreatedAt::new(now),
            UpdatedAt::new(now),
        )
    }

    fn user(id: i64, loans: impl IntoIterator<Item = Loan>) -> User {
        let now = datetime!(2024-01-01 00:00 UTC);
        User::new(
            UserId::new(id),
            UserName::new("Jane Smith"),
            UserEmail::new("jane.smith@example.com"),
            None,
            BorrowedBooks::new(loans),
            CreatedAt::new(now),
            UpdatedAt::new(now),
        )
    }

    fn open_record(id: i64, loan: &Loan, user_id: i64) -> BorrowRecord {
        BorrowRecord::open(
            BorrowRecordId::new(id),
            UserId::new(user_id),
            *loan.book_id(),
            *loan.borrowed_on(),
            *loan.due_date(),
        )
    }

    #[tokio::test]
    async fn matching_aggregates_are_clean() -> error_stack::Result<(), KernelError> {
        let db = MemoryDatabase::new();
        let loan = Loan::starting(BookId::new(1), datetime!(2024-02-01 00:00 UTC));
        db.book_modifier().create(&book(1, 2, 1)).await?;
        db.user_modifier().create(&user(1, [loan.clone()])).await?;
        db.borrow_record_modifier()
            .create(&open_record(1, &loan, 1))
            .await?;

        assert!(db.check_all().await?.is_empty());
        assert!(db.check_book(&BookId::new(1)).await?.is_empty());
        assert!(db.check_user(&UserId::new(1)).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn drift_is_reported() -> error_stack::Result<(), KernelError> {
        let db = MemoryDatabase::new();
        let held = Loan::starting(BookId::new(1), datetime!(2024-02-01 00:00 UTC));
        let unrecorded = Loan::starting(BookId::new(2), datetime!(2024-02-01 00:00 UTC));
        db.book_modifier().create(&book(1, 1, 1)).await?;
        db.book_modifier().create(&book(2, 1, 3)).await?;
        db.user_modifier()
            .create(&user(1, [unrecorded.clone()]))
            .await?;
        db.borrow_record_modifier()
            .create(&open_record(1, &held, 1))
            .await?;
        db.borrow_record_modifier()
            .create(&open_record(2, &held, 1))
            .await?;

        let book_one = db.check_book(&BookId::new(1)).await?;
        assert_eq!(
            book_one,
            vec![Violation::AvailabilityMismatch {
                book_id: 1,
                expected: -1,
                actual: 1,
            }]
        );

        let book_two = db.check_book(&BookId::new(2)).await?;
        assert!(book_two.contains(&Violation::AvailabilityOutOfRange {
            book_id: 2,
            total: 1,
            available: 3,
        }));

        let user_one = db.check_user(&UserId::new(1)).await?;
        assert!(user_one.contains(&Violation::DuplicateOpenRecords {
            user_id: 1,
            book_id: 1,
            count: 2,
        }));
        assert!(user_one.contains(&Violation::RecordWithoutLoan {
            record_id: 2,
            user_id: 1,
            book_id: 1,
        }));
        assert!(user_one.contains(&Violation::LoanWithoutRecord {
            user_id: 1,
            book_id: 2,
        }));
        Ok(())
    }

    #[tokio::test]
    async fn records_of_unknown_users_are_reported() -> error_stack::Result<(), KernelError> {
        let db = MemoryDatabase::new();
        let loan = Loan::starting(BookId::new(1), datetime!(2024-02-01 00:00 UTC));
        db.book_modifier().create(&book(1, 1, 0)).await?;
        db.borrow_record_modifier()
            .create(&open_record(1, &loan, 7))
            .await?;

        let violations = db.check_all().await?;
        assert_eq!(
            violations,
            vec![Violation::RecordWithoutLoan {
                record_id: 1,
                user_id: 7,
                book_id: 1,
            }]
        );
        assert_eq!(db.check_settled().await?, violations);
        Ok(())
    }

    #[tokio::test]
    async fn settled_check_skips_writes_in_flight() -> error_stack::Result<(), KernelError> {
        let db = Arc::new(MemoryDatabase::new());
        let book_id = BookId::new(1);
        // a borrow that has reserved the copy but not yet written the ledger
        db.book_modifier().create(&book(1, 2, 1)).await?;
        let in_flight = db.aggregate_lock().acquire(LockKey::Book(book_id)).await;

        let audit = {
            let db = Arc::clone(&db);
            tokio::spawn(async move { (*db).check_settled().await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!audit.is_finished());

        // the workflow fails and puts the copy back
        db.book_modifier()
            .update(&book_id, BookPatch::copies_available(CopiesAvailable::new(2u32)))
            .await?;
        drop(in_flight);

        let violations = tokio::time::timeout(Duration::from_secs(1), audit)
            .await
            .expect("locks released")
            .expect("task completed")?;
        assert!(violations.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn settled_check_keeps_lasting_drift() -> error_stack::Result<(), KernelError> {
        let db = MemoryDatabase::new();
        db.book_modifier().create(&book(1, 2, 1)).await?;
        assert_eq!(
            db.check_settled().await?,
            vec![Violation::AvailabilityMismatch {
                book_id: 1,
                expected: 2,
                actual: 1,
            }]
        );
        Ok(())
    }
}
