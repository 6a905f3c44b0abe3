use crate::entity::{BookId, Loan};

/// Active loans of a user, at most one per book, kept in borrowing order.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct BorrowedBooks(Vec<Loan>);

impl BorrowedBooks {
    pub fn new(loans: impl IntoIterator<Item = Loan>) -> Self {
        let mut books = Self::default();
        for loan in loans {
            books.attach(loan);
        }
        books
    }

    pub fn get(&self, book_id: &BookId) -> Option<&Loan> {
        self.0.iter().find(|loan| loan.book_id() == book_id)
    }

    pub fn contains(&self, book_id: &BookId) -> bool {
        self.get(book_id).is_some()
    }

    /// Returns `false` and leaves the set untouched if the book is already on loan.
    pub fn attach(&mut self, loan: Loan) -> bool {
        if self.contains(loan.book_id()) {
            return false;
        }
        self.0.push(loan);
        true
    }

    pub fn detach(&mut self, book_id: &BookId) -> Option<Loan> {
        let index = self.0.iter().position(|loan| loan.book_id() == book_id)?;
        Some(self.0.remove(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Loan> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl IntoIterator for BorrowedBooks {
    type Item = Loan;
    type IntoIter = std::vec::IntoIter<Loan>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
