use std::ops::Deref;
use std::sync::Arc;

use time::macros::datetime;
use vodca::References;

use application::service::{CreateBookService, CreateUserService};
use application::transfer::{BookDetailDto, CreateBookDto, CreateUserDto};
use driver::database::MemoryDatabase;
use kernel::KernelError;

use crate::config::Config;

#[derive(Clone)]
pub struct AppModule(Arc<Handler>);

impl AppModule {
    pub async fn new(config: &Config) -> error_stack::Result<Self, KernelError> {
        Ok(Self(Arc::new(Handler::init(config).await?)))
    }
}

impl Deref for AppModule {
    type Target = Handler;
    fn deref(&self) -> &Self::Target {
        Deref::deref(&self.0)
    }
}

#[derive(References)]
pub struct Handler {
    memory: MemoryDatabase,
}

impl Handler {
    pub async fn init(config: &Config) -> error_stack::Result<Self, KernelError> {
        let memory = MemoryDatabase::new();
        if config.seed_sample_data {
            seed(&memory).await?;
        }
        Ok(Self { memory })
    }
}

/// Two members and three fully stocked titles.
async fn seed(memory: &MemoryDatabase) -> error_stack::Result<(), KernelError> {
    let books = [
        (
            BookDetailDto {
                title: "JavaScript: The Good Parts".to_string(),
                author: "Douglas Crockford".to_string(),
                isbn: "9780596517748".to_string(),
                genre: Some("Programming".to_string()),
                description: Some(
                    "Reveals the good parts of JavaScript that you should use and the bad parts that you should avoid."
                        .to_string(),
                ),
                published_date: datetime!(2008-05-01 00:00 UTC),
            },
            10,
        ),
        (
            BookDetailDto {
                title: "Clean Code".to_string(),
                author: "Robert C. Martin".to_string(),
                isbn: "9780132350884".to_string(),
                genre: Some("Programming".to_string()),
                description: Some("A handbook of agile software craftsmanship.".to_string()),
                published_date: datetime!(2008-08-01 00:00 UTC),
            },
            10,
        ),
        (
            BookDetailDto {
                title: "Introduction to Algorithms".to_string(),
                author: "Thomas H. Cormen".to_string(),
                isbn: "9780262033848".to_string(),
                genre: Some("Academic".to_string()),
                description: Some("A comprehensive introduction to modern algorithms.".to_string()),
                published_date: datetime!(2009-07-31 00:00 UTC),
            },
            8,
        ),
    ];
    for (detail, total_copies) in books {
        memory
            .create_book(CreateBookDto {
                detail,
                total_copies,
            })
            .await?;
    }

    let users = [
        ("John Doe", "john.doe@example.com", datetime!(2023-01-15 00:00 UTC)),
        ("Jane Smith", "jane.smith@example.com", datetime!(2023-03-22 00:00 UTC)),
    ];
    for (name, email, membership_date) in users {
        memory
            .create_user(CreateUserDto {
                name: name.to_string(),
                email: email.to_string(),
                membership_date: Some(membership_date),
            })
            .await?;
    }
    tracing::info!("sample data loaded");
    Ok(())
}
