use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;

use application::service::{
    CreateBookService, DeleteBookService, GetBookService, GetBorrowRecordService,
    UpdateBookService,
};

use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;
use crate::request::{
    BookTransformer, CreateBookRequest, DeleteBookRequest, GetBookRecordsRequest, GetBookRequest,
    UpdateBookRequest,
};
use crate::response::{BookPresenter, Created, Message, RecordPresenter, Success};

pub trait BookRouter {
    fn route_book(self) -> Self;
}

impl BookRouter for Router<AppModule> {
    fn route_book(self) -> Self {
        self.route(
            "/books",
            get(|State(module): State<AppModule>| async move {
                Controller::new((), BookPresenter)
                    .bypass(|| async move { module.memory().get_all_books().await })
                    .await
                    .map(Success::new)
                    .map_err(ErrorStatus::from)
            })
            .post(
                |State(module): State<AppModule>, Json(body): Json<Value>| async move {
                    Controller::new(BookTransformer, BookPresenter)
                        .try_intake(CreateBookRequest::new(body))
                        .map_err(ErrorStatus::from)?
                        .handle(|dto| async move { module.memory().create_book(dto).await })
                        .await
                        .map(Created::new)
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/books/:id",
            get(
                |State(module): State<AppModule>, Path(id): Path<i64>| async move {
                    Controller::new(BookTransformer, BookPresenter)
                        .intake(GetBookRequest::new(id))
                        .handle(|dto| async move { module.memory().get_book(dto).await })
                        .await
                        .map_err(ErrorStatus::from)?
                        .map(Success::new)
                        .ok_or_else(|| ErrorStatus::not_found(format!("Book with ID {id} not found")))
                },
            )
            .put(
                |State(module): State<AppModule>,
                 Path(id): Path<i64>,
                 Json(body): Json<Value>| async move {
                    Controller::new(BookTransformer, BookPresenter)
                        .try_intake(UpdateBookRequest::new(id, body))
                        .map_err(ErrorStatus::from)?
                        .handle(|dto| async move { module.memory().update_book(dto).await })
                        .await
                        .map(Success::new)
                        .map_err(ErrorStatus::from)
                },
            )
            .delete(
                |State(module): State<AppModule>, Path(id): Path<i64>| async move {
                    Controller::new(BookTransformer, BookPresenter)
                        .intake(DeleteBookRequest::new(id))
                        .handle(|dto| async move { module.memory().delete_book(dto).await })
                        .await
                        .map(|()| Message::new(format!("Book with ID {id} deleted successfully")))
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/books/:id/records",
            get(
                |State(module): State<AppModule>, Path(id): Path<i64>| async move {
                    Controller::new(BookTransformer, RecordPresenter)
                        .intake(GetBookRecordsRequest::new(id))
                        .handle(|dto| async move { module.memory().get_records_by_book(dto).await })
                        .await
                        .map_err(ErrorStatus::from)?
                        .map(Success::new)
                        .ok_or_else(|| ErrorStatus::not_found(format!("Book with ID {id} not found")))
                },
            ),
        )
    }
}
