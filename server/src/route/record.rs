use axum::extract::{Path, State};
use axum::routing::get;
use axum::Router;

use application::service::GetBorrowRecordService;

use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;
use crate::request::{GetRecordRequest, RecordTransformer};
use crate::response::{RecordPresenter, Success};

pub trait RecordRouter {
    fn route_record(self) -> Self;
}

impl RecordRouter for Router<AppModule> {
    fn route_record(self) -> Self {
        self.route(
            "/records",
            get(|State(module): State<AppModule>| async move {
                Controller::new((), RecordPresenter)
                    .bypass(|| async move { module.memory().get_all_records().await })
                    .await
                    .map(Success::new)
                    .map_err(ErrorStatus::from)
            }),
        )
        .route(
            "/records/:id",
            get(
                |State(module): State<AppModule>, Path(id): Path<i64>| async move {
                    Controller::new(RecordTransformer, RecordPresenter)
                        .intake(GetRecordRequest::new(id))
                        .handle(|dto| async move { module.memory().get_record(dto).await })
                        .await
                        .map_err(ErrorStatus::from)?
                        .map(Success::new)
                        .ok_or_else(|| {
                            ErrorStatus::not_found(format!("Borrow record with ID {id} not found"))
                        })
                },
            ),
        )
    }
}
