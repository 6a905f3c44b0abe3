use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::Value;

use application::service::{
    BorrowService, CreateUserService, DeleteUserService, GetBorrowRecordService, GetUserService,
    ReturnService, UpdateUserService,
};

use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;
use crate::request::{
    CreateUserRequest, DeleteUserRequest, GetUserRecordsRequest, GetUserRequest, LendingRequest,
    LendingTransformer, UpdateUserRequest, UserTransformer,
};
use crate::response::{Created, LendingPresenter, Message, RecordPresenter, Success, UserPresenter};

pub trait UserRouter {
    fn route_user(self) -> Self;
}

impl UserRouter for Router<AppModule> {
    fn route_user(self) -> Self {
        self.route(
            "/users",
            get(|State(module): State<AppModule>| async move {
                Controller::new((), UserPresenter)
                    .bypass(|| async move { module.memory().get_all_users().await })
                    .await
                    .map(Success::new)
                    .map_err(ErrorStatus::from)
            })
            .post(
                |State(module): State<AppModule>, Json(body): Json<Value>| async move {
                    Controller::new(UserTransformer, UserPresenter)
                        .try_intake(CreateUserRequest::new(body))
                        .map_err(ErrorStatus::from)?
                        .handle(|dto| async move { module.memory().create_user(dto).await })
                        .await
                        .map(Created::new)
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/users/:id",
            get(
                |State(module): State<AppModule>, Path(id): Path<i64>| async move {
                    Controller::new(UserTransformer, UserPresenter)
                        .intake(GetUserRequest::new(id))
                        .handle(|dto| async move { module.memory().get_user(dto).await })
                        .await
                        .map_err(ErrorStatus::from)?
                        .map(Success::new)
                        .ok_or_else(|| ErrorStatus::not_found(format!("User with ID {id} not found")))
                },
            )
            .put(
                |State(module): State<AppModule>,
                 Path(id): Path<i64>,
                 Json(body): Json<Value>| async move {
                    Controller::new(UserTransformer, UserPresenter)
                        .try_intake(UpdateUserRequest::new(id, body))
                        .map_err(ErrorStatus::from)?
                        .handle(|dto| async move { module.memory().update_user(dto).await })
                        .await
                        .map(Success::new)
                        .map_err(ErrorStatus::from)
                },
            )
            .delete(
                |State(module): State<AppModule>, Path(id): Path<i64>| async move {
                    Controller::new(UserTransformer, UserPresenter)
                        .intake(DeleteUserRequest::new(id))
                        .handle(|dto| async move { module.memory().delete_user(dto).await })
                        .await
                        .map(|()| Message::new(format!("User with ID {id} deleted successfully")))
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/users/:id/records",
            get(
                |State(module): State<AppModule>, Path(id): Path<i64>| async move {
                    Controller::new(UserTransformer, RecordPresenter)
                        .intake(GetUserRecordsRequest::new(id))
                        .handle(|dto| async move { module.memory().get_records_by_user(dto).await })
                        .await
                        .map_err(ErrorStatus::from)?
                        .map(Success::new)
                        .ok_or_else(|| ErrorStatus::not_found(format!("User with ID {id} not found")))
                },
            ),
        )
        .route(
            "/users/:id/borrow",
            post(
                |State(module): State<AppModule>,
                 Path(id): Path<i64>,
                 Json(body): Json<Value>| async move {
                    Controller::new(LendingTransformer, LendingPresenter)
                        .try_intake(LendingRequest::new(id, body))
                        .map_err(ErrorStatus::from)?
                        .handle(|dto| async move { module.memory().borrow_book(dto).await })
                        .await
                        .map(Success::new)
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/users/:id/return",
            post(
                |State(module): State<AppModule>,
                 Path(id): Path<i64>,
                 Json(body): Json<Value>| async move {
                    Controller::new(LendingTransformer, LendingPresenter)
                        .try_intake(LendingRequest::new(id, body))
                        .map_err(ErrorStatus::from)?
                        .handle(|dto| async move { module.memory().return_book(dto).await })
                        .await
                        .map(Success::new)
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
