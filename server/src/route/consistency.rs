use axum::extract::State;
use axum::routing::get;
use axum::Router;

use application::service::ConsistencyService;

use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;
use crate::response::{ConsistencyPresenter, Success};

pub trait ConsistencyRouter {
    fn route_consistency(self) -> Self;
}

impl ConsistencyRouter for Router<AppModule> {
    /// Read-only audit of every book, user and open ledger entry. Findings
    /// are confirmed under the locks of the aggregates they name.
    fn route_consistency(self) -> Self {
        self.route(
            "/consistency",
            get(|State(module): State<AppModule>| async move {
                Controller::new((), ConsistencyPresenter)
                    .bypass(|| async move { module.memory().check_settled().await })
                    .await
                    .map(Success::new)
                    .map_err(ErrorStatus::from)
            }),
        )
    }
}
