use crate::{delivery::SignupPipeline, metrics::DeliveryMetrics};
use axum::extract::FromRef;
use derive_getters::Getters;
use duplicate::duplicate_item;
use std::sync::Arc;

#[derive(Clone, Getters)]
pub struct AppState {
    pipeline: Arc<SignupPipeline>,
    delivery_metrics: Arc<DeliveryMetrics>,
}

impl AppState {
    pub fn create(pipeline: SignupPipeline, delivery_metrics: DeliveryMetrics) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            delivery_metrics: Arc::new(delivery_metrics),
        }
    }
}

#[duplicate_item(
    service_type        field;
    [ SignupPipeline ]  [ pipeline ];
    [ DeliveryMetrics ] [ delivery_metrics ];
)]
impl FromRef<AppState> for Arc<service_type> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.field.clone()
    }
}
