//! Endpoints reachable without signing in: the booking form, lead and
//! feedback forms, and freelancer revision updates.

use axum::{
    Json, Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::{get, post},
};
use db::models::{feedback::ClientFeedback, lead::Lead, project::Project};
use services::services::{
    booking::{BookingReceipt, BookingRequest, FeedbackSubmission, LeadSubmission},
    portal::PublicData,
    studio::RevisionUpdate,
};
use utils::response::ApiResponse;

use crate::{AppState, error::ApiError};

pub async fn booking_data(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<PublicData>>, ApiError> {
    let data = state.studio.public_data().await?;
    Ok(ResponseJson(ApiResponse::success(data)))
}

pub async fn book(
    State(state): State<AppState>,
    Json(request): Json<BookingRequest>,
) -> Result<ResponseJson<ApiResponse<BookingReceipt>>, ApiError> {
    let receipt = state.studio.book(request).await?;
    Ok(ResponseJson(ApiResponse::success(receipt)))
}

pub async fn submit_lead(
    State(state): State<AppState>,
    Json(submission): Json<LeadSubmission>,
) -> Result<ResponseJson<ApiResponse<Lead>>, ApiError> {
    let lead = state.studio.submit_lead(submission).await?;
    Ok(ResponseJson(ApiResponse::success(lead)))
}

pub async fn submit_feedback(
    State(state): State<AppState>,
    Json(submission): Json<FeedbackSubmission>,
) -> Result<ResponseJson<ApiResponse<ClientFeedback>>, ApiError> {
    let feedback = state.studio.submit_feedback(submission).await?;
    Ok(ResponseJson(ApiResponse::success(feedback)))
}

pub async fn update_revision(
    State(state): State<AppState>,
    Path((project_id, revision_id)): Path<(String, String)>,
    Json(update): Json<RevisionUpdate>,
) -> Result<ResponseJson<ApiResponse<Project>>, ApiError> {
    let project = state
        .studio
        .update_revision(&project_id, &revision_id, update)
        .await?;
    Ok(ResponseJson(ApiResponse::success(project)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/public/booking", get(booking_data).post(book))
        .route("/public/leads", post(submit_lead))
        .route("/public/feedback", post(submit_feedback))
        .route(
            "/public/projects/{project_id}/revisions/{revision_id}",
            post(update_revision),
        )
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use db::models::project::{Project, Revision};
    use serde_json::json;

    use crate::routes::test_support::{app, send};

    #[tokio::test]
    async fn lead_form_creates_a_discussion_lead() {
        let (_, router) = app().await;
        let (status, body) = send(
            &router,
            "POST",
            "/api/public/leads",
            None,
            Some(json!({ "name": "Dewi", "contactChannel": "website", "location": "Jakarta" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["data"]["status"], "discussion");
        assert!(!body["data"]["id"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn feedback_rating_out_of_range_is_rejected() {
        let (_, router) = app().await;
        let (status, body) = send(
            &router,
            "POST",
            "/api/public/feedback",
            None,
            Some(json!({ "clientName": "Dewi", "rating": 9, "feedback": "!" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn booking_form_data_is_public() {
        let (_, router) = app().await;
        let (status, body) = send(&router, "GET", "/api/public/booking", None, None).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert!(body["data"]["packages"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn revision_update_checks_the_freelancer() {
        let (state, router) = app().await;
        state
            .studio
            .projects
            .insert(Project {
                id: "PRJ-1".to_string(),
                revisions: vec![Revision {
                    id: "REV-1".to_string(),
                    freelancer_id: "TM-1".to_string(),
                    ..Default::default()
                }],
                ..Default::default()
            })
            .await
            .unwrap();

        let uri = "/api/public/projects/PRJ-1/revisions/REV-1";
        let (status, _) = send(
            &router,
            "POST",
            uri,
            None,
            Some(json!({ "freelancerId": "TM-2", "status": "completed" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send(
            &router,
            "POST",
            uri,
            None,
            Some(json!({ "freelancerId": "TM-1", "status": "completed", "driveLink": "https://drive/x" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        let revision = &body["data"]["revisions"][0];
        assert_eq!(revision["status"], "completed");
        assert!(revision["completedDate"].is_string());
    }
}
