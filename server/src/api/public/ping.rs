use axum::Json;
use ladle_core::MessageResponse;

#[utoipa::path(
    get,
    path = "/api/ping",
    tag = "health",
    responses(
        (status = 200, description = "Liveness check", body = MessageResponse)
    )
)]
pub async fn ping() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "pong".to_string(),
    })
}
