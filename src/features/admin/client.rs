//! Client wrappers for admin endpoints. All calls rely on the attached bearer
//! token of an operator whose access was checked by the admin guard.

use crate::{
    app_lib::{ApiClient, ApiError, path_segment},
    features::{
        admin::types::{BanUserRequest, UnbanUserRequest, UserEditInfoResponse, UserListResponse},
        auth::types::MessageResponse,
        users::types::UserId,
    },
};

pub async fn list_users(api: &ApiClient) -> Result<UserListResponse, ApiError> {
    api.get_json("/api/admin/user-list").await
}

pub async fn ban_user(
    api: &ApiClient,
    request: &BanUserRequest,
) -> Result<MessageResponse, ApiError> {
    api.patch_json("/api/admin/ban-user", request).await
}

pub async fn unban_user(
    api: &ApiClient,
    request: &UnbanUserRequest,
) -> Result<MessageResponse, ApiError> {
    api.patch_json("/api/admin/unban-user", request).await
}

pub async fn delete_user(api: &ApiClient, id: &UserId) -> Result<MessageResponse, ApiError> {
    api.delete_json(&format!("/api/admin/delete-user/{}", path_segment(id.as_str())))
        .await
}

pub async fn user_edit_info(
    api: &ApiClient,
    id: &UserId,
) -> Result<UserEditInfoResponse, ApiError> {
    api.get_json(&format!(
        "/api/admin/user-edit-info/{}",
        path_segment(id.as_str())
    ))
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_lib::AppConfig;
    use serde_json::json;
    use std::net::TcpListener;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    #[tokio::test]
    async fn user_ids_are_sent_as_single_path_segments() -> Result<(), ApiError> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/admin/delete-user/a%20b%2Fc"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"success": true, "message": "User deleted"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let api = ApiClient::new(&AppConfig::new(&server.uri())?)?;
        let response = delete_user(&api, &UserId::from("a b/c")).await?;

        assert!(response.success);
        assert_eq!(response.message, "User deleted");
        Ok(())
    }
}
