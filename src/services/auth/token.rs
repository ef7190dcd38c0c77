use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::middlewares::require_jwt::RequireJWT;
use crate::models::auth::requests::RefreshTokenRequest;
use crate::models::auth::responses::{RefreshTokenResponse, UserInfoResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::jwt::{JwtUtils, TokenError};

use super::AuthService;

pub async fn handle_refresh_token(
    service: &AuthService,
    refresh_request: RefreshTokenRequest,
) -> ActixResult<HttpResponse> {
    let config = service.get_config();

    // 验证 refresh token 并轮换出新的 token 对
    match JwtUtils::refresh_token_pair(&refresh_request.refresh_token) {
        Ok(token_pair) => {
            let response = RefreshTokenResponse {
                access_token: token_pair.access_token,
                refresh_token: token_pair.refresh_token,
                expires_in: config.jwt.access_token_expiry * 60, // 转换为秒
            };
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                response,
                "Token refreshed successfully",
            )))
        }
        Err(TokenError::Expired) => Ok(HttpResponse::Unauthorized().json(
            ApiResponse::error_empty(ErrorCode::TokenExpired, "Refresh token has expired"),
        )),
        Err(TokenError::Invalid) => Ok(HttpResponse::Unauthorized().json(
            ApiResponse::error_empty(ErrorCode::Unauthorized, "Invalid refresh token"),
        )),
    }
}

pub async fn handle_get_me(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let Some(authed) = RequireJWT::extract_user(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Authentication required",
        )));
    };

    match storage.get_user_by_id(&authed.id).await {
        Ok(Some(user)) => Ok(
            HttpResponse::Ok().json(ApiResponse::success(UserInfoResponse { user }, "获取成功"))
        ),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "User not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("查询用户失败: {e}"),
            )),
        ),
    }
}

pub async fn handle_logout(
    _service: &AuthService,
    _request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    // 无状态认证：服务端没有会话可清除，客户端丢弃令牌即完成登出
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Logged out")))
}
