/*!
 * JWT 认证中间件
 *
 * 验证 Authorization 头中的 access token，并把由声明还原出的用户身份
 * 放入请求扩展。认证是无状态的：不回查数据库，不维护令牌黑名单。
 *
 * ## 使用方法
 *
 * ```rust,ignore
 * use actix_web::{web, App, HttpServer};
 * use crate::middlewares::require_jwt::RequireJWT;
 *
 * HttpServer::new(|| {
 *     App::new()
 *         .service(
 *             web::scope("/api")
 *                 .wrap(RequireJWT)  // 应用JWT验证中间件
 *                 .route("/protected", web::get().to(protected_handler))
 *         )
 * })
 * ```
 *
 * 处理程序中通过 `RequireJWT::extract_user(&req)` 获取身份。
 *
 * ## 认证流程
 *
 * 1. 客户端在请求头中包含 `Authorization: Bearer <JWT_TOKEN>`
 * 2. 中间件提取并验证 access token
 * 3. 令牌有效则将 AuthedUser 存入请求扩展，继续处理请求
 * 4. 令牌过期返回 401 + TokenExpired 错误码，其余无效情况返回 401 + Unauthorized
 */

use crate::models::auth::AuthedUser;
use crate::models::users::entities::UserRole;
use crate::models::ErrorCode;
use crate::utils::jwt::{JwtUtils, TokenError};
use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    http::header::CONTENT_TYPE,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::{debug, info};

use super::create_error_response;

const BEARER_PREFIX: &str = "Bearer ";
const AUTHORIZATION_HEADER: &str = "Authorization";

#[derive(Clone)]
pub struct RequireJWT;

// 辅助函数：从 Authorization 头提取并验证 access token
fn extract_and_validate_jwt(req: &ServiceRequest) -> Result<AuthedUser, (ErrorCode, String)> {
    let token = req
        .headers()
        .get(AUTHORIZATION_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .ok_or_else(|| {
            (
                ErrorCode::Unauthorized,
                "Missing or invalid Authorization header".to_string(),
            )
        })?;

    let claims = JwtUtils::verify_access_token(token).map_err(|err| match err {
        TokenError::Expired => (ErrorCode::TokenExpired, "Token has expired".to_string()),
        TokenError::Invalid => (ErrorCode::Unauthorized, "Invalid JWT token".to_string()),
    })?;

    let role = claims.role.parse::<UserRole>().map_err(|_| {
        (
            ErrorCode::Unauthorized,
            "Invalid role in JWT token".to_string(),
        )
    })?;

    Ok(AuthedUser {
        id: claims.sub,
        email: claims.email,
        role,
    })
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            // 处理 OPTIONS 请求
            if req.method() == actix_web::http::Method::OPTIONS {
                let response = HttpResponse::build(StatusCode::NO_CONTENT)
                    .insert_header((CONTENT_TYPE, "text/plain; charset=utf-8"))
                    .finish();
                return Ok(req.into_response(response.map_into_right_body()));
            }

            // 验证 JWT token
            match extract_and_validate_jwt(&req) {
                Ok(user) => {
                    debug!("JWT authentication successful for ID: {}", user.id);
                    req.extensions_mut().insert(user);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err((code, err)) => {
                    info!(
                        "JWT authentication failed for request to {}: {}",
                        req.path(),
                        err
                    );
                    Ok(req.into_response(
                        create_error_response(StatusCode::UNAUTHORIZED, code, &err)
                            .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

// 辅助函数：从请求中提取用户信息
impl RequireJWT {
    /// 从请求扩展中提取已认证用户
    /// 此函数应该在应用了RequireJWT中间件的路由处理程序中使用
    pub fn extract_user(req: &actix_web::HttpRequest) -> Option<AuthedUser> {
        req.extensions().get::<AuthedUser>().cloned()
    }
}
