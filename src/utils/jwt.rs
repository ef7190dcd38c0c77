use crate::config::AppConfig;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

// JWT Claims 结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,        // Subject (user ID)
    pub email: String,      // 用户邮箱
    pub role: String,       // 用户角色
    pub token_type: String, // token类型: "access" 或 "refresh"
    pub exp: usize,         // Expiration time (时间戳)
    pub iat: usize,         // Issued at (签发时间)
}

// Token 响应结构体
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// 令牌校验失败原因（401 时区分过期与无效）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    Expired,
    Invalid,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid,
        }
    }
}

pub struct JwtUtils;

impl JwtUtils {
    // 获取 JWT 密钥
    fn get_secret() -> String {
        AppConfig::get().jwt.secret.clone()
    }

    // 生成 Access Token
    pub fn generate_access_token(
        user_id: &str,
        role: &str,
        email: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let config = AppConfig::get();
        Self::generate_token_with_expiry(
            user_id,
            role,
            email,
            "access",
            chrono::Duration::minutes(config.jwt.access_token_expiry),
        )
    }

    // 生成 Refresh Token
    pub fn generate_refresh_token(
        user_id: &str,
        role: &str,
        email: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let config = AppConfig::get();
        Self::generate_token_with_expiry(
            user_id,
            role,
            email,
            "refresh",
            chrono::Duration::days(config.jwt.refresh_token_expiry),
        )
    }

    // 生成带自定义过期时间的 Token
    pub fn generate_token_with_expiry(
        user_id: &str,
        role: &str,
        email: &str,
        token_type: &str,
        expiry_duration: chrono::Duration,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = chrono::Utc::now();
        let expiration = now + expiry_duration;

        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            role: role.to_string(),
            token_type: token_type.to_string(),
            exp: expiration.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        let secret = Self::get_secret();
        let encoding_key = EncodingKey::from_secret(secret.as_ref());

        encode(&Header::default(), &claims, &encoding_key)
    }

    // 生成完整的 Token 响应（包含 access 和 refresh token）
    pub fn generate_token_pair(
        user_id: &str,
        role: &str,
        email: &str,
    ) -> Result<TokenPair, jsonwebtoken::errors::Error> {
        let access_token = Self::generate_access_token(user_id, role, email)?;
        let refresh_token = Self::generate_refresh_token(user_id, role, email)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    // 验证 JWT token
    pub fn verify_token(token: &str) -> Result<Claims, TokenError> {
        let secret = Self::get_secret();
        let decoding_key = DecodingKey::from_secret(secret.as_ref());
        let validation = Validation::default();

        decode::<Claims>(token, &decoding_key, &validation)
            .map(|token_data| token_data.claims)
            .map_err(TokenError::from)
    }

    // 验证 token 是否为指定类型
    pub fn verify_token_type(token: &str, expected_type: &str) -> Result<Claims, TokenError> {
        let claims = Self::verify_token(token)?;
        if claims.token_type != expected_type {
            return Err(TokenError::Invalid);
        }
        Ok(claims)
    }

    // 验证 Access Token
    pub fn verify_access_token(token: &str) -> Result<Claims, TokenError> {
        Self::verify_token_type(token, "access")
    }

    // 验证 Refresh Token
    pub fn verify_refresh_token(token: &str) -> Result<Claims, TokenError> {
        Self::verify_token_type(token, "refresh")
    }

    // 使用 Refresh Token 轮换出新的 token 对
    pub fn refresh_token_pair(refresh_token: &str) -> Result<TokenPair, TokenError> {
        let claims = Self::verify_refresh_token(refresh_token)?;
        Self::generate_token_pair(&claims.sub, &claims.role, &claims.email)
            .map_err(TokenError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_pair_roundtrip() {
        let pair = JwtUtils::generate_token_pair("u-1", "student", "s@office.kopo.ac.kr")
            .expect("token pair");

        let access = JwtUtils::verify_access_token(&pair.access_token).expect("access claims");
        assert_eq!(access.sub, "u-1");
        assert_eq!(access.role, "student");
        assert_eq!(access.email, "s@office.kopo.ac.kr");
        assert_eq!(access.token_type, "access");

        let refresh = JwtUtils::verify_refresh_token(&pair.refresh_token).expect("refresh claims");
        assert_eq!(refresh.token_type, "refresh");
    }

    #[test]
    fn test_token_type_confusion_rejected() {
        let pair = JwtUtils::generate_token_pair("u-1", "student", "s@office.kopo.ac.kr")
            .expect("token pair");

        assert_eq!(
            JwtUtils::verify_access_token(&pair.refresh_token).err(),
            Some(TokenError::Invalid)
        );
        assert_eq!(
            JwtUtils::verify_refresh_token(&pair.access_token).err(),
            Some(TokenError::Invalid)
        );
    }

    #[test]
    fn test_expired_token_classified() {
        let token = JwtUtils::generate_token_with_expiry(
            "u-1",
            "student",
            "s@office.kopo.ac.kr",
            "access",
            chrono::Duration::minutes(-5),
        )
        .expect("token");

        assert_eq!(
            JwtUtils::verify_token(&token).err(),
            Some(TokenError::Expired)
        );
    }

    #[test]
    fn test_tampered_token_rejected() {
        let token = JwtUtils::generate_access_token("u-1", "student", "s@office.kopo.ac.kr")
            .expect("token");

        let mut tampered = token.clone();
        let last = tampered.pop().unwrap();
        tampered.push(if last == 'A' { 'B' } else { 'A' });

        assert_eq!(
            JwtUtils::verify_token(&tampered).err(),
            Some(TokenError::Invalid)
        );
    }

    #[test]
    fn test_refresh_preserves_identity() {
        let pair = JwtUtils::generate_token_pair("u-42", "professor", "p@office.kopo.ac.kr")
            .expect("token pair");

        let rotated = JwtUtils::refresh_token_pair(&pair.refresh_token).expect("rotated pair");
        let claims = JwtUtils::verify_access_token(&rotated.access_token).expect("claims");
        assert_eq!(claims.sub, "u-42");
        assert_eq!(claims.role, "professor");
        assert_eq!(claims.email, "p@office.kopo.ac.kr");
    }

    #[test]
    fn test_access_token_rejected_as_refresh_source() {
        let pair = JwtUtils::generate_token_pair("u-1", "student", "s@office.kopo.ac.kr")
            .expect("token pair");

        assert_eq!(
            JwtUtils::refresh_token_pair(&pair.access_token).err(),
            Some(TokenError::Invalid)
        );
    }
}
