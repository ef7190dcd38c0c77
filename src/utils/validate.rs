use once_cell::sync::Lazy;
use regex::Regex;

/// 允许注册的校内邮箱域名
pub const ALLOWED_EMAIL_DOMAIN: &str = "office.kopo.ac.kr";

// 姓名：韩文音节或英文字母，不允许空格和数字
static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[가-힣a-zA-Z]+$").expect("Invalid name regex"));

// 邮箱本地部分：字母数字开头，内部允许 - _ . 但不能连续
static EMAIL_LOCAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9]([-_.]?[A-Za-z0-9])*$").expect("Invalid email local regex")
});

pub fn validate_name(name: &str) -> Result<(), &'static str> {
    // 姓名长度校验：2 <= x <= 30 字符
    let len = name.chars().count();
    if len < 2 || len > 30 {
        return Err("Name length must be between 2 and 30 characters");
    }
    if !NAME_RE.is_match(name) {
        return Err("Name must contain only Korean or English letters");
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    // 必须是校内邮箱
    let Some((local, domain)) = email.split_once('@') else {
        return Err("Email format is invalid");
    };
    if domain != ALLOWED_EMAIL_DOMAIN {
        return Err("Email must use the school domain office.kopo.ac.kr");
    }
    if local.is_empty() || !EMAIL_LOCAL_RE.is_match(local) {
        return Err("Email format is invalid");
    }
    Ok(())
}

/// 密码策略验证结果
#[derive(Debug, Clone)]
pub struct PasswordValidationResult {
    pub is_valid: bool,
    pub errors: Vec<&'static str>,
}

impl PasswordValidationResult {
    pub fn error_message(&self) -> String {
        self.errors.join("; ")
    }
}

/// 验证密码是否符合安全策略
///
/// 策略要求：
/// - 长度：8 到 20 字符
/// - 只允许字母和数字
/// - 必须包含：大写字母 + 小写字母 + 数字
pub fn validate_password(password: &str) -> PasswordValidationResult {
    let mut errors = Vec::new();

    // 1. 长度检查
    if password.len() < 8 || password.len() > 20 {
        errors.push("Password length must be between 8 and 20 characters");
    }

    // 2. 字符集检查：只允许字母和数字
    if !password.chars().all(|c| c.is_ascii_alphanumeric()) {
        errors.push("Password must contain only letters and digits");
    }

    // 3. 大写字母检查
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.push("Password must contain at least one uppercase letter");
    }

    // 4. 小写字母检查
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        errors.push("Password must contain at least one lowercase letter");
    }

    // 5. 数字检查
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("Password must contain at least one digit");
    }

    PasswordValidationResult {
        is_valid: errors.is_empty(),
        errors,
    }
}

/// 简化的密码验证（返回 Result）
pub fn validate_password_simple(password: &str) -> Result<(), String> {
    let result = validate_password(password);
    if result.is_valid {
        Ok(())
    } else {
        Err(result.error_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_password() {
        assert!(validate_password("SecurePass123").is_valid);
        assert!(validate_password("Abcdefg1").is_valid);
    }

    #[test]
    fn test_password_length_bounds() {
        assert!(!validate_password("Abc1").is_valid);
        assert!(!validate_password("Abcdefgh1234567890123").is_valid);
        assert!(validate_password("Abcdefgh123456789012").is_valid); // 正好 20
    }

    #[test]
    fn test_password_special_chars_rejected() {
        let result = validate_password("Secure@Pass1");
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Password must contain only letters and digits")
        );
    }

    #[test]
    fn test_password_missing_classes() {
        assert!(!validate_password("abcdefg1").is_valid); // 无大写
        assert!(!validate_password("ABCDEFG1").is_valid); // 无小写
        assert!(!validate_password("Abcdefgh").is_valid); // 无数字
    }

    #[test]
    fn test_valid_names() {
        assert!(validate_name("김철수").is_ok());
        assert!(validate_name("HongGildong").is_ok());
    }

    #[test]
    fn test_invalid_names() {
        assert!(validate_name("김 철수").is_err()); // 空格
        assert!(validate_name("kim123").is_err()); // 数字
        assert!(validate_name("김").is_err()); // 过短
    }

    #[test]
    fn test_valid_emails() {
        assert!(validate_email("student1@office.kopo.ac.kr").is_ok());
        assert!(validate_email("hong.gildong@office.kopo.ac.kr").is_ok());
        assert!(validate_email("a-b_c.d@office.kopo.ac.kr").is_ok());
    }

    #[test]
    fn test_invalid_emails() {
        assert!(validate_email("student1@gmail.com").is_err()); // 域名不对
        assert!(validate_email("@office.kopo.ac.kr").is_err()); // 无本地部分
        assert!(validate_email(".abc@office.kopo.ac.kr").is_err()); // 点开头
        assert!(validate_email("a..b@office.kopo.ac.kr").is_err()); // 连续分隔符
        assert!(validate_email("abc.@office.kopo.ac.kr").is_err()); // 点结尾
    }
}
