use once_cell::sync::Lazy;
use regex::Regex;

static STUDENT_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{1,32}$").expect("Invalid student code regex"));

static FILE_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://\S+$").expect("Invalid file url regex"));

/// 科目满分必须是正整数
pub fn validate_max_score(max_score: f64) -> Result<(), &'static str> {
    if !max_score.is_finite() || max_score <= 0.0 {
        return Err("max_score must be a positive number");
    }
    if max_score.fract() != 0.0 {
        return Err("max_score must be a whole number");
    }
    Ok(())
}

pub fn validate_student_code(code: &str) -> Result<(), &'static str> {
    // 学号只能包含字母、数字、下划线或连字符，长度 1..=32
    if !STUDENT_CODE_RE.is_match(code) {
        return Err("student_code must be 1-32 letters, numbers, underscores or hyphens");
    }
    Ok(())
}

/// 文件地址由外部存储生成，只接受 http(s) 链接
pub fn validate_file_url(url: &str) -> Result<(), &'static str> {
    if !FILE_URL_RE.is_match(url) {
        return Err("file_url must be an http(s) URL");
    }
    Ok(())
}

pub fn validate_required(value: &str, message: &'static str) -> Result<(), &'static str> {
    if value.trim().is_empty() {
        return Err(message);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_score() {
        assert!(validate_max_score(100.0).is_ok());
        assert!(validate_max_score(0.0).is_err());
        assert!(validate_max_score(-5.0).is_err());
        assert!(validate_max_score(99.5).is_err());
        assert!(validate_max_score(f64::NAN).is_err());
    }

    #[test]
    fn test_student_code() {
        assert!(validate_student_code("S-2024_01").is_ok());
        assert!(validate_student_code("").is_err());
        assert!(validate_student_code("has space").is_err());
    }

    #[test]
    fn test_file_url() {
        assert!(validate_file_url("https://drive.example/file/abc").is_ok());
        assert!(validate_file_url("ftp://nope").is_err());
        assert!(validate_file_url("https://with space").is_err());
    }
}
