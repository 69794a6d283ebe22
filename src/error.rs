//! platform-crypt Error Types
//!
//! 크레이트 전역 에러 타입 정의

use serde::Serialize;
use thiserror::Error;

/// platform-crypt 에러
#[derive(Error, Debug)]
pub enum CryptError {
    /// OS 호출 실패 (`GetLastError()` 값 포함)
    #[error("{call} failed with OS error {code:#010x}")]
    Os { call: &'static str, code: u32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("Invalid UTF-16 string returned by {0}")]
    InvalidUtf16(&'static str),

    #[error("Invalid store location: {0}")]
    InvalidLocation(String),

    #[error("Test fixture not found: {0}")]
    FixtureNotFound(String),

    #[error("Empty input: {0}")]
    EmptyInput(&'static str),

    #[error("Buffer too large: {0} bytes")]
    BufferTooLarge(usize),

    #[error("Unexpected result: {0}")]
    Unexpected(String),
}

impl CryptError {
    /// 직전 Win32 호출의 `GetLastError()`로 에러 생성
    #[cfg(windows)]
    pub(crate) fn last_os_error(call: &'static str) -> Self {
        // SAFETY: 스레드 로컬 에러 코드 조회만 수행
        let code = unsafe { windows_sys::Win32::Foundation::GetLastError() };
        CryptError::Os { call, code }
    }

    /// 안정적인 에러 코드 문자열
    pub fn code(&self) -> &'static str {
        match self {
            CryptError::Os { .. } => "OS_ERROR",
            CryptError::Io(_) => "IO_ERROR",
            CryptError::InvalidBase64(_) => "INVALID_BASE64",
            CryptError::InvalidUtf16(_) => "INVALID_UTF16",
            CryptError::InvalidLocation(_) => "INVALID_LOCATION",
            CryptError::FixtureNotFound(_) => "FIXTURE_NOT_FOUND",
            CryptError::EmptyInput(_) => "EMPTY_INPUT",
            CryptError::BufferTooLarge(_) => "BUFFER_TOO_LARGE",
            CryptError::Unexpected(_) => "UNEXPECTED",
        }
    }
}

/// 로그/외부 출력용 직렬화 가능한 에러
#[derive(Debug, Serialize)]
pub struct ErrorReport {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
}

impl From<CryptError> for ErrorReport {
    fn from(error: CryptError) -> Self {
        let details = match &error {
            CryptError::Os { call, code } => Some(format!("{}: {:#010x}", call, code)),
            _ => None,
        };

        ErrorReport {
            code: error.code().to_string(),
            message: error.to_string(),
            details,
        }
    }
}

/// 크레이트 결과 타입
pub type CryptResult<T> = Result<T, CryptError>;
