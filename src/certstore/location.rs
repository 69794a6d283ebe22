//! 인증서 저장소 위치 (현재 사용자 / 로컬 머신)

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CryptError;

/// 시스템 인증서 저장소 범위
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StoreLocation {
    CurrentUser,
    LocalMachine,
}

impl StoreLocation {
    /// `CertOpenStore`의 `CERT_SYSTEM_STORE_*` 플래그
    pub const fn system_store_flag(self) -> u32 {
        match self {
            StoreLocation::CurrentUser => 0x0001_0000,
            StoreLocation::LocalMachine => 0x0002_0000,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            StoreLocation::CurrentUser => "CurrentUser",
            StoreLocation::LocalMachine => "LocalMachine",
        }
    }
}

impl fmt::Display for StoreLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 대소문자 구분 없이 `CurrentUser` / `LocalMachine`만 허용
///
/// 그 외 문자열은 `CryptError::InvalidLocation`으로 거부합니다.
/// 알 수 없는 값을 `CurrentUser`로 대체하지 않으므로, 인자가 뒤바뀐 호출
/// (예: 위치 자리에 저장소 이름 `"Temp"`)이 조용히 현재 사용자 범위로 열리지 않습니다.
impl FromStr for StoreLocation {
    type Err = CryptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("CurrentUser") {
            Ok(StoreLocation::CurrentUser)
        } else if s.eq_ignore_ascii_case("LocalMachine") {
            Ok(StoreLocation::LocalMachine)
        } else {
            Err(CryptError::InvalidLocation(s.to_string()))
        }
    }
}
