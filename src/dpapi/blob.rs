//! 보호된 blob 및 복호화 결과 타입

use std::fmt;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use zeroize::Zeroizing;

use crate::error::{CryptError, CryptResult};

/// `CryptProtectData`가 반환한 불투명 blob
///
/// 내부 포맷은 OS 소유이므로 바이트 그대로만 보관합니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectedBlob(Vec<u8>);

impl ProtectedBlob {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 텍스트 설정 파일 등에 보관하기 위한 Base64 인코딩
    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.0)
    }

    pub fn from_base64(encoded: &str) -> CryptResult<Self> {
        let encoded = encoded.trim();
        if encoded.is_empty() {
            return Err(CryptError::EmptyInput("protected blob"));
        }
        Ok(Self(BASE64.decode(encoded)?))
    }
}

impl From<Vec<u8>> for ProtectedBlob {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for ProtectedBlob {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// `CryptUnprotectData` 결과
///
/// 평문은 drop 시 zeroize 됩니다.
pub struct Unprotected {
    pub description: String,
    pub data: Zeroizing<Vec<u8>>,
}

// 평문은 Debug 출력에서 제외
impl fmt::Debug for Unprotected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unprotected")
            .field("description", &self.description)
            .field("data", &format_args!("<{} bytes>", self.data.len()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base64_roundtrip() {
        let blob = ProtectedBlob::from(vec![0x01, 0x00, 0x00, 0x00, 0xd0, 0x8c, 0x9d, 0xdf]);
        let encoded = blob.to_base64();
        assert_eq!(encoded, "AQAAANCMnd8=");
        assert_eq!(ProtectedBlob::from_base64(&format!(" {}\n", encoded)).unwrap(), blob);
    }

    #[test]
    fn test_empty_base64_rejected() {
        let err = ProtectedBlob::from_base64("  ").unwrap_err();
        assert!(matches!(err, CryptError::EmptyInput(_)));
    }

    #[test]
    fn test_debug_hides_plaintext() {
        let unprotected = Unprotected {
            description: "desc".to_string(),
            data: Zeroizing::new(b"secret".to_vec()),
        };
        let shown = format!("{:?}", unprotected);
        assert!(shown.contains("<6 bytes>"));
        assert!(!shown.contains("secret"));
    }

    #[test]
    fn test_invalid_base64_rejected() {
        let err = ProtectedBlob::from_base64("not base64!").unwrap_err();
        assert_eq!(err.code(), "INVALID_BASE64");
    }
}
