//! 인증서 컨텍스트 (`PCCERT_CONTEXT`) 소유 래퍼

use std::marker::PhantomData;
use std::ptr;

use windows_sys::Win32::Security::Cryptography::{
    CertDuplicateCertificateContext, CertFreeCertificateContext, CertGetNameStringW,
    CERT_CONTEXT, CERT_NAME_SIMPLE_DISPLAY_TYPE,
};

use crate::error::{CryptError, CryptResult};
use crate::wide::from_wide_ptr;

/// 참조 카운트 1개를 소유하는 인증서 컨텍스트
///
/// drop 시 `CertFreeCertificateContext`로 반환합니다.
/// `'s`는 컨텍스트가 속한 저장소의 수명입니다. 저장소는 강제 닫기
/// (`CERT_CLOSE_STORE_FORCE_FLAG`)로 닫히므로 컨텍스트가 먼저 drop 되어야 합니다.
#[derive(Debug)]
pub struct CertContext<'s> {
    raw: *const CERT_CONTEXT,
    _store: PhantomData<&'s ()>,
}

impl CertContext<'_> {
    /// # Safety
    /// `raw`는 null이 아니어야 하며, 호출자는 참조 1개의 소유권을 넘깁니다.
    /// 컨텍스트의 저장소는 `'s` 동안 강제로 닫히지 않아야 합니다.
    pub(crate) unsafe fn from_raw(raw: *const CERT_CONTEXT) -> Self {
        Self {
            raw,
            _store: PhantomData,
        }
    }

    pub(crate) fn as_ptr(&self) -> *const CERT_CONTEXT {
        self.raw
    }

    /// 소유권을 포기하고 원시 포인터 반환 (해제 책임은 호출자)
    pub(crate) fn into_raw(self) -> *const CERT_CONTEXT {
        let raw = self.raw;
        std::mem::forget(self);
        raw
    }

    fn context(&self) -> &CERT_CONTEXT {
        // SAFETY: 생성 시 null이 아님을 보장, 참조를 소유하는 동안 유효
        unsafe { &*self.raw }
    }

    /// 인증서/메시지 인코딩 타입 (`X509_ASN_ENCODING` 등)
    pub fn encoding_type(&self) -> u32 {
        self.context().dwCertEncodingType
    }

    /// DER 인코딩된 인증서 바이트
    pub fn encoded(&self) -> &[u8] {
        let raw = self.context();
        if raw.pbCertEncoded.is_null() {
            return &[];
        }
        // SAFETY: CERT_CONTEXT가 유효한 동안 pbCertEncoded/cbCertEncoded는 유효
        unsafe { std::slice::from_raw_parts(raw.pbCertEncoded, raw.cbCertEncoded as usize) }
    }

    /// Subject 표시 이름 (`CERT_NAME_SIMPLE_DISPLAY_TYPE`)
    pub fn subject(&self) -> CryptResult<String> {
        // SAFETY: 길이 조회 (NUL 포함 문자 수 반환)
        let len = unsafe {
            CertGetNameStringW(
                self.raw,
                CERT_NAME_SIMPLE_DISPLAY_TYPE,
                0,
                ptr::null(),
                ptr::null_mut(),
                0,
            )
        };
        if len <= 1 {
            return Ok(String::new());
        }

        let mut buf = vec![0u16; len as usize];
        // SAFETY: buf는 len 길이의 쓰기 가능한 버퍼
        let written = unsafe {
            CertGetNameStringW(
                self.raw,
                CERT_NAME_SIMPLE_DISPLAY_TYPE,
                0,
                ptr::null(),
                buf.as_mut_ptr(),
                len,
            )
        };
        if written == 0 {
            return Err(CryptError::Unexpected(
                "CertGetNameStringW returned no name".to_string(),
            ));
        }

        // SAFETY: OS가 NUL 종료 문자열을 기록
        unsafe { from_wide_ptr(buf.as_ptr(), "CertGetNameStringW") }
    }
}

impl Clone for CertContext<'_> {
    fn clone(&self) -> Self {
        // SAFETY: 참조 카운트 증가 후 동일 포인터 반환
        unsafe { Self::from_raw(CertDuplicateCertificateContext(self.raw)) }
    }
}

impl Drop for CertContext<'_> {
    fn drop(&mut self) {
        // SAFETY: 참조 1개를 소유하며 여기서 한 번만 반환
        unsafe {
            CertFreeCertificateContext(self.raw);
        }
    }
}
