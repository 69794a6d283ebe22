//! `CryptQueryObject`로 메모리 버퍼의 인증서 판별

use std::ffi::c_void;
use std::ptr;

use serde::Serialize;
use windows_sys::Win32::Security::Cryptography::{
    CertFreeCRLContext, CertFreeCTLContext, CryptMsgClose, CryptQueryObject, CERT_CONTEXT,
    CERT_QUERY_OBJECT_BLOB, CRL_CONTEXT, CRYPT_INTEGER_BLOB, CTL_CONTEXT, HCERTSTORE,
};

use crate::certstore::context::CertContext;
use crate::certstore::flags::{ContentType, FormatType, QueryContentFlags, QueryFormatFlags};
use crate::certstore::store::CertStore;
use crate::error::{CryptError, CryptResult};

/// `CryptQueryObject` 결과
#[derive(Debug)]
pub struct CertQuery {
    pub encoding_type: u32,
    pub content_type: ContentType,
    pub format_type: FormatType,
    /// 인증서 콘텐츠일 때의 컨텍스트
    pub context: Option<CertContext<'static>>,
    /// OS가 만든 임시 메모리 저장소 (강제 닫기 없음)
    pub store: Option<CertStore>,
}

/// 로그 출력용 요약
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertQuerySummary {
    pub encoding_type: u32,
    pub content_type: ContentType,
    pub format_type: FormatType,
    pub subject: Option<String>,
    pub encoded_len: Option<usize>,
}

impl CertQuery {
    pub fn summary(&self) -> CryptResult<CertQuerySummary> {
        let subject = self.context.as_ref().map(CertContext::subject).transpose()?;
        Ok(CertQuerySummary {
            encoding_type: self.encoding_type,
            content_type: self.content_type,
            format_type: self.format_type,
            subject,
            encoded_len: self.context.as_ref().map(|c| c.encoded().len()),
        })
    }

    /// 인증서 컨텍스트 꺼내기 (인증서가 아니면 에러)
    pub fn into_context(self) -> CryptResult<CertContext<'static>> {
        let content_type = self.content_type;
        self.context.ok_or_else(|| {
            CryptError::Unexpected(format!("query returned no certificate ({:?})", content_type))
        })
    }
}

/// 메모리 버퍼를 인증서 등으로 해석
pub fn query_object(
    buffer: &[u8],
    content_flags: QueryContentFlags,
    format_flags: QueryFormatFlags,
) -> CryptResult<CertQuery> {
    if buffer.is_empty() {
        return Err(CryptError::EmptyInput("certificate buffer"));
    }
    let len = u32::try_from(buffer.len()).map_err(|_| CryptError::BufferTooLarge(buffer.len()))?;
    let blob = CRYPT_INTEGER_BLOB {
        cbData: len,
        pbData: buffer.as_ptr() as *mut u8,
    };

    let mut encoding_type = 0u32;
    let mut content_type = 0u32;
    let mut format_type = 0u32;
    let mut store: HCERTSTORE = ptr::null_mut();
    let mut msg: *mut c_void = ptr::null_mut();
    let mut context: *mut c_void = ptr::null_mut();

    // SAFETY: blob은 호출 동안 유효한 버퍼를 가리키고, 출력은 아래에서 소유권 처리
    let ok = unsafe {
        CryptQueryObject(
            CERT_QUERY_OBJECT_BLOB,
            (&blob as *const CRYPT_INTEGER_BLOB).cast(),
            content_flags.bits(),
            format_flags.bits(),
            0,
            &mut encoding_type,
            &mut content_type,
            &mut format_type,
            &mut store,
            ptr::addr_of_mut!(msg).cast(),
            ptr::addr_of_mut!(context).cast(),
        )
    };
    if ok == 0 {
        return Err(CryptError::last_os_error("CryptQueryObject"));
    }

    if !msg.is_null() {
        // SAFETY: 사용하지 않는 메시지 핸들 즉시 해제
        unsafe {
            CryptMsgClose(msg);
        }
    }

    // SAFETY: 성공 시 store는 null이거나 소유권을 가진 열린 저장소
    let store = (!store.is_null()).then(|| unsafe { CertStore::from_raw(store, "(query)") });

    let content_type = ContentType::from(content_type);
    let context = if context.is_null() {
        None
    } else {
        // SAFETY: 콘텐츠 종류에 맞는 해제 함수로 소유권 처리
        unsafe {
            match content_type {
                ContentType::Cert | ContentType::SerializedCert => {
                    Some(CertContext::from_raw(context as *const CERT_CONTEXT))
                }
                ContentType::Crl | ContentType::SerializedCrl => {
                    CertFreeCRLContext(context as *const CRL_CONTEXT);
                    None
                }
                ContentType::Ctl | ContentType::SerializedCtl => {
                    CertFreeCTLContext(context as *const CTL_CONTEXT);
                    None
                }
                other => {
                    log::warn!("[CertStore] Unexpected context for content type {:?}", other);
                    None
                }
            }
        }
    };

    let query = CertQuery {
        encoding_type,
        content_type,
        format_type: FormatType::from(format_type),
        context,
        store,
    };

    if let Ok(summary) = query.summary() {
        if let Ok(json) = serde_json::to_string(&summary) {
            log::info!("[CertStore] Queried object: {}", json);
        }
    }

    Ok(query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_buffer_rejected() {
        let err = query_object(&[], QueryContentFlags::CERT, QueryFormatFlags::ALL).unwrap_err();
        assert!(matches!(err, CryptError::EmptyInput(_)));
    }

    #[test]
    fn test_garbage_buffer_fails() {
        let err = query_object(
            b"definitely not a certificate",
            QueryContentFlags::CERT,
            QueryFormatFlags::ALL,
        )
        .unwrap_err();
        assert!(matches!(err, CryptError::Os { call: "CryptQueryObject", .. }));
    }
}
