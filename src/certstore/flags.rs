//! `CryptQueryObject` / `CertAddCertificateContextToStore` 관련 상수 타입

use std::ops::BitOr;

use serde::Serialize;

/// 기대하는 콘텐츠 종류 (`CERT_QUERY_CONTENT_FLAG_*`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueryContentFlags(u32);

impl QueryContentFlags {
    pub const CERT: Self = Self(1 << 1);
    pub const SERIALIZED_CERT: Self = Self(1 << 5);
    pub const PKCS7_SIGNED: Self = Self(1 << 8);
    pub const PFX: Self = Self(1 << 12);

    pub const fn bits(self) -> u32 {
        self.0
    }
}

impl BitOr for QueryContentFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// 허용하는 인코딩 형식 (`CERT_QUERY_FORMAT_FLAG_*`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueryFormatFlags(u32);

impl QueryFormatFlags {
    pub const BINARY: Self = Self(1 << 1);
    pub const BASE64_ENCODED: Self = Self(1 << 2);
    pub const ASN_ASCII_HEX_ENCODED: Self = Self(1 << 3);
    pub const ALL: Self =
        Self(Self::BINARY.0 | Self::BASE64_ENCODED.0 | Self::ASN_ASCII_HEX_ENCODED.0);

    pub const fn bits(self) -> u32 {
        self.0
    }
}

impl BitOr for QueryFormatFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// `CryptQueryObject`가 판별한 콘텐츠 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ContentType {
    Cert,
    Ctl,
    Crl,
    SerializedStore,
    SerializedCert,
    SerializedCtl,
    SerializedCrl,
    Pkcs7Signed,
    Pkcs7Unsigned,
    Pkcs7SignedEmbed,
    Pkcs10,
    Pfx,
    CertPair,
    Other(u32),
}

impl From<u32> for ContentType {
    fn from(raw: u32) -> Self {
        match raw {
            1 => ContentType::Cert,
            2 => ContentType::Ctl,
            3 => ContentType::Crl,
            4 => ContentType::SerializedStore,
            5 => ContentType::SerializedCert,
            6 => ContentType::SerializedCtl,
            7 => ContentType::SerializedCrl,
            8 => ContentType::Pkcs7Signed,
            9 => ContentType::Pkcs7Unsigned,
            10 => ContentType::Pkcs7SignedEmbed,
            11 => ContentType::Pkcs10,
            12 => ContentType::Pfx,
            13 => ContentType::CertPair,
            other => ContentType::Other(other),
        }
    }
}

/// `CryptQueryObject`가 판별한 인코딩 형식
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FormatType {
    Binary,
    Base64Encoded,
    AsnAsciiHexEncoded,
    Other(u32),
}

impl From<u32> for FormatType {
    fn from(raw: u32) -> Self {
        match raw {
            1 => FormatType::Binary,
            2 => FormatType::Base64Encoded,
            3 => FormatType::AsnAsciiHexEncoded,
            other => FormatType::Other(other),
        }
    }
}

/// 저장소 추가 시 기존 인증서 처리 방식 (`CERT_STORE_ADD_*`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AddDisposition {
    New,
    UseExisting,
    #[default]
    ReplaceExisting,
    Always,
    ReplaceExistingInheritProperties,
    Newer,
}

impl AddDisposition {
    pub const fn bits(self) -> u32 {
        match self {
            AddDisposition::New => 1,
            AddDisposition::UseExisting => 2,
            AddDisposition::ReplaceExisting => 3,
            AddDisposition::Always => 4,
            AddDisposition::ReplaceExistingInheritProperties => 5,
            AddDisposition::Newer => 6,
        }
    }
}
