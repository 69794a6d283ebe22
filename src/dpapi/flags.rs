//! DPAPI 플래그 및 프롬프트 설정

use std::ops::BitOr;

/// `CryptProtectData` / `CryptUnprotectData`의 `dwFlags`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ProtectFlags(u32);

impl ProtectFlags {
    pub const NONE: Self = Self(0);
    /// UI 표시 금지 (`CRYPTPROTECT_UI_FORBIDDEN`)
    pub const UI_FORBIDDEN: Self = Self(0x1);
    /// 머신 키로 보호 (`CRYPTPROTECT_LOCAL_MACHINE`)
    pub const LOCAL_MACHINE: Self = Self(0x4);
    /// 감사 로그 기록 (`CRYPTPROTECT_AUDIT`)
    pub const AUDIT: Self = Self(0x10);
    /// 복호화 시 보호 수준 재검증 (`CRYPTPROTECT_VERIFY_PROTECTION`)
    pub const VERIFY_PROTECTION: Self = Self(0x40);

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for ProtectFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// `CRYPTPROTECT_PROMPTSTRUCT::dwPromptFlags`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PromptFlags(u32);

impl PromptFlags {
    pub const NONE: Self = Self(0);
    pub const ON_UNPROTECT: Self = Self(0x1);
    pub const ON_PROTECT: Self = Self(0x2);

    pub const fn bits(self) -> u32 {
        self.0
    }
}

impl BitOr for PromptFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// 사용자 프롬프트 설정 (부모 창 없음)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prompt {
    pub flags: PromptFlags,
    pub text: Option<String>,
}

impl Prompt {
    pub fn new(flags: PromptFlags, text: impl Into<String>) -> Self {
        Self {
            flags,
            text: Some(text.into()),
        }
    }
}
