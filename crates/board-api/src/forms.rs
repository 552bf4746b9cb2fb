//! # Form Inputs
//!
//! Submitted form DTOs and their field constraints. String fields default
//! to empty when absent, so a missing field is reported as a validation
//! error instead of failing deserialization.
//!
//! [`FormInput`] is the closed union of every DTO the failure pipeline may
//! capture and echo back into a re-rendered form.

use board_core::{BindingResult, Validate};
use serde::{Deserialize, Serialize};

pub const TITLE_MAX_CHARS: usize = 100;

/// Board create/update form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

impl Validate for BoardForm {
    fn validate(&self, result: &mut BindingResult) {
        result.require_not_blank("title", &self.title, "제목은 필수입니다.");
        result.require_max_chars(
            "title",
            &self.title,
            TITLE_MAX_CHARS,
            "제목은 100자 이내여야 합니다.",
        );
        result.require_not_blank("content", &self.content, "내용은 필수입니다.");
    }
}

/// Sign-up form. The password is accepted but never serialized back out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinForm {
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing)]
    pub password: String,
    #[serde(default)]
    pub email: String,
}

impl Validate for JoinForm {
    fn validate(&self, result: &mut BindingResult) {
        result.require_not_blank("username", &self.username, "사용자명은 필수입니다.");
        result.require_not_blank("password", &self.password, "비밀번호는 필수입니다.");
        result.require_not_blank("email", &self.email, "이메일은 필수입니다.");
        if !self.email.trim().is_empty() && !self.email.contains('@') {
            result.reject("email", "이메일 형식이 올바르지 않습니다.");
        }
    }
}

/// Login form. The password is accepted but never serialized back out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing)]
    pub password: String,
}

impl LoginForm {
    /// A copy safe to echo into a page.
    pub fn without_password(&self) -> Self {
        Self {
            username: self.username.clone(),
            password: String::new(),
        }
    }
}

impl Validate for LoginForm {
    fn validate(&self, result: &mut BindingResult) {
        result.require_not_blank("username", &self.username, "사용자명은 필수입니다.");
        result.require_not_blank("password", &self.password, "비밀번호는 필수입니다.");
    }
}

/// Reply form. Not validated: the reply routes treat bad input as a soft
/// result and redirect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ReplyForm {
    #[serde(default, rename = "boardId")]
    pub board_id: String,
    #[serde(default)]
    pub comment: String,
}

/// Any form input the failure pipeline can carry back to a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FormInput {
    Board(BoardForm),
    Join(JoinForm),
    Login(LoginForm),
}

impl FormInput {
    pub fn as_board(&self) -> Option<&BoardForm> {
        match self {
            Self::Board(form) => Some(form),
            _ => None,
        }
    }
}

impl From<BoardForm> for FormInput {
    fn from(form: BoardForm) -> Self {
        Self::Board(form)
    }
}

impl From<JoinForm> for FormInput {
    fn from(form: JoinForm) -> Self {
        Self::Join(form)
    }
}

impl From<LoginForm> for FormInput {
    fn from(form: LoginForm) -> Self {
        Self::Login(form)
    }
}
