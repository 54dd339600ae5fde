//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use thiserror::Error;

/// Keys shorter than this are accepted but logged as weak.
pub const MIN_KEY_LEN: usize = 16;

/// Validation errors for configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("server.name is required")]
    MissingServerName,
    #[error("server.sid must be exactly 3 characters, got {0}")]
    InvalidSid(usize),
    #[error("server.sid must match pattern [0-9][A-Z0-9][A-Z0-9], got '{0}'")]
    InvalidSidFormat(String),
    #[error("webserv.key is required")]
    MissingKey,
    #[error("webserv.nickname is required")]
    MissingNickname,
    #[error("webserv.nickname must not contain spaces or start with a digit, '-', '#' or ':', got '{0}'")]
    InvalidNickname(String),
    #[error("webserv.username is required")]
    MissingUsername,
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.name.is_empty() {
        errors.push(ValidationError::MissingServerName);
    }

    // SID validation (TS6 format)
    let sid = &config.server.sid;
    if sid.len() != 3 {
        errors.push(ValidationError::InvalidSid(sid.len()));
    } else {
        let chars: Vec<char> = sid.chars().collect();
        let valid = chars[0].is_ascii_digit()
            && (chars[1].is_ascii_uppercase() || chars[1].is_ascii_digit())
            && (chars[2].is_ascii_uppercase() || chars[2].is_ascii_digit());
        if !valid {
            errors.push(ValidationError::InvalidSidFormat(sid.clone()));
        }
    }

    if config.webserv.key.is_empty() {
        errors.push(ValidationError::MissingKey);
    }

    let nick = &config.webserv.nickname;
    if nick.is_empty() {
        errors.push(ValidationError::MissingNickname);
    } else if nick.contains(' ')
        || nick.starts_with(|c: char| c.is_ascii_digit() || matches!(c, '-' | '#' | ':'))
    {
        errors.push(ValidationError::InvalidNickname(nick.clone()));
    }

    if config.webserv.username.is_empty() {
        errors.push(ValidationError::MissingUsername);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Whether a key is short enough to warn about.
pub fn is_weak_key(key: &str) -> bool {
    key.len() < MIN_KEY_LEN
}
