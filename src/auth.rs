//! Typed boundary around the identity provider's account-action flows.
//!
//! The provider itself is an external collaborator; nothing here talks to
//! it. This module only gives the action-link dispatch, the error-code
//! translation and the login-attempt bookkeeping explicit types instead of
//! stringly-typed globals.

/// Failed logins allowed before a session is locked out.
pub const DEFAULT_LOCKOUT_THRESHOLD: u32 = 5;

/// An account action requested via the provider's emailed action link.
///
/// Parsed from the `mode` / `oobCode` query pair; anything that does not
/// name a known mode with a non-empty one-time code is `Invalid`, so
/// callers can match exhaustively without a catch-all error path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthAction {
    ResetPassword { oob_code: String },
    VerifyEmail { oob_code: String },
    RecoverEmail { oob_code: String },
    Invalid,
}

impl AuthAction {
    pub fn from_query(mode: Option<&str>, oob_code: Option<&str>) -> Self {
        let Some(code) = oob_code.filter(|c| !c.is_empty()) else {
            return AuthAction::Invalid;
        };
        match mode {
            Some("resetPassword") => AuthAction::ResetPassword {
                oob_code: code.to_string(),
            },
            Some("verifyEmail") => AuthAction::VerifyEmail {
                oob_code: code.to_string(),
            },
            Some("recoverEmail") => AuthAction::RecoverEmail {
                oob_code: code.to_string(),
            },
            _ => AuthAction::Invalid,
        }
    }

    pub fn oob_code(&self) -> Option<&str> {
        match self {
            AuthAction::ResetPassword { oob_code }
            | AuthAction::VerifyEmail { oob_code }
            | AuthAction::RecoverEmail { oob_code } => Some(oob_code),
            AuthAction::Invalid => None,
        }
    }
}

/// Translate a provider error code into the message shown to the user.
/// Unknown codes collapse to a generic message rather than leaking the
/// raw code.
pub fn provider_error_message(code: &str) -> &'static str {
    match code {
        "auth/email-already-in-use" => "Email is already in use.",
        "auth/invalid-email" => "Invalid email address.",
        "auth/user-not-found" => "No user found with this email.",
        "auth/wrong-password" => "Incorrect password.",
        "auth/invalid-credential" => {
            "The credentials provided are invalid. Please check your email and password."
        }
        "auth/too-many-requests" => "Too many failed attempts. Please try again later.",
        "auth/account-exists-with-different-credential" => {
            "An account already exists with a different sign-in method. \
             Please link your Google account."
        }
        "auth/early-verify" => "Please verify your email address before logging in.",
        _ => "An unknown error occurred.",
    }
}

/// Per-session failed-login counter with a lockout threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoginAttempts {
    failures: u32,
    threshold: u32,
}

impl Default for LoginAttempts {
    fn default() -> Self {
        Self::new(DEFAULT_LOCKOUT_THRESHOLD)
    }
}

impl LoginAttempts {
    pub fn new(threshold: u32) -> Self {
        Self {
            failures: 0,
            threshold,
        }
    }

    /// Record a failed login; returns whether the session is now locked.
    pub fn record_failure(&mut self) -> bool {
        self.failures = self.failures.saturating_add(1);
        self.is_locked()
    }

    /// A successful login clears the counter.
    pub fn record_success(&mut self) {
        self.failures = 0;
    }

    pub fn is_locked(&self) -> bool {
        self.failures >= self.threshold
    }

    pub fn remaining(&self) -> u32 {
        self.threshold.saturating_sub(self.failures)
    }
}
