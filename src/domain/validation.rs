use crate::domain::error::DomainError;
use once_cell::sync::Lazy;
use regex::Regex;

pub const MIN_USERNAME_LEN: usize = 6;
pub const MIN_PASSWORD_LEN: usize = 8;
pub const PASSWORD_SPECIAL_CHARS: &[char] = &['!', '@', '#', '$', '%', '^', '&', '*'];

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[a-z0-9_'+\-.]*[a-z0-9_+\-]@([a-z0-9][a-z0-9\-]*\.)+[a-z]{2,}$")
        .expect("email pattern is valid")
});

/// Outcome of a credential check: valid when no messages were collected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    errors: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<String> {
        self.errors
    }

    pub fn merge(mut self, other: ValidationReport) -> Self {
        self.errors.extend(other.errors);
        self
    }

    fn check(&mut self, ok: bool, message: &str) {
        if !ok {
            self.errors.push(message.to_string());
        }
    }

    /// Converts a failed report into [`DomainError::InvalidCredentials`].
    pub fn into_result(self) -> Result<(), DomainError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(DomainError::InvalidCredentials(self.errors))
        }
    }
}

pub fn validate_username(username: &str) -> ValidationReport {
    let mut report = ValidationReport::default();
    report.check(
        username.chars().count() >= MIN_USERNAME_LEN,
        "Username should contain at least 6 characters",
    );
    report
}

pub fn validate_email(email: &str) -> ValidationReport {
    let mut report = ValidationReport::default();
    report.check(is_valid_email(email), "Invalid email");
    report
}

/// Every violated rule contributes its own message.
pub fn validate_password(password: &str) -> ValidationReport {
    let mut report = ValidationReport::default();
    report.check(
        password.chars().count() >= MIN_PASSWORD_LEN,
        "Password must be at least 8 characters long",
    );
    report.check(
        password.chars().any(|c| c.is_ascii_uppercase()),
        "Password should include at least one uppercase character",
    );
    report.check(
        password.chars().any(|c| c.is_ascii_lowercase()),
        "Password should include at least one lowercase character",
    );
    report.check(
        password.chars().any(|c| c.is_ascii_digit()),
        "Password should include at least one number",
    );
    report.check(
        password.contains(PASSWORD_SPECIAL_CHARS),
        "Password should include at least one special character",
    );
    report
}

pub fn validate_signup(username: &str, email: &str, password: &str) -> ValidationReport {
    validate_username(username)
        .merge(validate_email(email))
        .merge(validate_password(password))
}

fn is_valid_email(email: &str) -> bool {
    !email.starts_with('.') && !email.contains("..") && EMAIL_RE.is_match(email)
}
