//! Two-step signup flow.
//!
//! Step one collects identity credentials, step two the academic profile.
//! The form is an explicit value updated through a pure reducer, so stage
//! transitions are testable without any HTTP in the way. Committing performs
//! two dependent platform writes in strict order: create the account, then
//! insert the profile row keyed by the new account id.

use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use crate::peerlearn::handlers::{valid_email, valid_phone};
use crate::platform::{NewAccount, NewProfile, ProfileStore, SessionProvider};

/// Where the user is sent after a successful signup. Login is explicit, even
/// though the platform may already have issued a session: the account first
/// needs its email verified.
pub const SIGNUP_REDIRECT: &str = "/auth/login";

pub const SIGNUP_SUCCESS_MESSAGE: &str = "Account created! Please check your email to verify.";

pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Which identity credential step one requires.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SignupMethod {
    #[default]
    Email,
    Phone,
}

/// Progress of the flow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    /// Step one: identity credentials.
    Account,
    /// Step two: academic profile.
    Profile,
    /// The two-write commit sequence is in flight.
    Submitting,
    /// Account and profile row both exist.
    Complete,
}

/// Everything entered across both steps. Fields survive back-navigation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SignupForm {
    pub method: SignupMethod,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub college: String,
    pub university: String,
    pub course: String,
    pub year_of_study: String,
    pub subjects: Vec<String>,
}

/// A single field edit.
#[derive(Clone, Debug)]
pub enum FieldEvent {
    Method(SignupMethod),
    FullName(String),
    Email(String),
    Phone(String),
    Password(String),
    College(String),
    University(String),
    Course(String),
    YearOfStudy(String),
    Subjects(Vec<String>),
}

/// Pure reducer: returns the form with one field replaced.
#[must_use]
pub fn apply(form: &SignupForm, event: FieldEvent) -> SignupForm {
    let mut next = form.clone();
    match event {
        FieldEvent::Method(method) => next.method = method,
        FieldEvent::FullName(value) => next.full_name = value,
        FieldEvent::Email(value) => next.email = value,
        FieldEvent::Phone(value) => next.phone = value,
        FieldEvent::Password(value) => next.password = value,
        FieldEvent::College(value) => next.college = value,
        FieldEvent::University(value) => next.university = value,
        FieldEvent::Course(value) => next.course = value,
        FieldEvent::YearOfStudy(value) => next.year_of_study = value,
        FieldEvent::Subjects(value) => next.subjects = value,
    }
    next
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Full name is required")]
    MissingFullName,
    #[error("Email address is required")]
    MissingEmail,
    #[error("Invalid email address")]
    InvalidEmail,
    #[error("Phone number is required")]
    MissingPhone,
    #[error("Invalid phone number")]
    InvalidPhone,
    #[error("Password must be at least {MIN_PASSWORD_LENGTH} characters")]
    PasswordTooShort,
    #[error("College is required")]
    MissingCollege,
    #[error("University is required")]
    MissingUniversity,
    #[error("Course is required")]
    MissingCourse,
    #[error("Select a year of study")]
    MissingYearOfStudy,
    #[error("Year of study must be between 1 and 5")]
    InvalidYearOfStudy,
}

#[derive(Debug, Error)]
pub enum SignupError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Account creation failed; nothing was written.
    #[error("{0}")]
    AccountCreation(String),
    /// The account exists but its profile row does not. No compensating
    /// deletion is performed; the id is kept for reconciliation.
    #[error("{message}")]
    ProfileCreation { account_id: Uuid, message: String },
    /// A commit is already in flight for this flow.
    #[error("Signup already in progress")]
    InFlight,
    /// Submit was called before the profile step was reached.
    #[error("Complete the account step first")]
    WrongStage,
}

/// Returned once both writes have succeeded.
#[derive(Clone, Debug)]
pub struct SignupReceipt {
    pub account_id: Uuid,
    pub message: &'static str,
    pub redirect: &'static str,
}

/// Step-one checks. Never performs a remote call.
pub fn validate_account(form: &SignupForm) -> Result<(), ValidationError> {
    if form.full_name.trim().is_empty() {
        return Err(ValidationError::MissingFullName);
    }

    match form.method {
        SignupMethod::Email => {
            if form.email.trim().is_empty() {
                return Err(ValidationError::MissingEmail);
            }
            if !valid_email(form.email.trim()) {
                return Err(ValidationError::InvalidEmail);
            }
        }
        SignupMethod::Phone => {
            if form.phone.trim().is_empty() {
                return Err(ValidationError::MissingPhone);
            }
            if !valid_phone(form.phone.trim()) {
                return Err(ValidationError::InvalidPhone);
            }
        }
    }

    if form.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort);
    }

    Ok(())
}

/// Step-two checks. Never performs a remote call.
pub fn validate_profile(form: &SignupForm) -> Result<(), ValidationError> {
    if form.college.trim().is_empty() {
        return Err(ValidationError::MissingCollege);
    }
    if form.university.trim().is_empty() {
        return Err(ValidationError::MissingUniversity);
    }
    if form.course.trim().is_empty() {
        return Err(ValidationError::MissingCourse);
    }

    parse_year_of_study(&form.year_of_study).map(|_| ())
}

/// Integer value of the selected year option.
///
/// Takes leading digits so both "3" and "3rd Year" parse to 3, matching how
/// the form options are labeled.
pub fn parse_year_of_study(raw: &str) -> Result<u8, ValidationError> {
    let digits: String = raw
        .trim()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();

    if digits.is_empty() {
        return Err(ValidationError::MissingYearOfStudy);
    }

    let year: u8 = digits
        .parse()
        .map_err(|_| ValidationError::InvalidYearOfStudy)?;

    if (1..=5).contains(&year) {
        Ok(year)
    } else {
        Err(ValidationError::InvalidYearOfStudy)
    }
}

/// The signup flow controller.
#[derive(Clone, Debug, Default)]
pub struct SignupFlow {
    stage: Stage,
    form: SignupForm,
}

impl Default for Stage {
    fn default() -> Self {
        Self::Account
    }
}

impl SignupFlow {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    #[must_use]
    pub fn form(&self) -> &SignupForm {
        &self.form
    }

    /// Records a field edit via the reducer.
    pub fn update(&mut self, event: FieldEvent) {
        self.form = apply(&self.form, event);
    }

    /// Moves from the account step to the profile step.
    ///
    /// Only step-one fields are checked; no remote call is made.
    pub fn advance(&mut self) -> Result<(), ValidationError> {
        if self.stage == Stage::Account {
            validate_account(&self.form)?;
            self.stage = Stage::Profile;
        }
        Ok(())
    }

    /// Steps back from the profile step; every entered field is preserved.
    pub fn back(&mut self) {
        if self.stage == Stage::Profile {
            self.stage = Stage::Account;
        }
    }

    /// Runs the commit sequence: create the account, then insert the profile
    /// row with the issued id. On any failure the flow returns to the profile
    /// step with the form intact.
    pub async fn submit(
        &mut self,
        sessions: &dyn SessionProvider,
        profiles: &dyn ProfileStore,
    ) -> Result<SignupReceipt, SignupError> {
        match self.stage {
            Stage::Submitting => return Err(SignupError::InFlight),
            Stage::Account | Stage::Complete => return Err(SignupError::WrongStage),
            Stage::Profile => {}
        }

        validate_profile(&self.form)?;
        let year = parse_year_of_study(&self.form.year_of_study)?;

        self.stage = Stage::Submitting;

        let new_account = NewAccount {
            email: self.form.email.trim().to_string(),
            password: self.form.password.clone(),
            full_name: self.form.full_name.trim().to_string(),
        };

        let account = match sessions.create_account(new_account).await {
            Ok(account) => account,
            Err(err) => {
                self.stage = Stage::Profile;
                return Err(SignupError::AccountCreation(err.message()));
            }
        };

        let row = NewProfile {
            id: account.id,
            email: self.form.email.trim().to_string(),
            phone: optional(&self.form.phone),
            full_name: self.form.full_name.trim().to_string(),
            college: optional(&self.form.college),
            university: optional(&self.form.university),
            course: optional(&self.form.course),
            year_of_study: Some(year),
            subjects: self.form.subjects.clone(),
        };

        if let Err(err) = profiles.insert_profile(row).await {
            self.stage = Stage::Profile;
            warn!(
                account_id = %account.id,
                "account exists without a profile row; flagged for reconciliation"
            );
            return Err(SignupError::ProfileCreation {
                account_id: account.id,
                message: err.message(),
            });
        }

        self.stage = Stage::Complete;

        Ok(SignupReceipt {
            account_id: account.id,
            message: SIGNUP_SUCCESS_MESSAGE,
            redirect: SIGNUP_REDIRECT,
        })
    }
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
