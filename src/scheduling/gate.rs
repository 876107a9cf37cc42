use crate::models::Participant;
use crate::utils::error::AppError;

/// Per-participant password check.
///
/// A participant without a stored password can be acted on by anyone.
/// Otherwise the supplied password has to match exactly, case included.
pub fn authorize(participant: &Participant, supplied_password: &str) -> Result<(), AppError> {
    if !participant.has_password() || participant.password == supplied_password {
        Ok(())
    } else {
        Err(AppError::IncorrectPassword)
    }
}
