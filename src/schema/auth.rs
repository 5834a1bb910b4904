use serde::{Deserialize, Serialize};
use validator::Validate;

use super::FormErrors;
use crate::constants::limits::PASSWORD_MIN_LEN;

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SignInForm {
    #[validate(email(message = "E-mail inválido"))]
    pub email: String,

    #[validate(length(min = 1, message = "Não deve estar vazia."))]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credenciais {
    pub email: String,
    pub password: String,
}

impl SignInForm {
    /// Email is trimmed before validation; the password is taken as typed.
    pub fn validate_form(&self) -> Result<Credenciais, FormErrors> {
        let trimmed = Self {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        };
        trimmed.validate()?;
        Ok(Credenciais {
            email: trimmed.email,
            password: trimmed.password,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SignUpForm {
    #[validate(length(min = 1, message = "Não deve estar vazio."))]
    pub name: String,

    #[validate(email(message = "E-mail inválido"))]
    pub email: String,

    #[validate(length(min = PASSWORD_MIN_LEN, message = "Mínimo de 8 caracteres"))]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NovoOperador {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl SignUpForm {
    /// Password is trimmed before the length check.
    pub fn validate_form(&self) -> Result<NovoOperador, FormErrors> {
        let trimmed = Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.trim().to_string(),
        };
        trimmed.validate()?;
        Ok(NovoOperador {
            name: trimmed.name,
            email: trimmed.email,
            password: trimmed.password,
        })
    }
}
