use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use super::{FormErrors, parse_timestamp};
use crate::constants::limits::{JUSTIFICATIVA_MIN_LEN, MATRICULA_MAX_LEN, MATRICULA_MIN_LEN};
use crate::domain::ChaveId;
use crate::models::StatusEmprestimo;

/// Registration number typed in the withdrawal and return dialogs.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct MatriculaForm {
    #[validate(custom(function = "validate_matricula"))]
    pub matricula: String,
}

/// Body of `POST /emprestimos/retirada/{id}` and `POST /emprestimos/devolucao/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Matricula {
    pub matricula: String,
}

impl MatriculaForm {
    #[must_use]
    pub fn new(matricula: impl Into<String>) -> Self {
        Self {
            matricula: matricula.into(),
        }
    }

    pub fn validate_form(&self) -> Result<Matricula, FormErrors> {
        let trimmed = Self::new(self.matricula.trim());
        trimmed.validate()?;
        Ok(Matricula {
            matricula: trimmed.matricula,
        })
    }
}

/// Raw input of the administrative loan form.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EmprestimoAdministrativoForm {
    #[validate(custom(function = "validate_chave_id"))]
    pub chave_id: String,

    #[validate(length(min = JUSTIFICATIVA_MIN_LEN, message = "Justificativa é obrigatória"))]
    pub justificativa: String,

    #[validate(custom(function = "validate_data_retirada"))]
    pub data_retirada: String,

    #[validate(custom(function = "validate_status"))]
    pub status: String,

    #[serde(default)]
    #[validate(custom(function = "validate_data_retorno"))]
    pub data_retorno: Option<String>,
}

/// Validated body of `POST /emprestimos/emprestimo-administrativo`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NovoEmprestimoAdministrativo {
    pub chave_id: ChaveId,
    pub justificativa: String,
    pub data_retirada: DateTime<FixedOffset>,
    pub status: StatusEmprestimo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_retorno: Option<DateTime<FixedOffset>>,
}

const RETORNO_OBRIGATORIO: &str =
    "Data de retorno é obrigatória quando o empréstimo está devolvido.";
const RETORNO_ANTES_DA_RETIRADA: &str = "Data de retorno deve ser posterior à data de retirada.";
const FORM_INVALIDO: &str = "Verifique as datas do empréstimo.";

fn invalid(code: &'static str, message: impl Into<String>) -> ValidationError {
    let message: String = message.into();
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

fn validate_matricula(value: &str) -> Result<(), ValidationError> {
    let len = value.chars().count() as u64;
    if len < MATRICULA_MIN_LEN {
        return Err(invalid(
            "length",
            format!("Digite uma matrícula de {MATRICULA_MIN_LEN} dígitos no mínimo"),
        ));
    }
    if len > MATRICULA_MAX_LEN {
        return Err(invalid(
            "length",
            format!("Matrícula não pode ser maior que {MATRICULA_MAX_LEN} dígitos"),
        ));
    }
    Ok(())
}

fn validate_chave_id(value: &str) -> Result<(), ValidationError> {
    uuid::Uuid::parse_str(value.trim())
        .map(|_| ())
        .map_err(|_| invalid("uuid", "Selecione uma chave."))
}

fn validate_data_retirada(value: &str) -> Result<(), ValidationError> {
    parse_timestamp(value)
        .map(|_| ())
        .ok_or_else(|| invalid("datetime", "Data de retirada inválida"))
}

fn validate_data_retorno(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Ok(());
    }
    parse_timestamp(value)
        .map(|_| ())
        .ok_or_else(|| invalid("datetime", "Data de retorno inválida"))
}

fn validate_status(value: &str) -> Result<(), ValidationError> {
    value
        .parse::<StatusEmprestimo>()
        .map(|_| ())
        .map_err(|_| invalid("enum", "Status deve ser PENDENTE ou DEVOLVIDO"))
}

impl EmprestimoAdministrativoForm {
    fn status(&self) -> Option<StatusEmprestimo> {
        self.status.parse().ok()
    }

    fn data_retorno(&self) -> Option<&str> {
        self.data_retorno
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Cross-field rules on the return date.
    ///
    /// Only runs against values that already parsed; malformed dates are
    /// reported by the field validators.
    fn validate_consistency(&self) -> Result<(), ValidationError> {
        let retorno = self.data_retorno();

        if self.status() == Some(StatusEmprestimo::Devolvido) && retorno.is_none() {
            return Err(invalid("required", RETORNO_OBRIGATORIO));
        }

        if let (Some(retirada), Some(retorno)) = (
            parse_timestamp(&self.data_retirada),
            retorno.and_then(parse_timestamp),
        ) && retorno < retirada
        {
            return Err(invalid("order", RETORNO_ANTES_DA_RETIRADA));
        }

        Ok(())
    }

    pub fn validate_form(&self) -> Result<NovoEmprestimoAdministrativo, FormErrors> {
        let mut errors = self.validate().err().unwrap_or_else(ValidationErrors::new);
        let consistency = self.validate_consistency();
        let cross_field_failed = consistency.is_err();
        if let Err(e) = consistency {
            errors.add("dataRetorno", e);
        }

        if !errors.errors().is_empty() {
            let mut out = FormErrors::from(errors);
            if cross_field_failed {
                out.form = Some(FORM_INVALIDO.to_string());
            }
            return Err(out);
        }

        let (Some(status), Some(data_retirada)) =
            (self.status(), parse_timestamp(&self.data_retirada))
        else {
            let mut out = FormErrors::default();
            out.push("dataRetirada", "Data de retirada inválida");
            return Err(out);
        };

        let data_retorno = match status {
            StatusEmprestimo::Pendente => None,
            StatusEmprestimo::Devolvido => self.data_retorno().and_then(parse_timestamp),
        };

        Ok(NovoEmprestimoAdministrativo {
            chave_id: ChaveId::new(self.chave_id.trim()),
            justificativa: self.justificativa.clone(),
            data_retirada,
            status,
            data_retorno,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::limits::MATRICULA_MIN_LEN_SUPERSEDED;

    const CHAVE: &str = "7c9e6679-7425-40de-944b-e07fc1f90ae7";

    fn form(status: &str, retorno: Option<&str>) -> EmprestimoAdministrativoForm {
        EmprestimoAdministrativoForm {
            chave_id: CHAVE.to_string(),
            justificativa: "Sistema indisponível pela manhã".to_string(),
            data_retirada: "2025-01-01T10:00:00.000-03:00".to_string(),
            status: status.to_string(),
            data_retorno: retorno.map(String::from),
        }
    }

    #[test]
    fn test_matricula_bounds() {
        assert!(MatriculaForm::new("12345678").validate_form().is_ok());
        assert!(MatriculaForm::new("12345678901").validate_form().is_ok());

        let errors = MatriculaForm::new("1234567").validate_form().unwrap_err();
        assert_eq!(
            errors.field("matricula"),
            ["Digite uma matrícula de 8 dígitos no mínimo"]
        );

        let errors = MatriculaForm::new("123456789012").validate_form().unwrap_err();
        assert_eq!(
            errors.field("matricula"),
            ["Matrícula não pode ser maior que 11 dígitos"]
        );
    }

    #[test]
    fn test_matricula_messages_follow_limits() {
        let short = "1".repeat(MATRICULA_MIN_LEN as usize - 1);
        let errors = MatriculaForm::new(short).validate_form().unwrap_err();
        assert!(errors.field("matricula")[0].contains(&MATRICULA_MIN_LEN.to_string()));

        let long = "1".repeat(MATRICULA_MAX_LEN as usize + 1);
        let errors = MatriculaForm::new(long).validate_form().unwrap_err();
        assert!(errors.field("matricula")[0].contains(&MATRICULA_MAX_LEN.to_string()));
    }

    #[test]
    fn test_matricula_pinned_to_current_revision() {
        let seven = "1234567";
        assert_eq!(seven.len() as u64, MATRICULA_MIN_LEN_SUPERSEDED);
        assert!(MatriculaForm::new(seven).validate_form().is_err());
    }

    #[test]
    fn test_returned_without_return_date_is_rejected() {
        for retorno in [None, Some(""), Some("   ")] {
            let errors = form("DEVOLVIDO", retorno).validate_form().unwrap_err();
            assert_eq!(errors.field("dataRetorno"), [RETORNO_OBRIGATORIO]);
            assert_eq!(errors.form.as_deref(), Some(FORM_INVALIDO));
        }
    }

    #[test]
    fn test_return_before_withdrawal_is_rejected() {
        let errors = form("DEVOLVIDO", Some("2025-01-01T09:59:59.000-03:00"))
            .validate_form()
            .unwrap_err();
        assert_eq!(errors.field("dataRetorno"), [RETORNO_ANTES_DA_RETIRADA]);
        assert!(errors.form.is_some());
    }

    #[test]
    fn test_ordering_compares_instants_not_text() {
        // 12:00Z is 09:00-03:00, one hour before withdrawal
        let errors = form("DEVOLVIDO", Some("2025-01-01T12:00:00Z"))
            .validate_form()
            .unwrap_err();
        assert!(errors.has_field("dataRetorno"));

        // 13:00Z is exactly the withdrawal instant
        assert!(form("DEVOLVIDO", Some("2025-01-01T13:00:00Z")).validate_form().is_ok());
    }

    #[test]
    fn test_valid_returned_loan_is_normalized() {
        let out = form("DEVOLVIDO", Some("2025-01-02T08:30:00.000-03:00"))
            .validate_form()
            .unwrap();
        assert_eq!(out.status, StatusEmprestimo::Devolvido);
        assert_eq!(out.chave_id.as_str(), CHAVE);
        assert!(out.data_retorno.unwrap() > out.data_retirada);

        let body = serde_json::to_value(&out).unwrap();
        assert_eq!(body["status"], "DEVOLVIDO");
        assert!(body["dataRetirada"].is_string());
        assert!(body["dataRetorno"].is_string());
    }

    #[test]
    fn test_pending_loan_drops_return_date() {
        let out = form("PENDENTE", Some("2025-01-02T08:30:00.000-03:00"))
            .validate_form()
            .unwrap();
        assert_eq!(out.data_retorno, None);
        let body = serde_json::to_value(&out).unwrap();
        assert!(body.get("dataRetorno").is_none());
    }

    #[test]
    fn test_field_errors_are_collected_together() {
        let bad = EmprestimoAdministrativoForm {
            chave_id: String::new(),
            justificativa: "curta".to_string(),
            data_retirada: "ontem".to_string(),
            status: "PERDIDO".to_string(),
            data_retorno: Some("amanhã".to_string()),
        };
        let errors = bad.validate_form().unwrap_err();
        assert_eq!(errors.field("chaveId"), ["Selecione uma chave."]);
        assert_eq!(errors.field("justificativa"), ["Justificativa é obrigatória"]);
        assert_eq!(errors.field("dataRetirada"), ["Data de retirada inválida"]);
        assert!(errors.has_field("status"));
        assert_eq!(errors.field("dataRetorno"), ["Data de retorno inválida"]);
        assert!(errors.form.is_none());
    }
}
