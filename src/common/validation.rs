// src/common/validation.rs

use validator::ValidationError;

// ---
// Validações customizadas compartilhadas pelos payloads
// ---
// Regras de formato que o `validator` não cobre com os atributos padrão.
// Cada função devolve o mesmo código/mensagem que o cliente espera.

fn fail(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

/// Telefone ugandense: prefixo `+256` ou `0`, seguido de exatamente 9 dígitos.
pub fn validate_ugandan_phone(value: &str) -> Result<(), ValidationError> {
    let rest = value
        .strip_prefix("+256")
        .or_else(|| value.strip_prefix('0'));

    match rest {
        Some(digits) if digits.len() == 9 && digits.bytes().all(|b| b.is_ascii_digit()) => Ok(()),
        _ => Err(fail(
            "phone",
            "Please enter a valid Ugandan phone number",
        )),
    }
}

/// National ID: `CM` seguido de 12 caracteres alfanuméricos maiúsculos.
pub fn validate_national_id(value: &str) -> Result<(), ValidationError> {
    let rest = value.strip_prefix("CM");

    match rest {
        Some(tail)
            if tail.len() == 12
                && tail
                    .bytes()
                    .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit()) =>
        {
            Ok(())
        }
        _ => Err(fail(
            "national_id",
            "Please enter a valid National ID number",
        )),
    }
}

/// Tipo de produto: apenas letras e espaços.
pub fn validate_alpha_spaces(value: &str) -> Result<(), ValidationError> {
    if !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphabetic() || c == ' ')
    {
        Ok(())
    } else {
        Err(fail("alpha", "Type must contain only alphabets"))
    }
}
