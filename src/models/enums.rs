//! Wire enumerations shared by keys, loans and filters.
//!
//! Every enum keeps the exact string the backend uses, so the same value can
//! travel through JSON bodies and query strings unchanged.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: {}", self.kind, self.value)
    }
}

impl std::error::Error for UnknownVariant {}

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($variant:ident => $wire:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok(Self::$variant),)+
                    other => Err(UnknownVariant {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

wire_enum! {
    /// Kind of a loan: created by the normal withdrawal flow or back-filled by an operator.
    TipoEmprestimo, "loan type" {
        Administrativo => "ADMINISTRATIVO",
        Normal => "NORMAL",
    }
}

wire_enum! {
    StatusEmprestimo, "loan status" {
        Pendente => "PENDENTE",
        Devolvido => "DEVOLVIDO",
    }
}

wire_enum! {
    TipoChave, "key type" {
        Armario => "ARMARIO",
        Ambiente => "AMBIENTE",
    }
}

wire_enum! {
    TipoAmbiente, "room type" {
        Laboratorio => "LABORATORIO",
        SalaDeAula => "SALA_DE_AULA",
        SalaAdministrativa => "SALA_ADMINISTRATIVA",
        Auditorio => "AUDITORIO",
    }
}

wire_enum! {
    /// Campus where a locker or room lives.
    Localizacao, "location" {
        Sno => "SNO",
        Velha => "VELHA",
    }
}

wire_enum! {
    /// Availability filter of the key listing. Lowercase on the wire.
    StatusChave, "key status" {
        Disponivel => "disponivel",
        Indisponivel => "indisponivel",
    }
}

impl Default for StatusChave {
    fn default() -> Self {
        Self::Disponivel
    }
}

impl StatusChave {
    #[must_use]
    pub const fn is_disponivel(self) -> bool {
        matches!(self, Self::Disponivel)
    }
}

impl Localizacao {
    #[must_use]
    pub const fn campus(&self) -> &'static str {
        match self {
            Self::Sno => "Campus Salto do Norte",
            Self::Velha => "Campus Velha",
        }
    }
}

impl TipoChave {
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Armario => "Armário",
            Self::Ambiente => "Ambiente",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        assert_eq!(TipoEmprestimo::Administrativo.as_str(), "ADMINISTRATIVO");
        assert_eq!(TipoAmbiente::SalaDeAula.as_str(), "SALA_DE_AULA");
        assert_eq!(StatusChave::Indisponivel.to_string(), "indisponivel");
        assert_eq!(
            serde_json::to_string(&StatusEmprestimo::Devolvido).unwrap(),
            "\"DEVOLVIDO\""
        );
    }

    #[test]
    fn test_from_str_is_exact() {
        assert_eq!("SNO".parse::<Localizacao>(), Ok(Localizacao::Sno));
        assert!("sno".parse::<Localizacao>().is_err());
        let err = "PERDIDO".parse::<StatusEmprestimo>().unwrap_err();
        assert_eq!(err.to_string(), "invalid loan status: PERDIDO");
    }

    #[test]
    fn test_status_chave_default() {
        assert_eq!(StatusChave::default(), StatusChave::Disponivel);
        assert!(StatusChave::default().is_disponivel());
    }
}
