use std::fmt;

use crate::constants::query_keys::{CHAVE, CHAVES, EMPRESTIMO, EMPRESTIMOS, OPERADORES};

/// Writes the console can perform against the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mutation {
    GerarEmprestimo,
    RetornarEmprestimo,
    EmprestimoAdministrativo,
    CadastrarOperador,
    RemoverOperador,
}

impl Mutation {
    /// Cache families made stale by a successful run of this mutation.
    ///
    /// Opening or closing a loan flips key availability and adds or updates a
    /// loan, so both listings and both detail families go stale.
    #[must_use]
    pub const fn invalidates(self) -> &'static [&'static str] {
        match self {
            Self::GerarEmprestimo | Self::RetornarEmprestimo | Self::EmprestimoAdministrativo => {
                &[CHAVES, CHAVE, EMPRESTIMOS, EMPRESTIMO]
            }
            Self::CadastrarOperador | Self::RemoverOperador => &[OPERADORES],
        }
    }

    #[must_use]
    pub const fn success_message(self) -> &'static str {
        match self {
            Self::GerarEmprestimo => "Empréstimo realizado com sucesso!",
            Self::RetornarEmprestimo => "Devolução realizada com sucesso!",
            Self::EmprestimoAdministrativo => "Empréstimo administrativo registrado com sucesso!",
            Self::CadastrarOperador => "Operador cadastrado com sucesso!",
            Self::RemoverOperador => "Operador removido com sucesso!",
        }
    }
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::GerarEmprestimo => "gerar_emprestimo",
            Self::RetornarEmprestimo => "retornar_emprestimo",
            Self::EmprestimoAdministrativo => "emprestimo_administrativo",
            Self::CadastrarOperador => "cadastrar_operador",
            Self::RemoverOperador => "remover_operador",
        };
        f.write_str(name)
    }
}
