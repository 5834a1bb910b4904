pub mod query_keys {

    pub const CHAVES: &str = "chaves";

    pub const CHAVE: &str = "chave";

    pub const EMPRESTIMOS: &str = "emprestimos";

    pub const EMPRESTIMO: &str = "emprestimo";

    pub const OPERADORES: &str = "operadores";
}

pub mod filters {
    use std::time::Duration;

    pub const DEBOUNCE: Duration = Duration::from_millis(300);

    pub const LOAN_WINDOW_DAYS: u64 = 7;

    /// Control values that mean "no filter" for an enum selector.
    pub const ALL_SENTINELS: &[&str] = &["todos", "todas", "all"];
}

pub mod limits {

    pub const PASSWORD_MIN_LEN: u64 = 8;

    /// Minimum of an earlier sign-up form. Not enforced.
    pub const PASSWORD_MIN_LEN_SUPERSEDED: u64 = 6;

    pub const MATRICULA_MIN_LEN: u64 = 8;

    /// Minimum of an earlier withdrawal dialog. Not enforced.
    pub const MATRICULA_MIN_LEN_SUPERSEDED: u64 = 7;

    pub const MATRICULA_MAX_LEN: u64 = 11;

    pub const JUSTIFICATIVA_MIN_LEN: u64 = 10;
}

pub mod messages {

    pub const NOT_RETURNED: &str = "Empréstimo ainda não foi devolvido!";

    pub const NOT_APPLICABLE: &str = "Não se aplica.";

    pub const RESERVATION_TITLE: &str = "Esse ambiente precisa de reserva prévia";

    pub const RESERVATION_WARNING: &str =
        "Por favor, verifique no sistema SIEF se há uma reserva para o usuário solicitante";

    pub const NOT_RETURNED_SHORT: &str = "Não devolvida";

    pub const HOLDER_UNKNOWN: &str = "Não foi possível identificar quem está com a chave.";

    pub const CHAVES_EMPTY: &str = "Não foram encontradas Chaves para o filtro solicitado.";

    pub const CHAVES_ERROR: &str = "Ocorreu um erro ao buscar as chaves. Contate o administrador.";

    pub const EMPRESTIMOS_EMPTY: &str = "Nenhum empréstimo encontrado.";

    pub const EMPRESTIMOS_ERROR: &str =
        "Ocorreu um erro ao listar os empréstimos. Contate o Administrador.";

    pub const OPERADORES_EMPTY: &str = "Nenhum operador cadastrado.";

    pub const OPERADORES_ERROR: &str =
        "Ocorreu um erro ao buscar os operadores. Contate o administrador.";

    pub const DETAIL_ERROR: &str =
        "Ocorreu um erro! Contate o administrador do sistema para comunicar dessa situação.";

    pub const LOADING: &str = "Carregando...";

    pub const CAMPUS_SNO_LEGEND: &str = "Chaves do novo Campus Salto do Norte";

    pub const CAMPUS_VELHA_LEGEND: &str = "Chaves do antigo Campus Velha";

    pub const REMOVE_OPERATOR_WARNING: &str = "Essa ação não pode ser desfeita. O operador vai ser deslogado nesse momento em que você removê-lo.";
}

pub mod display {
    /// Local date and time as shown in listings and details.
    pub const DATE_TIME_FORMAT: &str = "%d/%m/%Y %H:%M";
}
