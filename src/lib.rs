pub mod cli;
pub mod clients;
pub mod config;
pub mod constants;
pub mod debounce;
pub mod domain;
pub mod error;
pub mod filters;
pub mod models;
pub mod query;
pub mod routes;
pub mod schema;
pub mod screens;
pub mod services;
pub mod session;
pub mod state;
pub mod view;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{ChavesCommands, Cli, Commands, EmprestimosCommands, OperadoresCommands};
pub use config::{Config, LogFormat};
use schema::EmprestimoAdministrativoForm;
pub use state::AppState;

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if matches!(cli.command, Some(Commands::Init)) {
        if Config::create_default_if_missing()? {
            println!("✓ Config file created. Edit config.toml and run again.");
        } else {
            println!("Config file already exists.");
        }
        return Ok(());
    }

    let config = Config::load()?;
    config.validate()?;

    init_tracing(&config);

    let state = AppState::new(config)?;

    match cli.command {
        None | Some(Commands::Init) => cli::open(&state, &filters::Location::new("/")).await,

        Some(Commands::Login { email, password }) => cli::cmd_login(&state, &email, password).await,

        Some(Commands::Logout) => cli::cmd_logout(&state).await,

        Some(Commands::Whoami) => cli::cmd_whoami(&state).await,

        Some(Commands::Abrir { location }) => cli::cmd_abrir(&state, &location).await,

        Some(Commands::Chaves { command }) => match command {
            ChavesCommands::List { filtros } => cli::cmd_chaves_list(&state, &filtros).await,
            ChavesCommands::Show { id, status } => cli::cmd_chaves_show(&state, &id, &status).await,
            ChavesCommands::Retirar { id, matricula } => {
                cli::cmd_chaves_retirar(&state, &id, &matricula).await
            }
            ChavesCommands::Devolver { id, matricula } => {
                cli::cmd_chaves_devolver(&state, &id, &matricula).await
            }
            ChavesCommands::Buscar { filtros } => cli::cmd_chaves_buscar(&state, &filtros).await,
        },

        Some(Commands::Emprestimos { command }) => match command {
            EmprestimosCommands::List { filtros } => {
                cli::cmd_emprestimos_list(&state, &filtros).await
            }
            EmprestimosCommands::Show { id } => cli::cmd_emprestimos_show(&state, &id).await,
            EmprestimosCommands::Buscar { filtros } => {
                cli::cmd_emprestimos_buscar(&state, &filtros).await
            }
            EmprestimosCommands::Administrativo {
                chave,
                justificativa,
                retirada,
                status,
                retorno,
            } => {
                let form = EmprestimoAdministrativoForm {
                    chave_id: chave,
                    justificativa,
                    data_retirada: retirada,
                    status,
                    data_retorno: retorno,
                };
                cli::cmd_emprestimo_administrativo(&state, form).await
            }
        },

        Some(Commands::Operadores { command }) => match command {
            OperadoresCommands::List => cli::cmd_operadores_list(&state).await,
            OperadoresCommands::Cadastrar { nome, email, senha } => {
                cli::cmd_operadores_cadastrar(&state, &nome, &email, senha).await
            }
            OperadoresCommands::Remover { id, yes } => {
                cli::cmd_operadores_remover(&state, &id, yes).await
            }
        },
    }
}

/// Logs go to stderr so command output stays clean on stdout.
fn init_tracing(config: &Config) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.general.log_format {
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}
