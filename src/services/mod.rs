pub mod chave_service;
pub use chave_service::ChaveService;

pub mod chave_service_impl;
pub use chave_service_impl::HttpChaveService;

pub mod emprestimo_service;
pub mod emprestimo_service_impl;
pub use emprestimo_service::EmprestimoService;
pub use emprestimo_service_impl::HttpEmprestimoService;

pub mod operador_service;
pub mod operador_service_impl;
pub use operador_service::OperadorService;
pub use operador_service_impl::HttpOperadorService;
