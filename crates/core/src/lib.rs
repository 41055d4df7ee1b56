//! Domain vocabulary shared by the IDM crates: identifiers, the error
//! taxonomy, realm role names, request/response DTOs and field validation.

pub mod employee;
pub mod error;
pub mod role;
pub mod roles;
pub mod types;
pub mod validation;
