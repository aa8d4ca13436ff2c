// src/lib.rs
//
// A lógica vive na biblioteca para os testes de integração enxergarem as
// mesmas funções que o binário usa. O main.rs só monta o router.

pub mod common;
pub mod config;
pub mod db;
pub mod handlers;
pub mod models;
pub mod services;
