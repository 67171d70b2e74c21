pub mod open_ai_service;
pub mod vertex_auth;
pub mod vertex_service;
