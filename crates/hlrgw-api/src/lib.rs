pub mod config;
pub mod cors;
pub mod gate;
pub mod middleware;
pub mod router;
pub mod routes;
pub mod state;
