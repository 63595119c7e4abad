pub mod disease_sh;
pub mod http;
