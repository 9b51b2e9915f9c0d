pub mod build;
pub mod dev;
pub mod init;
pub mod resolve;
pub mod routes;
pub mod serve;
