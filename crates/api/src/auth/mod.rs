pub mod bootstrap;
pub mod password;
pub mod session;
pub mod telegram_login;
