pub mod ascii;
pub mod command;
pub mod event;
pub mod level;
pub mod session;
pub mod world;
#[cfg(test)]
pub mod route;
