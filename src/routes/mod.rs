pub mod docs;
pub mod health;
pub mod leagues;
pub mod players;
pub mod teams;
