pub mod hooks;
pub mod system;
