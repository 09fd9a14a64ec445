pub mod common;
pub mod export;
pub mod loading;
pub mod routing;
