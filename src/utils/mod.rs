pub mod aggregate;
pub mod celebration;
pub mod roster;
pub mod share;
pub mod telegram;
pub mod theme;
