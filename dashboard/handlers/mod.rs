pub mod events;
pub mod frame;
pub mod page;
