pub mod discount;
pub mod fuel;
pub mod malfunction;
pub mod network;
pub mod ticket;
pub mod vehicle;
