pub mod consumption;
pub mod interval;
pub mod month;
pub mod price;
pub mod window;
