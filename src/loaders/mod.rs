pub mod cifp;
