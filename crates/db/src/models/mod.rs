pub mod session;

pub use session::SessionRow;
