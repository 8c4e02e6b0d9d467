pub mod flatten;
pub mod history;
pub mod index;
pub mod locate;
pub mod resolve;
