pub mod cards;
pub mod due;
pub mod history;
pub mod resolve;
pub mod review;
pub mod state;
pub mod upload;
