pub mod di;
pub mod form;
pub mod handler;
pub mod runtime;
pub mod service;
pub mod state;
