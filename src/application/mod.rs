pub mod dashboard;
pub mod dispatcher;
pub mod session;
