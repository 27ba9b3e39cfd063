pub mod account;

// Re-export handler functions for use in routing
pub use account::me as account_me;
pub use account::update_details as account_update_details;
pub use account::update_password as account_update_password;
