pub mod account_service;
pub mod aggregator;
pub mod change_feed;
pub mod family_service;
pub mod goal_service;
pub mod ledger_store;
pub mod snapshot_service;
