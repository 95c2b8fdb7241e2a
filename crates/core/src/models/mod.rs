pub mod account;
pub mod budget;
pub mod category;
pub mod chat;
pub mod ledger;
pub mod month;
pub mod plan;
pub mod price;
pub mod receipt;
pub mod report;
pub mod settings;
pub mod transaction;
pub mod zakat;
