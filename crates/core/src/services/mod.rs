pub mod assistant_service;
pub mod ledger_calculator;
pub mod price_service;
pub mod report_service;
pub mod transaction_service;
pub mod zakat_service;
