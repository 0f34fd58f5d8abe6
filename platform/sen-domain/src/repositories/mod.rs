pub mod trading_data;
