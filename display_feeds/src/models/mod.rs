pub mod calendar;
pub mod candle;
pub mod ticker;
pub mod timeframe;
pub mod weather;
