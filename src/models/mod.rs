pub mod history;
pub mod weather;

pub use history::{NewSearchRecord, SearchRecord, User};
pub use weather::{CurrentWeather, Forecast, ForecastDay, RawSample};
