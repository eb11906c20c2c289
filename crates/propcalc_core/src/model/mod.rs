mod calculator;
mod ids;
mod ordered;
mod params;
mod scenario;

pub use calculator::CalculatorType;
pub use ids::ScenarioId;
pub use ordered::OrderedMap;
pub use params::{ParamValue, Params};
pub use scenario::Scenario;
