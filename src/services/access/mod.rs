pub mod gate;
pub mod path;
pub mod table;

pub use gate::{AccessGate, Admission, GateConfig, GateDecision};
pub use path::{PathPattern, PatternError, PublicPage};
pub use table::{RouteAccess, RouteRule, RouteTable};
