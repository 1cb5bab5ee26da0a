//! 路由定义：路径模式、参数、元信息与路由表

mod meta;
mod params;
mod pattern;
mod table;

pub use meta::RouteMeta;
pub use params::{ParamValue, RouteParams};
pub use pattern::{PathPattern, Segment};
pub use table::{RouteDef, RouteMatch, RouteRecord, RouteTable, RouteTableBuilder, RouteTarget};
